use ratatui::style::Color;

pub const FG: Color = Color::Rgb(200, 200, 210);
pub const DIM: Color = Color::Rgb(80, 80, 90);
pub const ACCENT: Color = Color::Rgb(0, 200, 150);
pub const PLAYING_GREEN: Color = Color::Rgb(50, 220, 100);
pub const WARN_RED: Color = Color::Rgb(220, 50, 50);
pub const CURSOR_BG: Color = Color::Rgb(60, 65, 80);
pub const HEADER_BG: Color = Color::Rgb(35, 35, 45);

pub fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}
