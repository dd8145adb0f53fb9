use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use crate::shared::{DisplayState, MAX_STEPS};

use super::theme;

const LABEL_WIDTH: u16 = 7;

/// The step grid: one line per instrument, only the live steps drawn.
pub struct StepGridWidget<'a> {
    pub state: &'a DisplayState,
    pub cursor: (usize, usize), // (row, col)
}

impl Widget for StepGridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let steps = self.state.step_count.len().min(MAX_STEPS);
        if area.width <= LABEL_WIDTH || area.height == 0 {
            return;
        }
        let step_width = ((area.width - LABEL_WIDTH) / steps as u16).clamp(1, 4);

        for (row, inst) in self.state.instruments.iter().enumerate() {
            let y = area.y + row as u16;
            if y >= area.y + area.height {
                break;
            }
            let color = theme::rgb(inst.color);
            let mut label_style = Style::default().fg(if inst.loaded { color } else { theme::DIM });
            if self.state.fired[row] {
                label_style = label_style.add_modifier(Modifier::REVERSED);
            }
            buf.set_string(area.x, y, format!("{:<6}", inst.label), label_style);

            for col in 0..steps {
                let x = area.x + LABEL_WIDTH + col as u16 * step_width;
                if x >= area.x + area.width {
                    break;
                }
                let active = self.state.cells[row][col];
                let playing = self.state.playing_step == Some(col as u8);

                let (ch, fg) = match (active, playing) {
                    (true, true) => ("█", theme::FG),
                    (true, false) => ("■", color),
                    (false, true) => ("▪", theme::PLAYING_GREEN),
                    (false, false) if col % 4 == 0 => ("·", theme::FG),
                    (false, false) => ("·", theme::DIM),
                };
                let mut style = Style::default().fg(fg);
                if self.cursor == (row, col) {
                    style = style.bg(theme::CURSOR_BG);
                }
                buf.set_string(x, y, ch, style);
            }
        }
    }
}
