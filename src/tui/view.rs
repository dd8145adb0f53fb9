use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::shared::DisplayState;

use super::grid::StepGridWidget;
use super::input::key_hints;
use super::mode::TuiState;
use super::theme;

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, ts: &TuiState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // transport bar
            Constraint::Min(state.instruments.len() as u16 + 2), // step grid
            Constraint::Length(3), // pads
            Constraint::Length(1), // key hints
        ])
        .split(area);

    draw_transport(frame, sections[0], state);
    draw_grid(frame, sections[1], state, ts);
    draw_pads(frame, sections[2], state);
    frame.render_widget(
        Paragraph::new(key_hints(ts)).style(Style::default().fg(theme::DIM)),
        sections[3],
    );

    if state.confirm_reset_pending {
        draw_confirm(frame, area);
    }
}

fn draw_transport(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let (icon, color) = if state.is_running() {
        ("▶ PLAY", theme::PLAYING_GREEN)
    } else {
        ("■ STOP", theme::DIM)
    };
    let step = match state.playing_step {
        Some(s) => format!("{:2}/{}", s + 1, state.step_count.len()),
        None => format!("--/{}", state.step_count.len()),
    };
    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(format!(" BPM {:.0} ", state.bpm), Style::default().fg(theme::ACCENT)),
        Span::styled(format!(" STEP {step} "), Style::default().fg(theme::FG)),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme::HEADER_BG)),
        area,
    );
}

fn draw_grid(frame: &mut Frame, area: Rect, state: &DisplayState, ts: &TuiState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::DIM))
        .title(" pattern ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        StepGridWidget {
            state,
            cursor: (ts.cursor_row, ts.cursor_col),
        },
        inner,
    );
}

fn draw_pads(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let n = state.instruments.len().max(1) as u32;
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..n).map(|_| Constraint::Ratio(1, n)))
        .split(area);

    for (inst, cell) in state.instruments.iter().zip(cells.iter()) {
        let color = theme::rgb(inst.color);
        let mut style = Style::default().fg(color);
        let i = inst.instrument.index();
        if state.fired[i] {
            style = style.bg(color).fg(theme::HEADER_BG).add_modifier(Modifier::BOLD);
        }
        let pad = Paragraph::new(format!("{} {}", i + 1, inst.label))
            .style(style)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
        frame.render_widget(pad, *cell);
    }
}

fn draw_confirm(frame: &mut Frame, area: Rect) {
    let width = 36.min(area.width);
    let height = 3.min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(" Clear every step? (y/n)")
            .style(Style::default().fg(theme::WARN_RED))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme::WARN_RED))),
        popup,
    );
}
