use std::thread;

use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};

use crate::shared::{DEFAULT_BPM, InputEvent, Instrument, StepCount};

use super::mode::TuiState;

// Blocking crossterm reads live on their own thread so the main loop can wait
// on keys and clock ticks at the same time.
pub fn spawn_reader(tx: Sender<Event>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // main loop has shut down
                    }
                }
                Err(e) => {
                    tracing::error!("terminal input error: {e}");
                    break;
                }
            }
        }
    })
}

// resolve a terminal event into semantic input events; cursor movement is
// handled here and never reaches the middle layer
pub fn resolve_event(ev: &Event, ts: &mut TuiState) -> Vec<InputEvent> {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(key, ts),
        _ => vec![],
    }
}

fn handle_key(key: &KeyEvent, ts: &mut TuiState) -> Vec<InputEvent> {
    if ts.confirming_reset { // modal: only yes / no mean anything
        return match key.code {
            KeyCode::Char('y' | 'Y') => vec![InputEvent::ConfirmResetAll],
            KeyCode::Char('n' | 'N') | KeyCode::Esc => vec![InputEvent::CancelResetAll],
            _ => vec![],
        };
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => vec![InputEvent::Quit],
        KeyCode::Char(' ') => vec![InputEvent::PlayPress],

        // cursor
        KeyCode::Up | KeyCode::Char('k') => { ts.move_cursor(-1, 0); vec![] }
        KeyCode::Down | KeyCode::Char('j') => { ts.move_cursor(1, 0); vec![] }
        KeyCode::Left | KeyCode::Char('h') => { ts.move_cursor(0, -1); vec![] }
        KeyCode::Right | KeyCode::Char('l') => { ts.move_cursor(0, 1); vec![] }

        // grid edits at the cursor
        KeyCode::Enter | KeyCode::Char('x') => vec![InputEvent::ToggleStep {
            row: ts.cursor_row,
            col: ts.cursor_col,
        }],
        KeyCode::Char('c') => vec![InputEvent::ResetRow(ts.cursor_row)],
        KeyCode::Char('C') => vec![InputEvent::RequestResetAll],

        // transport settings
        KeyCode::Char('s') => vec![InputEvent::CycleStepCount],
        KeyCode::F(1) => vec![InputEvent::SetStepCount(StepCount::Four)],
        KeyCode::F(2) => vec![InputEvent::SetStepCount(StepCount::Eight)],
        KeyCode::F(3) => vec![InputEvent::SetStepCount(StepCount::Sixteen)],
        KeyCode::Char('t') => vec![InputEvent::SetBpm(DEFAULT_BPM)],
        KeyCode::Char('-') => vec![InputEvent::AdjustBpm(-1.0)],
        KeyCode::Char('=') => vec![InputEvent::AdjustBpm(1.0)],
        KeyCode::Char('_') => vec![InputEvent::AdjustBpm(-10.0)],
        KeyCode::Char('+') => vec![InputEvent::AdjustBpm(10.0)],

        // pads
        KeyCode::Char(c @ '1'..='8') => char_to_pad(c)
            .map(|inst| vec![InputEvent::TriggerPad(inst)])
            .unwrap_or_default(),

        _ => vec![],
    }
}

fn char_to_pad(c: char) -> Option<Instrument> {
    let idx = c.to_digit(10)?.checked_sub(1)?;
    Instrument::from_index(idx as usize)
}

pub fn key_hints(ts: &TuiState) -> &'static str {
    if ts.confirming_reset {
        " Clear the whole pattern?  y:yes  n/Esc:no"
    } else {
        " ←↑↓→/hjkl:move  Enter/x:toggle  c:clear row  C:clear all  Space:play/stop  s/F1-F3:steps  -/=:bpm  t:reset bpm  1-8:pads  q:quit"
    }
}
