use crate::shared::{DisplayState, MAX_STEPS, NUM_INSTRUMENTS, StepCount};

// state local to the tui: where the cursor is, plus a few fields mirrored from
// DisplayState each frame so key resolution knows the context
#[derive(Clone, Debug, Default)]
pub struct TuiState {
    pub cursor_row: usize,
    pub cursor_col: usize,
    // synced from DisplayState each frame
    pub step_count: StepCount,
    pub confirming_reset: bool,
}

impl TuiState {
    pub fn sync(&mut self, ds: &DisplayState) {
        self.step_count = ds.step_count;
        self.confirming_reset = ds.confirm_reset_pending;
        // the cursor never sits on a hidden step
        self.cursor_col = self.cursor_col.min(self.step_count.len() - 1);
    }

    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let cols = self.step_count.len().min(MAX_STEPS);
        self.cursor_row = wrap(self.cursor_row, d_row, NUM_INSTRUMENTS);
        self.cursor_col = wrap(self.cursor_col, d_col, cols);
    }
}

fn wrap(pos: usize, delta: isize, len: usize) -> usize {
    (pos as isize + delta).rem_euclid(len as isize) as usize
}
