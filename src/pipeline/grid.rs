// The pattern grid: one track per instrument, every track the same fixed length.
//
// "track": one instrument's row of steps.
// "step": a single on/off cell in a track, one time slot of the loop.
//
// The step count only decides how much of each track is live; nothing here
// ever resizes a track.

use thiserror::Error;

use crate::shared::{Instrument, MAX_STEPS, NUM_INSTRUMENTS, StepCount};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("row {row} out of range (grid has {} rows)", NUM_INSTRUMENTS)]
    RowOutOfRange { row: usize },
    #[error("column {col} out of range (rows hold {} steps)", MAX_STEPS)]
    ColumnOutOfRange { col: usize },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Track {
    pub steps: [bool; MAX_STEPS],
}

impl Track {
    pub fn clear(&mut self) {
        self.steps = [false; MAX_STEPS];
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternGrid {
    tracks: [Track; NUM_INSTRUMENTS],
}

impl PatternGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, row: usize, col: usize) -> bool {
        self.tracks
            .get(row)
            .and_then(|t| t.steps.get(col))
            .copied()
            .unwrap_or(false)
    }

    pub fn toggle(&mut self, row: usize, col: usize) -> Result<bool, GridError> {
        if col >= MAX_STEPS {
            return Err(GridError::ColumnOutOfRange { col });
        }
        let track = self
            .tracks
            .get_mut(row)
            .ok_or(GridError::RowOutOfRange { row })?;
        track.steps[col] = !track.steps[col];
        Ok(track.steps[col])
    }

    pub fn reset_row(&mut self, row: usize) -> Result<(), GridError> {
        self.tracks
            .get_mut(row)
            .ok_or(GridError::RowOutOfRange { row })?
            .clear();
        Ok(())
    }

    pub fn reset_all(&mut self) {
        for track in &mut self.tracks {
            track.clear();
        }
    }

    /// Instruments with an active cell in `col`, in row order. Columns past
    /// the step count are never live, whatever they store.
    pub fn live_column(&self, col: usize, step_count: StepCount) -> impl Iterator<Item = Instrument> + '_ {
        let live = col < step_count.len();
        Instrument::ALL
            .into_iter()
            .filter(move |inst| live && self.is_active(inst.index(), col))
    }

    pub fn cells(&self) -> [[bool; MAX_STEPS]; NUM_INSTRUMENTS] {
        std::array::from_fn(|row| self.tracks[row].steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scattered() -> PatternGrid {
        let mut grid = PatternGrid::new();
        for (row, col) in [(0, 0), (0, 4), (1, 3), (2, 15), (5, 7), (7, 11)] {
            grid.toggle(row, col).unwrap();
        }
        grid
    }

    #[test]
    fn toggle_twice_restores_every_cell() {
        let original = scattered();
        for row in 0..NUM_INSTRUMENTS {
            for col in 0..MAX_STEPS {
                let mut grid = original.clone();
                grid.toggle(row, col).unwrap();
                assert_ne!(grid.is_active(row, col), original.is_active(row, col));
                grid.toggle(row, col).unwrap();
                assert_eq!(grid, original);
            }
        }
    }

    #[test]
    fn toggle_out_of_range_is_rejected_without_touching_shape() {
        let mut grid = scattered();
        let before = grid.clone();
        assert_eq!(
            grid.toggle(NUM_INSTRUMENTS, 0),
            Err(GridError::RowOutOfRange { row: NUM_INSTRUMENTS })
        );
        assert_eq!(
            grid.toggle(0, MAX_STEPS),
            Err(GridError::ColumnOutOfRange { col: MAX_STEPS })
        );
        assert_eq!(grid, before);
        assert_eq!(grid.cells().len(), NUM_INSTRUMENTS);
    }

    #[test]
    fn reset_row_clears_only_that_row() {
        let mut grid = scattered();
        let before = grid.clone();
        grid.reset_row(0).unwrap();
        assert!(grid.cells()[0].iter().all(|s| !s));
        for row in 1..NUM_INSTRUMENTS {
            assert_eq!(grid.cells()[row], before.cells()[row]);
        }
    }

    #[test]
    fn reset_row_on_empty_row_stays_empty() {
        let mut grid = PatternGrid::new();
        grid.reset_row(3).unwrap();
        assert_eq!(grid, PatternGrid::new());
        assert!(grid.reset_row(99).is_err());
    }

    #[test]
    fn reset_all_clears_every_cell() {
        let mut grid = scattered();
        grid.reset_all();
        assert!(grid.cells().iter().flatten().all(|c| !c));
    }

    #[test]
    fn cells_past_step_count_are_kept_but_not_live() {
        let mut grid = PatternGrid::new();
        grid.toggle(0, 10).unwrap();
        assert_eq!(grid.live_column(10, StepCount::Four).count(), 0);
        assert_eq!(grid.live_column(10, StepCount::Eight).count(), 0);
        assert!(grid.is_active(0, 10));
        assert_eq!(grid.live_column(10, StepCount::Sixteen).collect::<Vec<_>>(), vec![Instrument::Kick]);
    }

    #[test]
    fn column_lists_active_instruments() {
        let mut grid = PatternGrid::new();
        grid.toggle(Instrument::Kick.index(), 0).unwrap();
        grid.toggle(Instrument::Snare.index(), 0).unwrap();
        grid.toggle(Instrument::Tom.index(), 1).unwrap();
        let hits: Vec<_> = grid.live_column(0, StepCount::Four).collect();
        assert_eq!(hits, vec![Instrument::Kick, Instrument::Snare]);
        assert_eq!(grid.live_column(2, StepCount::Four).count(), 0);
    }
}
