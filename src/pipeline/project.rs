// Everything the session knows about the beat. Owned by the middle layer and
// only changed through Middle::handle_input / Middle::tick.
// Nothing here outlives the process.

use crate::pipeline::grid::PatternGrid;
use crate::pipeline::transport::{Transport, clamp_bpm};
use crate::shared::{DEFAULT_BPM, StepCount};

#[derive(Clone, Debug)]
pub struct ProjectState {
    pub grid: PatternGrid,
    pub step_count: StepCount,
    pub bpm: f32,
    pub transport: Transport,
}

impl Default for ProjectState {
    fn default() -> Self {
        Self {
            grid: PatternGrid::new(),
            step_count: StepCount::default(),
            bpm: DEFAULT_BPM,
            transport: Transport::new(),
        }
    }
}

impl ProjectState {
    pub fn with_settings(bpm: f32, step_count: StepCount) -> Self {
        Self {
            bpm: clamp_bpm(bpm),
            step_count,
            ..Self::default()
        }
    }
}
