use std::path::PathBuf;

use clap::Parser;

use crate::shared::{BPM_MAX, BPM_MIN, DEFAULT_BPM, StepCount};

/// Terminal step-sequencer drum machine
#[derive(Parser, Debug, Clone)]
#[command(name = "beatgrid", version, about)]
pub struct Args {
    /// Directory holding kit.json and the instrument WAVs (defaults to the current dir)
    #[arg(long, short = 'k')]
    pub kit: Option<PathBuf>,

    /// Starting tempo in beats per minute
    #[arg(long, default_value_t = DEFAULT_BPM, value_parser = parse_bpm)]
    pub bpm: f32,

    /// Starting number of live steps (4, 8 or 16)
    #[arg(long, default_value_t = 16, value_parser = parse_steps)]
    pub steps: usize,

    /// Write logs to this file (the terminal belongs to the ui); filter with RUST_LOG
    #[arg(long)]
    pub log: Option<PathBuf>,
}

impl Args {
    pub fn kit_dir(&self) -> PathBuf {
        self.kit
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
    }

    pub fn step_count(&self) -> StepCount {
        StepCount::from_len(self.steps).unwrap_or_default()
    }
}

fn parse_bpm(s: &str) -> Result<f32, String> {
    let bpm: f32 = s.parse().map_err(|e| format!("not a number: {e}"))?;
    if !(BPM_MIN..=BPM_MAX).contains(&bpm) {
        return Err(format!("bpm must be between {BPM_MIN} and {BPM_MAX}"));
    }
    Ok(bpm)
}

fn parse_steps(s: &str) -> Result<usize, String> {
    let steps: usize = s.parse().map_err(|e| format!("not a number: {e}"))?;
    StepCount::from_len(steps)
        .map(|_| steps)
        .ok_or_else(|| "steps must be 4, 8 or 16".to_string())
}
