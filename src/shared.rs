// Vocabulary shared between the tui, the middle layer and the audio side.
//
// Key plan (resolved into semantic events by tui/input.rs):
//   arrows / h j k l   //  move the grid cursor
//   Enter / x          //  ToggleStep at the cursor
//   c                  //  ResetRow at the cursor row
//   C                  //  RequestResetAll, then y = ConfirmResetAll, n / Esc = CancelResetAll
//   Space              //  PlayPress
//   s                  //  CycleStepCount (4 -> 8 -> 16)
//   F1 / F2 / F3       //  SetStepCount(4 / 8 / 16)
//   - / =              //  AdjustBpm(-1 / +1)
//   _ / +              //  AdjustBpm(-10 / +10)
//   t                  //  SetBpm(default)
//   1 .. 8             //  TriggerPad(instrument)
//   Esc / q            //  Quit
//
// The middle layer owns every bit of sequencer state; the tui only draws the
// DisplayState snapshot it gets back each frame.

use serde::Deserialize;

pub const MAX_STEPS: usize = 16; // row capacity, never resized
pub const NUM_INSTRUMENTS: usize = 8;

pub const BPM_MIN: f32 = 40.0;
pub const BPM_MAX: f32 = 240.0;
pub const DEFAULT_BPM: f32 = 120.0;

/// The closed set of drum voices. The discriminant doubles as the grid row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    Kick,
    Snare,
    ClosedHat,
    OpenHat,
    Clap,
    Tom,
    Rim,
    Cowbell,
}

impl Instrument {
    pub const ALL: [Instrument; NUM_INSTRUMENTS] = [
        Instrument::Kick,
        Instrument::Snare,
        Instrument::ClosedHat,
        Instrument::OpenHat,
        Instrument::Clap,
        Instrument::Tom,
        Instrument::Rim,
        Instrument::Cowbell,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Instrument::Kick => "KICK",
            Instrument::Snare => "SNARE",
            Instrument::ClosedHat => "CH",
            Instrument::OpenHat => "OH",
            Instrument::Clap => "CLAP",
            Instrument::Tom => "TOM",
            Instrument::Rim => "RIM",
            Instrument::Cowbell => "BELL",
        }
    }

    // default file name looked up in the kit directory
    pub fn file_stem(self) -> &'static str {
        match self {
            Instrument::Kick => "kick",
            Instrument::Snare => "snare",
            Instrument::ClosedHat => "closed_hat",
            Instrument::OpenHat => "open_hat",
            Instrument::Clap => "clap",
            Instrument::Tom => "tom",
            Instrument::Rim => "rim",
            Instrument::Cowbell => "cowbell",
        }
    }
}

/// How many leading steps of every row are live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StepCount {
    Four,
    Eight,
    #[default]
    Sixteen,
}

impl StepCount {
    pub fn len(self) -> usize {
        match self {
            StepCount::Four => 4,
            StepCount::Eight => 8,
            StepCount::Sixteen => 16,
        }
    }

    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            4 => Some(StepCount::Four),
            8 => Some(StepCount::Eight),
            16 => Some(StepCount::Sixteen),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            StepCount::Four => StepCount::Eight,
            StepCount::Eight => StepCount::Sixteen,
            StepCount::Sixteen => StepCount::Four,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    // grid editing
    ToggleStep { row: usize, col: usize },
    ResetRow(usize),

    // bulk reset is two-phase: request, then confirm or cancel
    RequestResetAll,
    ConfirmResetAll,
    CancelResetAll,

    // transport
    PlayPress, // start when stopped, stop when running
    SetStepCount(StepCount),
    CycleStepCount,
    AdjustBpm(f32), // delta in bpm
    SetBpm(f32),

    // pads
    TriggerPad(Instrument),

    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportDisplay {
    Stopped,
    Running,
}

#[derive(Clone, Debug)]
pub struct InstrumentDisplay {
    pub instrument: Instrument,
    pub label: &'static str,
    pub color: (u8, u8, u8),
    pub loaded: bool, // false when the sample never made it to the engine
}

#[derive(Clone, Debug)]
pub struct DisplayState {
    pub cells: [[bool; MAX_STEPS]; NUM_INSTRUMENTS], // full stored grid, the view slices it
    pub step_count: StepCount,
    pub playing_step: Option<u8>, // none until the first tick after start
    pub transport: TransportDisplay,
    pub bpm: f32,
    pub instruments: Vec<InstrumentDisplay>,
    pub fired: [bool; NUM_INSTRUMENTS], // instruments hit on the latest tick or pad press
    pub confirm_reset_pending: bool,
}

impl DisplayState {
    pub fn is_running(&self) -> bool {
        self.transport == TransportDisplay::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instrument_index_round_trips_through_all() {
        for (i, inst) in Instrument::ALL.iter().enumerate() {
            assert_eq!(inst.index(), i);
            assert_eq!(Instrument::from_index(i), Some(*inst));
        }
        assert_eq!(Instrument::from_index(NUM_INSTRUMENTS), None);
    }

    #[test]
    fn step_count_cycles_through_supported_lengths() {
        let mut sc = StepCount::Four;
        let mut seen = vec![];
        for _ in 0..3 {
            seen.push(sc.len());
            sc = sc.next();
        }
        assert_eq!(seen, vec![4, 8, 16]);
        assert_eq!(sc, StepCount::Four);
    }

    #[test]
    fn step_count_rejects_unsupported_lengths() {
        assert_eq!(StepCount::from_len(8), Some(StepCount::Eight));
        assert_eq!(StepCount::from_len(12), None);
        assert_eq!(StepCount::from_len(0), None);
    }
}
