use std::time::Duration;

use crate::shared::{BPM_MAX, BPM_MIN, StepCount};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    // none until the first tick lands
    Running(Option<u8>),
}

/// Step-index state machine. Pure bookkeeping: whoever owns the clock calls
/// `tick` once per interval.
#[derive(Debug, Clone)]
pub struct Transport {
    state: TransportState,
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport {
    pub fn new() -> Self {
        Self {
            state: TransportState::Stopped,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TransportState::Running(_))
    }

    pub fn current_step(&self) -> Option<u8> {
        match self.state {
            TransportState::Running(step) => step,
            TransportState::Stopped => None,
        }
    }

    pub fn start(&mut self) {
        if let TransportState::Stopped = self.state {
            self.state = TransportState::Running(None);
        }
    }

    pub fn stop(&mut self) {
        self.state = TransportState::Stopped;
    }

    /// Advance one step, wrapping at `step_count`. Returns the new step, or
    /// none when stopped.
    pub fn tick(&mut self, step_count: StepCount) -> Option<u8> {
        let TransportState::Running(current) = self.state else {
            return None;
        };
        let len = step_count.len() as u8;
        let next = match current {
            None => 0,
            Some(step) => (step + 1) % len,
        };
        self.state = TransportState::Running(Some(next));
        Some(next)
    }
}

pub fn clamp_bpm(bpm: f32) -> f32 {
    if bpm.is_nan() {
        return BPM_MIN;
    }
    bpm.clamp(BPM_MIN, BPM_MAX)
}

/// One step is half a beat.
pub fn step_interval(bpm: f32) -> Duration {
    Duration::from_secs_f32(60.0 / clamp_bpm(bpm) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_lazily_with_no_step() {
        let mut transport = Transport::new();
        assert_eq!(transport.current_step(), None);
        transport.start();
        assert!(transport.is_running());
        assert_eq!(transport.current_step(), None);
    }

    #[test]
    fn nth_tick_lands_on_n_minus_one_mod_step_count() {
        let mut transport = Transport::new();
        transport.start();
        for n in 1..=20u32 {
            let step = transport.tick(StepCount::Eight);
            assert_eq!(step, Some(((n - 1) % 8) as u8));
            assert_eq!(transport.current_step(), step);
        }
    }

    #[test]
    fn tick_while_stopped_does_nothing() {
        let mut transport = Transport::new();
        assert_eq!(transport.tick(StepCount::Four), None);
        assert_eq!(transport.state(), TransportState::Stopped);
    }

    #[test]
    fn stop_clears_the_step() {
        let mut transport = Transport::new();
        transport.start();
        transport.tick(StepCount::Sixteen);
        transport.tick(StepCount::Sixteen);
        transport.stop();
        assert_eq!(transport.current_step(), None);
        transport.start();
        assert_eq!(transport.tick(StepCount::Sixteen), Some(0));
    }

    #[test]
    fn start_while_running_keeps_position() {
        let mut transport = Transport::new();
        transport.start();
        transport.tick(StepCount::Sixteen);
        transport.tick(StepCount::Sixteen);
        transport.start();
        assert_eq!(transport.current_step(), Some(1));
    }

    #[test]
    fn interval_is_half_a_beat() {
        assert_eq!(step_interval(120.0), Duration::from_millis(250));
        assert_eq!(step_interval(60.0), Duration::from_millis(500));
    }

    #[test]
    fn bpm_is_clamped_into_range() {
        assert_eq!(clamp_bpm(10.0), BPM_MIN);
        assert_eq!(clamp_bpm(1000.0), BPM_MAX);
        assert_eq!(clamp_bpm(f32::NAN), BPM_MIN);
        assert_eq!(clamp_bpm(133.0), 133.0);
    }
}
