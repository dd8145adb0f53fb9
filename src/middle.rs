// The middle layer: owns the sequencer state and is the only thing allowed to
// change it. The tui hands it InputEvents, the clock hands it ClockTicks, and
// it answers with a DisplayState snapshot for the next frame.

use crossbeam_channel::Sender;

use crate::audio_api::SampleSink;
use crate::pipeline::clock::{ClockTick, Ticker};
use crate::pipeline::kit::Kit;
use crate::pipeline::project::ProjectState;
use crate::pipeline::transport::{TransportState, clamp_bpm, step_interval};
use crate::shared::{
    DisplayState, InputEvent, Instrument, InstrumentDisplay, NUM_INSTRUMENTS, StepCount,
    TransportDisplay,
};

// how long a pad stays lit after it sounds
const FLASH_SECS: f64 = 0.12;

pub struct Middle {
    pub state: ProjectState,
    sink: Box<dyn SampleSink>,
    ticker: Ticker,
    confirm_reset_pending: bool,
    flash: [f64; NUM_INSTRUMENTS], // seconds of highlight left per instrument
    instruments: Vec<InstrumentDisplay>,
    display: DisplayState,
}

impl Middle {
    pub fn new(
        state: ProjectState,
        kit: &Kit,
        sink: Box<dyn SampleSink>,
        tick_tx: Sender<ClockTick>,
    ) -> Self {
        let instruments = kit
            .entries()
            .iter()
            .map(|entry| InstrumentDisplay {
                instrument: entry.instrument,
                label: entry.instrument.label(),
                color: entry.color,
                loaded: sink.is_loaded(entry.instrument),
            })
            .collect();
        let mut middle = Self {
            state,
            sink,
            ticker: Ticker::new(tick_tx),
            confirm_reset_pending: false,
            flash: [0.0; NUM_INSTRUMENTS],
            instruments,
            display: DisplayState {
                cells: Default::default(),
                step_count: StepCount::default(),
                playing_step: None,
                transport: TransportDisplay::Stopped,
                bpm: 0.0,
                instruments: Vec::new(),
                fired: [false; NUM_INSTRUMENTS],
                confirm_reset_pending: false,
            },
        };
        middle.refresh_display();
        middle
    }

    pub fn display_state(&self) -> &DisplayState {
        &self.display
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::ToggleStep { row, col } => {
                if let Err(e) = self.state.grid.toggle(row, col) {
                    tracing::warn!("toggle ignored: {e}");
                }
            }
            InputEvent::ResetRow(row) => {
                if let Err(e) = self.state.grid.reset_row(row) {
                    tracing::warn!("row reset ignored: {e}");
                }
            }
            InputEvent::RequestResetAll => self.confirm_reset_pending = true,
            InputEvent::ConfirmResetAll => {
                if self.confirm_reset_pending {
                    self.state.grid.reset_all();
                    tracing::info!("pattern cleared");
                }
                self.confirm_reset_pending = false;
            }
            InputEvent::CancelResetAll => self.confirm_reset_pending = false,
            InputEvent::PlayPress => {
                if self.state.transport.is_running() {
                    self.stop();
                } else {
                    self.start();
                }
            }
            InputEvent::SetStepCount(step_count) => self.set_step_count(step_count),
            InputEvent::CycleStepCount => self.set_step_count(self.state.step_count.next()),
            InputEvent::AdjustBpm(delta) => self.set_bpm(self.state.bpm + delta),
            InputEvent::SetBpm(bpm) => self.set_bpm(bpm),
            InputEvent::TriggerPad(instrument) => self.play(instrument),
            InputEvent::Quit => self.stop(),
        }
        self.refresh_display();
    }

    /// A tick from the clock thread. Ticks from a cancelled or replaced timer
    /// are dropped here.
    pub fn on_clock_tick(&mut self, tick: ClockTick) {
        if !self.ticker.is_current(tick) {
            tracing::trace!(
                stale = tick.generation,
                current = self.ticker.generation(),
                "dropping stale tick"
            );
            return;
        }
        self.tick();
    }

    /// Advance the transport one step and fire every active cell in the new column.
    pub fn tick(&mut self) -> Option<u8> {
        let step = self.state.transport.tick(self.state.step_count)?;
        let hits: Vec<Instrument> = self
            .state
            .grid
            .live_column(step as usize, self.state.step_count)
            .collect();
        for instrument in hits {
            self.play(instrument);
        }
        self.refresh_display();
        Some(step)
    }

    /// Called once per ui frame with the time since the last one; only fades
    /// the pad highlights, sequencing is driven by the clock.
    pub fn advance_frame(&mut self, elapsed: f64) {
        let before = self.flash.iter().any(|f| *f > 0.0);
        for f in &mut self.flash {
            *f = (*f - elapsed).max(0.0);
        }
        if before {
            self.refresh_display();
        }
    }

    #[cfg(test)]
    pub fn clock_generation(&self) -> u64 {
        self.ticker.generation()
    }

    fn start(&mut self) {
        self.state.transport.start();
        self.ticker.start(step_interval(self.state.bpm));
        tracing::info!(
            bpm = self.state.bpm,
            steps = self.state.step_count.len(),
            interval = ?self.ticker.interval(),
            "transport started"
        );
    }

    fn stop(&mut self) {
        if self.state.transport.is_running() {
            tracing::info!("transport stopped");
        }
        self.state.transport.stop();
        self.ticker.cancel();
    }

    fn set_step_count(&mut self, step_count: StepCount) {
        if step_count == self.state.step_count {
            return;
        }
        // switching resolution interrupts playback
        self.stop();
        self.state.step_count = step_count;
    }

    fn set_bpm(&mut self, bpm: f32) {
        let bpm = clamp_bpm(bpm);
        if bpm == self.state.bpm {
            return;
        }
        self.state.bpm = bpm;
        if self.ticker.is_running() {
            // restart at the new period; the step index carries on from where it was
            self.ticker.start(step_interval(bpm));
        }
    }

    // fire and forget: a failed hit never stops the others or the transport
    fn play(&mut self, instrument: Instrument) {
        self.flash[instrument.index()] = FLASH_SECS;
        if let Err(e) = self.sink.play(instrument) {
            tracing::debug!("{instrument:?} did not play: {e}");
        }
    }

    fn refresh_display(&mut self) {
        let transport = match self.state.transport.state() {
            TransportState::Running(_) => TransportDisplay::Running,
            TransportState::Stopped => TransportDisplay::Stopped,
        };
        self.display = DisplayState {
            cells: self.state.grid.cells(),
            step_count: self.state.step_count,
            playing_step: self.state.transport.current_step(),
            transport,
            bpm: self.state.bpm,
            instruments: self.instruments.clone(),
            fired: self.flash.map(|f| f > 0.0),
            confirm_reset_pending: self.confirm_reset_pending,
        };
    }
}
