use thiserror::Error;

pub use crate::audio::{SampleBuffer, SampleId};
use crate::shared::Instrument;

#[derive(Clone, Debug)]
pub struct TriggerParams {
    pub sample_id: SampleId,
    pub gain: f32,
}

#[derive(Clone, Debug)]
pub enum AudioCommand {
    // The engine can't load files (that would stall the audio thread), so a
    // decoded buffer is registered first and triggered by id afterwards.
    RegisterSample { id: SampleId, buffer: SampleBuffer },

    // Starts a fresh voice from frame 0; never cuts off voices already playing.
    Trigger(TriggerParams),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("no sample registered for {0:?}")]
    NotLoaded(Instrument),
    #[error("audio command queue is full")]
    QueueFull,
    #[error("audio engine is not running")]
    Disconnected,
}

/// Where the sequencer sends "play this instrument now". Implementations must
/// return immediately; the caller never waits on the sound itself.
pub trait SampleSink {
    fn play(&self, instrument: Instrument) -> Result<(), PlaybackError>;

    fn is_loaded(&self, instrument: Instrument) -> bool;
}

// used when there is no output device; the ui still works, it's just quiet
pub struct SilentSink;

impl SampleSink for SilentSink {
    fn play(&self, _instrument: Instrument) -> Result<(), PlaybackError> {
        Err(PlaybackError::Disconnected)
    }

    fn is_loaded(&self, _instrument: Instrument) -> bool {
        false
    }
}
