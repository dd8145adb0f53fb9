use std::collections::HashMap;

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::audio_api::{AudioCommand, PlaybackError, SampleSink, TriggerParams};
use crate::shared::Instrument;

mod engine;
mod frame;
mod sample_buffer;
mod voice;

pub use frame::StereoFrame;
pub use sample_buffer::{SampleBuffer, SampleId, next_sample_id};

use engine::Engine;

const COMMAND_CAPACITY: usize = 1024;

#[derive(Clone, Copy, Debug)]
struct Registered {
    sample_id: SampleId,
    gain: f32,
}

pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    sample_rate: u32,
    registered: HashMap<Instrument, Registered>,
    _output_stream: Option<cpal::Stream>, // none in tests, where nothing drains the channel
}

impl AudioHandle {
    fn new(tx: Sender<AudioCommand>, sample_rate: u32, stream: Option<cpal::Stream>) -> Self {
        Self {
            tx,
            sample_rate,
            registered: HashMap::new(),
            _output_stream: stream,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Hand a decoded buffer to the engine and remember which instrument it belongs to.
    pub fn register(&mut self, instrument: Instrument, buffer: SampleBuffer, gain: f32) -> Result<(), PlaybackError> {
        let id = next_sample_id();
        self.send(AudioCommand::RegisterSample { id, buffer })?;
        self.registered.insert(instrument, Registered { sample_id: id, gain });
        Ok(())
    }

    fn send(&self, cmd: AudioCommand) -> Result<(), PlaybackError> {
        self.tx.try_send(cmd).map_err(|e| match e {
            TrySendError::Full(_) => PlaybackError::QueueFull,
            TrySendError::Disconnected(_) => PlaybackError::Disconnected,
        })
    }
}

impl SampleSink for AudioHandle {
    fn play(&self, instrument: Instrument) -> Result<(), PlaybackError> {
        let reg = self
            .registered
            .get(&instrument)
            .ok_or(PlaybackError::NotLoaded(instrument))?;
        self.send(AudioCommand::Trigger(TriggerParams {
            sample_id: reg.sample_id,
            gain: reg.gain,
        }))
    }

    fn is_loaded(&self, instrument: Instrument) -> bool {
        self.registered.contains_key(&instrument)
    }
}

pub fn start_audio() -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(COMMAND_CAPACITY);

    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let config = device.default_output_config().context("no default output config")?;

    let sample_rate: u32 = config.sample_rate();
    let channels = config.channels() as usize;

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let stream = build_output_stream_f32(&device, &config.into(), rx, channels)?;
            stream.play().context("failed to play output stream")?;
            tracing::info!(sample_rate, channels, "audio output started");
            Ok(AudioHandle::new(tx, sample_rate, Some(stream)))
        }
        other => anyhow::bail!("unsupported sample format {other:?} (only f32 supported)"),
    }
}

// ── Output stream ─────────────────────────────────────────────────

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    let mut engine = Engine::new();

    let err_fn = |err| tracing::error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| {
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }
            engine.render_interleaved(data, channels);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detached(capacity: usize) -> (AudioHandle, Receiver<AudioCommand>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (AudioHandle::new(tx, 44_100, None), rx)
    }

    #[test]
    fn unregistered_instrument_is_not_loaded() {
        let (handle, _rx) = detached(8);
        assert!(!handle.is_loaded(Instrument::Kick));
        assert_eq!(
            handle.play(Instrument::Kick),
            Err(PlaybackError::NotLoaded(Instrument::Kick))
        );
    }

    #[test]
    fn play_sends_a_trigger_with_the_registered_id() {
        let (mut handle, rx) = detached(8);
        handle.register(Instrument::Snare, SampleBuffer::default(), 0.5).unwrap();
        let AudioCommand::RegisterSample { id, .. } = rx.try_recv().unwrap() else {
            panic!("expected a registration first");
        };

        handle.play(Instrument::Snare).unwrap();
        handle.play(Instrument::Snare).unwrap();
        for _ in 0..2 {
            match rx.try_recv().unwrap() {
                AudioCommand::Trigger(t) => {
                    assert_eq!(t.sample_id, id);
                    assert_eq!(t.gain, 0.5);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn full_queue_and_dead_engine_are_reported() {
        let (mut handle, rx) = detached(1);
        handle.register(Instrument::Tom, SampleBuffer::default(), 1.0).unwrap();
        assert_eq!(handle.play(Instrument::Tom), Err(PlaybackError::QueueFull));
        drop(rx);
        assert_eq!(handle.play(Instrument::Tom), Err(PlaybackError::Disconnected));
    }
}
