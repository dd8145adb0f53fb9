use std::collections::HashMap;

use crate::audio_api::{AudioCommand, TriggerParams};
use crate::shared::NUM_INSTRUMENTS;

use super::frame::StereoFrame;
use super::sample_buffer::{SampleBuffer, SampleId};
use super::voice::Voice;

pub const MAX_VOICES: usize = 32; // hard cap so we wont malloc in the audio callback
const BLOCK_FRAMES: usize = 4096; // device buffers bigger than this are mixed in slices

pub struct Engine {
    samples: HashMap<SampleId, SampleBuffer>,
    voices: Vec<Voice>, // capacity MAX_VOICES, reserved up front
    scratch: Vec<StereoFrame>,
    frames_rendered: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            // one slot per instrument, so registering never grows the table
            samples: HashMap::with_capacity(NUM_INSTRUMENTS),
            voices: Vec::with_capacity(MAX_VOICES),
            scratch: vec![StereoFrame::zero(); BLOCK_FRAMES],
            frames_rendered: 0,
        }
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::RegisterSample { id, buffer } => {
                self.samples.insert(id, buffer);
            }
            AudioCommand::Trigger(t) => self.trigger_voice(t),
        }
    }

    fn trigger_voice(&mut self, t: TriggerParams) {
        if !self.samples.contains_key(&t.sample_id) {
            return;
        }
        let voice = Voice::new(t.sample_id, t.gain, self.frames_rendered);

        if self.voices.len() < MAX_VOICES {
            self.voices.push(voice);
            return;
        }
        // pool is full: steal the oldest voice
        if let Some(oldest) = self.voices.iter_mut().min_by_key(|v| v.started_at) {
            *oldest = voice;
        }
    }

    #[cfg(test)]
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Mix every live voice into `out` (which gets overwritten).
    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        out.fill(StereoFrame::zero());
        for voice in &mut self.voices {
            match self.samples.get(&voice.sample_id) {
                Some(buffer) => voice.render_into(buffer, out),
                None => voice.active = false,
            }
        }
        self.voices.retain(|v| v.active);
        self.frames_rendered += out.len() as u64;
    }

    /// Render into an interleaved device buffer with any channel count.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let mut scratch = std::mem::take(&mut self.scratch);

        for chunk in data.chunks_mut(BLOCK_FRAMES * channels) {
            let block = &mut scratch[..chunk.len() / channels];
            self.render_block(block);

            for (out, frame) in chunk.chunks_exact_mut(channels).zip(block.iter()) {
                match out {
                    [mono] => *mono = (frame.left + frame.right) * 0.5,
                    [l, r, rest @ ..] => {
                        *l = frame.left;
                        *r = frame.right;
                        rest.fill(0.0);
                    }
                    [] => {}
                }
            }
        }
        self.scratch = scratch;
    }
}
