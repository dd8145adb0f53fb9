use std::path::Path;

use crate::audio::SampleBuffer;
use crate::pipeline::kit::Kit;
use crate::shared::Instrument;

use super::synth_kit;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleSource {
    File,
    Synth,
}

pub struct LoadedSample {
    pub instrument: Instrument,
    pub buffer: SampleBuffer,
    pub gain: f32,
    pub source: SampleSource,
}

// Load a WAV from disk, prepared for registration with the engine
pub fn load(path: &Path, target_rate: u32) -> anyhow::Result<SampleBuffer> {
    SampleBuffer::load_wav(path, target_rate)
}

/// Decode every instrument of the kit. An unreadable or missing file is not
/// fatal: that instrument gets a synthesized hit instead.
pub fn load_kit(kit: &Kit, target_rate: u32) -> Vec<LoadedSample> {
    kit.entries()
        .iter()
        .map(|entry| {
            let (buffer, source) = match load(&entry.sample_path, target_rate) {
                Ok(buffer) if !buffer.is_empty() => (buffer, SampleSource::File),
                Ok(_) => {
                    tracing::warn!(path = %entry.sample_path.display(), "empty sample, using synthesized {:?}", entry.instrument);
                    (synth_kit::render(entry.instrument, target_rate), SampleSource::Synth)
                }
                Err(e) => {
                    tracing::info!(path = %entry.sample_path.display(), "no usable sample ({e:#}), using synthesized {:?}", entry.instrument);
                    (synth_kit::render(entry.instrument, target_rate), SampleSource::Synth)
                }
            };
            LoadedSample {
                instrument: entry.instrument,
                buffer,
                gain: entry.gain,
                source,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_fall_back_to_synth_and_present_ones_load() {
        let dir = tempfile::tempdir().unwrap();
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(dir.path().join("kick.wav"), spec).unwrap();
        for _ in 0..10 {
            writer.write_sample(1000i16).unwrap();
        }
        writer.finalize().unwrap();

        let kit = Kit::defaults(dir.path());
        let loaded = load_kit(&kit, 44_100);
        assert_eq!(loaded.len(), Instrument::ALL.len());

        let kick = &loaded[Instrument::Kick.index()];
        assert_eq!(kick.instrument, Instrument::Kick);
        assert_eq!(kick.source, SampleSource::File);
        assert_eq!(kick.buffer.len(), 10);

        for sample in &loaded[1..] {
            assert_eq!(sample.source, SampleSource::Synth);
            assert!(!sample.buffer.is_empty());
        }
    }
}
