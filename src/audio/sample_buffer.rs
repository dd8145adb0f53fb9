use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;

use super::frame::StereoFrame;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SampleId(pub u64);

// unique across threads, so the loader can hand out ids before the engine sees the buffer
pub fn next_sample_id() -> SampleId {
    SampleId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Decoded, device-rate stereo audio, ready for the engine.
#[derive(Clone, Debug, Default)]
pub struct SampleBuffer {
    pub data: Vec<StereoFrame>,
}

impl SampleBuffer {
    pub fn from_frames(data: Vec<StereoFrame>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Load a WAV file and bring it to `target_rate` stereo.
    pub fn load_wav(path: &Path, target_rate: u32) -> anyhow::Result<Self> {
        let mut reader = hound::WavReader::open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let max = (1i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|x| x as f32 / max))
                    .collect::<Result<Vec<_>, _>>()?
            }
            #[allow(unreachable_patterns)]
            other => anyhow::bail!("unsupported sample format: {other:?}"),
        };

        // mono gets duplicated, anything wider keeps its first two channels
        let frames: Vec<StereoFrame> = samples
            .chunks_exact(channels)
            .map(|c| match c {
                [x] => StereoFrame::mono(*x),
                [l, r, ..] => StereoFrame { left: *l, right: *r },
                [] => StereoFrame::zero(),
            })
            .collect();

        let data = if spec.sample_rate != target_rate {
            resample_linear(&frames, spec.sample_rate, target_rate)
        } else {
            frames
        };
        Ok(Self { data })
    }
}

// linear interpolation is plenty for one-shot drum hits
fn resample_linear(frames: &[StereoFrame], source_rate: u32, target_rate: u32) -> Vec<StereoFrame> {
    if source_rate == target_rate || frames.is_empty() || source_rate == 0 {
        return frames.to_vec();
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let out_len = (frames.len() as f64 * ratio).ceil() as usize;
    let last = frames.len() - 1;

    (0..out_len)
        .map(|i| {
            let src_pos = i as f64 / ratio;
            let idx = src_pos.floor() as usize;
            if idx >= last {
                frames[last]
            } else {
                let frac = (src_pos - idx as f64) as f32;
                StereoFrame::lerp(frames[idx], frames[idx + 1], frac)
            }
        })
        .collect()
}
