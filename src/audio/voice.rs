use super::frame::StereoFrame;
use super::sample_buffer::{SampleBuffer, SampleId};

/// One playback of one sample. Every trigger gets its own voice, so two hits
/// of the same instrument never share a play position.
#[derive(Clone, Debug)]
pub struct Voice {
    pub sample_id: SampleId,
    pub pos: usize,
    pub gain: f32,
    pub active: bool,
    pub started_at: u64, // engine frame counter at trigger time, used for stealing
}

impl Voice {
    pub fn new(sample_id: SampleId, gain: f32, started_at: u64) -> Self {
        Self {
            sample_id,
            pos: 0,
            gain,
            active: true,
            started_at,
        }
    }

    /// Mix this voice into `out`, deactivating it once the sample runs out.
    pub fn render_into(&mut self, buffer: &SampleBuffer, out: &mut [StereoFrame]) {
        if !self.active {
            return;
        }
        let remaining = buffer.data.get(self.pos..).unwrap_or(&[]);
        let n = remaining.len().min(out.len());
        for (frame, sample) in out.iter_mut().zip(&remaining[..n]) {
            frame.left += sample.left * self.gain;
            frame.right += sample.right * self.gain;
        }
        self.pos += n;
        if self.pos >= buffer.data.len() {
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> SampleBuffer {
        SampleBuffer::from_frames((0..len).map(|i| StereoFrame::mono(i as f32)).collect())
    }

    #[test]
    fn renders_from_the_start_with_gain() {
        let buf = ramp(4);
        let mut voice = Voice::new(SampleId(0), 0.5, 0);
        let mut out = [StereoFrame::zero(); 2];
        voice.render_into(&buf, &mut out);
        assert_eq!(out, [StereoFrame::mono(0.0), StereoFrame::mono(0.5)]);
        assert_eq!(voice.pos, 2);
        assert!(voice.active);
    }

    #[test]
    fn finishes_when_sample_runs_out() {
        let buf = ramp(3);
        let mut voice = Voice::new(SampleId(0), 1.0, 0);
        let mut out = [StereoFrame::zero(); 8];
        voice.render_into(&buf, &mut out);
        assert!(!voice.active);
        assert_eq!(out[2], StereoFrame::mono(2.0));
        assert_eq!(out[3], StereoFrame::zero());
    }

    #[test]
    fn empty_buffer_kills_the_voice() {
        let mut voice = Voice::new(SampleId(0), 1.0, 0);
        let mut out = [StereoFrame::zero(); 4];
        voice.render_into(&SampleBuffer::default(), &mut out);
        assert!(!voice.active);
    }
}
