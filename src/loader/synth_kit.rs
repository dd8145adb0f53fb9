// Stand-in drum hits for instruments whose WAV is missing: a pitch-swept
// oscillator mixed with noise under an exponential decay, rendered once.

use crate::audio::{SampleBuffer, StereoFrame};
use crate::shared::Instrument;

#[derive(Clone, Copy, Debug)]
struct DrumShape {
    freq: f64,         // resting pitch in hz
    pitch_amount: f64, // extra hz at the attack, decays away
    pitch_decay: f32,  // per-sample multiplier for the pitch sweep
    noise_amount: f32, // 0 = pure tone, 1 = pure noise
    decay_secs: f32,   // time to fall to -60 dB
}

fn shape(instrument: Instrument) -> DrumShape {
    match instrument {
        Instrument::Kick => DrumShape { freq: 55.0, pitch_amount: 200.0, pitch_decay: 0.999, noise_amount: 0.05, decay_secs: 0.35 },
        Instrument::Snare => DrumShape { freq: 180.0, pitch_amount: 80.0, pitch_decay: 0.998, noise_amount: 0.6, decay_secs: 0.2 },
        Instrument::ClosedHat => DrumShape { freq: 800.0, pitch_amount: 0.0, pitch_decay: 0.999, noise_amount: 0.95, decay_secs: 0.06 },
        Instrument::OpenHat => DrumShape { freq: 800.0, pitch_amount: 0.0, pitch_decay: 0.999, noise_amount: 0.95, decay_secs: 0.35 },
        Instrument::Clap => DrumShape { freq: 400.0, pitch_amount: 50.0, pitch_decay: 0.997, noise_amount: 0.8, decay_secs: 0.12 },
        Instrument::Tom => DrumShape { freq: 100.0, pitch_amount: 150.0, pitch_decay: 0.9995, noise_amount: 0.1, decay_secs: 0.25 },
        Instrument::Rim => DrumShape { freq: 600.0, pitch_amount: 100.0, pitch_decay: 0.996, noise_amount: 0.3, decay_secs: 0.05 },
        Instrument::Cowbell => DrumShape { freq: 560.0, pitch_amount: 0.0, pitch_decay: 1.0, noise_amount: 0.0, decay_secs: 0.3 },
    }
}

pub fn render(instrument: Instrument, sample_rate: u32) -> SampleBuffer {
    let s = shape(instrument);
    let rate = sample_rate.max(1) as f32;
    let len = (s.decay_secs * rate).ceil() as usize;
    // reach 0.001 (-60 dB) after decay_secs
    let decay = 0.001f32.powf(1.0 / (s.decay_secs * rate));

    let mut phase = 0.0f64;
    let mut envelope = 1.0f32;
    let mut pitch_env = 1.0f32;
    let mut noise_state = instrument.index() as u32 + 1;

    let data = (0..len)
        .map(|_| {
            pitch_env *= s.pitch_decay;
            let freq = s.freq + s.pitch_amount * pitch_env as f64;
            let osc = (phase * std::f64::consts::TAU).sin() as f32;
            phase = (phase + freq / rate as f64).fract();

            noise_state = noise_state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let noise = (noise_state as f32 / u32::MAX as f32) * 2.0 - 1.0;

            let x = (osc * (1.0 - s.noise_amount) + noise * s.noise_amount) * envelope;
            envelope *= decay;
            StereoFrame::mono(x * 0.8)
        })
        .collect();

    SampleBuffer::from_frames(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_instrument_renders_a_bounded_decaying_hit() {
        for inst in Instrument::ALL {
            let buf = render(inst, 44_100);
            assert!(!buf.is_empty(), "{inst:?} rendered nothing");
            assert!(buf.data.iter().all(|f| f.left.abs() <= 1.0 && f.left == f.right));

            let tail = &buf.data[buf.len() - 64..];
            let head_peak = buf.data[..64].iter().map(|f| f.left.abs()).fold(0.0, f32::max);
            let tail_peak = tail.iter().map(|f| f.left.abs()).fold(0.0, f32::max);
            assert!(tail_peak < head_peak.max(0.01), "{inst:?} does not decay");
        }
    }

    #[test]
    fn length_follows_sample_rate() {
        let lo = render(Instrument::Kick, 22_050);
        let hi = render(Instrument::Kick, 44_100);
        assert!(hi.len() > lo.len() * 2 - 2);
    }
}
