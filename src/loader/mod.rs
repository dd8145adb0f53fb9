pub mod sample_loader;
pub mod synth_kit;
