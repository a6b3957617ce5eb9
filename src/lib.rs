pub mod dsp;
pub mod io; // Audio device boundary
pub mod synth; // Voice management and the additive engine

pub use synth::engine::{AdditiveSynth, EngineConfig};
pub use synth::shared::SharedSynth;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
