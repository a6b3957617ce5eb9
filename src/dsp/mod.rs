//! Low-level DSP primitives used by the voice and engine layers.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs and to call from an audio callback.
//! They intentionally stay focused on the signal-processing math so the synth
//! layer can layer on voice lifecycle and channel-gain decisions.

/// Master-bus saturation (tanh soft clip).
pub mod distortion;
/// Two-state linear gate ramp (attack/release envelope).
pub mod envelope;
/// Shared vibrato LFO helpers.
pub mod lfo;
/// Buffer summing and scaling primitives.
pub mod mix;
/// Per-voice modulation transients: onset ramps, attack scoop, swell.
pub mod modulate;
/// Harmonic-stack additive oscillator and phase math.
pub mod oscillator;
