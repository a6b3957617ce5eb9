//! Master-bus saturation.
//!
//! The voice sum is unbounded - eight voices near full envelope can stack
//! well past ±1.0. Instead of hard-clipping (which adds harsh odd harmonics
//! and audible edges), the master stage runs the mix through a hyperbolic
//! tangent. tanh is linear near zero, compresses peaks smoothly, and is
//! strictly bounded in (-1, 1), so the output can never clip digitally.
//!
//! `drive` is a pre-gain applied before the curve. At 1.0 the knee only
//! engages on loud mixes; values above 1.0 push the signal into the curve
//! earlier for a warmer, denser sound.

/// Saturate one sample: `tanh(sample × drive)`.
#[inline]
pub fn soft_clip(sample: f32, drive: f32) -> f32 {
    (sample * drive).tanh()
}

/// Saturate an entire buffer in place.
pub fn soft_clip_buffer(buffer: &mut [f32], drive: f32) {
    for sample in buffer.iter_mut() {
        *sample = soft_clip(*sample, drive);
    }
}
