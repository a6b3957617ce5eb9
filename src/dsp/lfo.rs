//! Shared vibrato LFO.
//!
//! One engine-wide phase drives the vibrato of every voice, so simultaneous
//! notes breathe together instead of each wobbling independently. The phase
//! advances once per buffer by `2π × rate × buffer_seconds` and resets to
//! zero whenever the voice table empties, so a new phrase starts
//! vibrato-neutral.
//!
//! Vibrato here is frequency modulation: the factor below multiplies each
//! voice's instantaneous frequency before the phase increment is computed.
//! Depth fades in per voice after a short "breath onset" delay measured from
//! that voice's own activation, not from global LFO time.

use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibratoConfig {
    /// LFO rate in Hz.
    pub rate_hz: f32,
    /// Peak fractional frequency deviation (0.01 = ±1%).
    pub depth: f32,
    /// Seconds after voice activation before the depth starts fading in.
    pub onset_delay: f32,
    /// Seconds the fade-in takes to reach full depth.
    pub fade_time: f32,
}

impl Default for VibratoConfig {
    fn default() -> Self {
        Self {
            rate_hz: 5.0,
            depth: 0.01,
            onset_delay: 0.2,
            fade_time: 0.3,
        }
    }
}

/// Advance the shared phase by `elapsed` seconds, wrapped into [0, 2π).
#[inline]
pub fn advance_phase(phase: f32, rate_hz: f32, elapsed: f32) -> f32 {
    (phase + TAU * rate_hz * elapsed).rem_euclid(TAU)
}

/// Frequency multiplier at `t` seconds into the current buffer.
///
/// `depth_scale` is the per-voice onset fade (0.0 = vibrato not yet engaged,
/// 1.0 = full depth).
#[inline]
pub fn frequency_factor(phase: f32, config: &VibratoConfig, t: f32, depth_scale: f32) -> f32 {
    1.0 + config.depth * depth_scale * (phase + TAU * config.rate_hz * t).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_wraps_into_range() {
        let mut phase = 0.0;
        for _ in 0..1000 {
            phase = advance_phase(phase, 5.0, 1024.0 / 48_000.0);
            assert!((0.0..TAU).contains(&phase));
        }
    }

    #[test]
    fn factor_stays_within_depth_bounds() {
        let config = VibratoConfig::default();
        for i in 0..200 {
            let factor = frequency_factor(1.3, &config, i as f32 * 0.001, 1.0);
            assert!(factor >= 1.0 - config.depth - 1e-6);
            assert!(factor <= 1.0 + config.depth + 1e-6);
        }
    }

    #[test]
    fn zero_depth_scale_disables_modulation() {
        let config = VibratoConfig::default();
        assert_eq!(frequency_factor(2.0, &config, 0.01, 0.0), 1.0);
    }
}
