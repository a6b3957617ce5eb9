//! Per-voice modulation transients.
//!
//! Two effects key off a voice's own sample counter (seconds since the voice
//! was activated):
//!
//! * the attack "scoop" - an exponentially decaying negative frequency offset
//!   that makes each note start slightly flat and slide up, the way a breath
//!   attack does on a flute;
//! * the swell - a slow amplitude wobble gated in only after the vibrato has
//!   settled, so held notes keep moving without disturbing the onset.
//!
//! Both are pure functions of time; the voice supplies `t` from its counter.

use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MIN_TIME;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendConfig {
    /// Peak frequency offset at t = 0, in Hz. Negative scoops downward.
    pub depth_hz: f32,
    /// Exponential decay time constant in seconds.
    pub tau: f32,
}

impl BendConfig {
    /// Disable the transient entirely.
    pub fn off() -> Self {
        Self { depth_hz: 0.0, tau: 0.04 }
    }
}

impl Default for BendConfig {
    fn default() -> Self {
        Self { depth_hz: -8.0, tau: 0.04 }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwellConfig {
    /// Wobble rate in Hz. Well below vibrato rate.
    pub rate_hz: f32,
    /// Peak fractional amplitude deviation.
    pub depth: f32,
    /// Seconds after voice activation before the swell starts opening.
    /// Must sit past the vibrato onset so the two fades never fight.
    pub onset_delay: f32,
    /// Seconds the gate takes to open fully.
    pub fade_time: f32,
}

impl SwellConfig {
    pub fn off() -> Self {
        Self { depth: 0.0, ..Self::default() }
    }
}

impl Default for SwellConfig {
    fn default() -> Self {
        Self {
            rate_hz: 0.8,
            depth: 0.12,
            onset_delay: 0.8,
            fade_time: 0.6,
        }
    }
}

/// Linear 0-to-1 gate opening after `delay` seconds over `fade` seconds.
#[inline]
pub fn onset_ramp(t: f32, delay: f32, fade: f32) -> f32 {
    if t <= delay {
        0.0
    } else if fade <= 0.0 {
        1.0
    } else {
        ((t - delay) / fade).min(1.0)
    }
}

/// Frequency offset of the attack scoop at `t` seconds after activation.
#[inline]
pub fn attack_scoop(config: &BendConfig, t: f32) -> f32 {
    if config.depth_hz == 0.0 {
        return 0.0;
    }
    config.depth_hz * (-t / config.tau.max(MIN_TIME)).exp()
}

/// Amplitude multiplier of the swell at `t` seconds after activation.
#[inline]
pub fn swell_factor(config: &SwellConfig, t: f32) -> f32 {
    let gate = onset_ramp(t, config.onset_delay, config.fade_time);
    if gate <= 0.0 || config.depth == 0.0 {
        return 1.0;
    }
    1.0 + config.depth * gate * (TAU * config.rate_hz * t).sin()
}
