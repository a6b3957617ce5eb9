use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Additive Harmonic Stack
=======================

The raw waveform of every voice is a weighted sum of sine partials:

    sample = Σ  weight[k] × sin(phase × multiple[k])

The fundamental plus a handful of overtones is enough to approximate a
reed-flute timbre. Two voicings ship with the crate:

  reed (default)   1.00 / 0.50 / 0.08 / 0.02  at partials 1, 2, 3, 4
                   Strong octave, faint upper partials - a clean, hollow tone.

  breathy          0.60 / 0.20 / 0.55 / 0.15  at partials 1, 2, 3, 5
                   Heavy 3rd partial and a 5th-partial shimmer - reedier,
                   closer to an over-blown bamboo flute.

The stack is a timbral constant: it is chosen at engine construction and
never changes for the engine's lifetime. Per-voice weight switching is not
supported.

Phase Accumulation
------------------

Each voice carries its own phase accumulator. Per sample:

    phase += 2π × f_inst / sample_rate

where f_inst is the nominal frequency after the vibrato and bend modulation.
The accumulator persists across buffers and wraps modulo 2π only at buffer
boundaries - never mid-buffer, and never resets except at voice creation.
This is what keeps the waveform continuous when notes are held across many
render calls.
*/

/// One component of the harmonic stack.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    /// Frequency multiple of the fundamental (1.0 = fundamental).
    pub multiple: f32,
    /// Linear amplitude weight.
    pub weight: f32,
}

/// A fixed set of weighted sine partials evaluated per phase value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicStack {
    partials: Vec<Partial>,
}

impl HarmonicStack {
    pub fn new(partials: Vec<Partial>) -> Self {
        Self { partials }
    }

    /// The default reed voicing.
    pub fn reed() -> Self {
        Self::new(vec![
            Partial { multiple: 1.0, weight: 1.0 },
            Partial { multiple: 2.0, weight: 0.5 },
            Partial { multiple: 3.0, weight: 0.08 },
            Partial { multiple: 4.0, weight: 0.02 },
        ])
    }

    /// A reedier, over-blown voicing.
    pub fn breathy() -> Self {
        Self::new(vec![
            Partial { multiple: 1.0, weight: 0.6 },
            Partial { multiple: 2.0, weight: 0.2 },
            Partial { multiple: 3.0, weight: 0.55 },
            Partial { multiple: 5.0, weight: 0.15 },
        ])
    }

    /// Evaluate the stack at one phase value.
    #[inline]
    pub fn evaluate(&self, phase: f32) -> f32 {
        self.partials
            .iter()
            .map(|p| p.weight * (phase * p.multiple).sin())
            .sum()
    }

    pub fn partials(&self) -> &[Partial] {
        &self.partials
    }
}

impl Default for HarmonicStack {
    fn default() -> Self {
        Self::reed()
    }
}

/// Per-sample phase advance for a frequency at a sample rate.
#[inline]
pub fn phase_increment(frequency: f32, sample_rate: f32) -> f32 {
    TAU * frequency / sample_rate
}

/// Wrap an accumulated phase back into [0, 2π).
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    phase.rem_euclid(TAU)
}
