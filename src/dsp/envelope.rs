use crate::MIN_TIME;

/*
Gate Ramp Envelope
==================

A two-state amplitude envelope driven by a single input: whether the voice's
frequency is currently targeted (the "gate").

  gate high   →  level ramps up linearly at 1/attack_samples per sample,
                 clamped to 1.0. Holding at 1.0 while gated IS sustain -
                 there is no separate sustain state.
  gate low    →  level ramps down linearly at 1/release_samples per sample,
                 clamped to 0.0.

The ramp is computed per sample across the whole buffer, not once per buffer,
so the audible slope stays smooth inside a single block. The stored level is
always the LAST sample's value, which makes consecutive buffers compose into
one continuous ramp regardless of block size.

Re-gating a half-released voice resumes the attack from the current level.
Never reset the level on re-gate - a reset is exactly the click this envelope
exists to prevent.
*/

#[derive(Debug, Clone)]
pub struct Envelope {
    attack_step: f32,
    release_step: f32,
    level: f32,
}

impl Envelope {
    pub fn new(sample_rate: f32, attack: f32, release: f32) -> Self {
        Self {
            attack_step: 1.0 / (attack.max(MIN_TIME) * sample_rate),
            release_step: 1.0 / (release.max(MIN_TIME) * sample_rate),
            level: 0.0,
        }
    }

    /// Advance one sample toward the gate target, returning the new level.
    #[inline]
    pub fn advance(&mut self, gated: bool) -> f32 {
        if gated {
            self.level = (self.level + self.attack_step).min(1.0);
        } else {
            self.level = (self.level - self.release_step).max(0.0);
        }
        self.level
    }

    /// Fill `out` with the ramp over one block. The stored level afterwards is
    /// the last sample's value.
    pub fn render(&mut self, out: &mut [f32], gated: bool) {
        for sample in out.iter_mut() {
            *sample = self.advance(gated);
        }
        debug_assert!((0.0..=1.0).contains(&self.level));
    }

    /// Current level (0.0 to 1.0).
    pub fn level(&self) -> f32 {
        self.level
    }

    /// True once the release has fully decayed.
    pub fn is_silent(&self) -> bool {
        self.level <= 0.0
    }
}
