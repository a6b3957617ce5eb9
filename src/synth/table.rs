use std::collections::{HashMap, HashSet};

use crate::synth::voice::Voice;

/// Voice-table key: the exact bit pattern of the caller-supplied frequency.
///
/// Frequency equality at the control boundary is exact floating-point match
/// by contract, so hashing the bits is both correct and free of the usual
/// float-as-key pitfalls (there is no arithmetic on keys, only identity).
/// The frequency itself stays a payload field on the voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FreqKey(u32);

impl FreqKey {
    pub fn new(frequency: f32) -> Self {
        Self(frequency.to_bits())
    }

    pub fn frequency(self) -> f32 {
        f32::from_bits(self.0)
    }
}

/// Which logical channel a targeted frequency belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Melody,
    Chord,
}

/// The two target sets the control path replaces wholesale.
///
/// A voice is "targeted" iff its key is in the union. Single-channel callers
/// route everything through the melody set and never touch chords.
#[derive(Debug, Default)]
pub struct Targets {
    melody: HashSet<FreqKey>,
    chord: HashSet<FreqKey>,
}

impl Targets {
    pub fn set_melody(&mut self, frequencies: impl IntoIterator<Item = f32>) {
        self.melody = Self::collect(frequencies);
    }

    pub fn set_chord(&mut self, frequencies: impl IntoIterator<Item = f32>) {
        self.chord = Self::collect(frequencies);
    }

    fn collect(frequencies: impl IntoIterator<Item = f32>) -> HashSet<FreqKey> {
        frequencies
            .into_iter()
            .inspect(|&f| debug_assert!(f > 0.0, "non-positive frequency {f} reached the engine"))
            .map(FreqKey::new)
            .collect()
    }

    /// Classify a key: melody wins when a frequency sits in both sets.
    pub fn classify(&self, key: FreqKey) -> Option<Channel> {
        if self.melody.contains(&key) {
            Some(Channel::Melody)
        } else if self.chord.contains(&key) {
            Some(Channel::Chord)
        } else {
            None
        }
    }

    pub fn is_targeted(&self, key: FreqKey) -> bool {
        self.melody.contains(&key) || self.chord.contains(&key)
    }

    /// All targeted keys; a key in both sets appears twice, which is harmless
    /// for the idempotent voice creation this feeds.
    pub fn union_keys(&self) -> impl Iterator<Item = FreqKey> + '_ {
        self.melody.iter().chain(self.chord.iter()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.melody.is_empty() && self.chord.is_empty()
    }
}

/// All currently sounding or releasing voices, keyed by frequency.
#[derive(Debug, Default)]
pub struct VoiceTable {
    voices: HashMap<FreqKey, Voice>,
}

impl VoiceTable {
    /// Create a voice for `key` if absent. Existing voices are left alone so
    /// a re-targeted note resumes from its current envelope instead of
    /// resetting.
    pub fn ensure(&mut self, key: FreqKey, make: impl FnOnce() -> Voice) {
        self.voices.entry(key).or_insert_with(make);
    }

    pub fn get(&self, key: FreqKey) -> Option<&Voice> {
        self.voices.get(&key)
    }

    /// Render-path iteration: keep each voice for which `f` returns true.
    pub fn retain(&mut self, mut f: impl FnMut(FreqKey, &mut Voice) -> bool) {
        self.voices.retain(|&key, voice| f(key, voice));
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}
