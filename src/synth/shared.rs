use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::synth::engine::{AdditiveSynth, EngineConfig};

/// The one mutual-exclusion domain shared by the control and render contexts.
///
/// Cloning is cheap (an `Arc` bump): hand one clone to the audio output and
/// keep another on the control side. The render context holds the lock for an
/// entire per-buffer synthesis pass, since it reads and mutates per-voice
/// phase, envelope and counters; the control context holds it only while
/// replacing target sets and creating voice entries. Neither side performs
/// I/O or unbounded allocation under the lock.
///
/// There is deliberately no reader/writer or queue scheme here: full mutual
/// exclusion is the contract, chosen for correctness over micro-optimization.
#[derive(Clone)]
pub struct SharedSynth {
    inner: Arc<Mutex<AdditiveSynth>>,
}

impl SharedSynth {
    pub fn new(config: EngineConfig) -> Self {
        Self { inner: Arc::new(Mutex::new(AdditiveSynth::new(config))) }
    }

    // Engine state is coherent between samples even if another thread
    // panicked mid-update, so a poisoned lock is still safe to enter and the
    // audio thread keeps running.
    fn lock(&self) -> MutexGuard<'_, AdditiveSynth> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Single-channel control path: replace the whole target set.
    pub fn update_notes(&self, frequencies: &[f32]) {
        self.lock().update_notes(frequencies);
    }

    /// Replace the melody target set.
    pub fn set_melody(&self, frequencies: &[f32]) {
        self.lock().set_melody(frequencies);
    }

    /// Replace the chord target set.
    pub fn set_chords(&self, frequencies: &[f32]) {
        self.lock().set_chords(frequencies);
    }

    /// Render path: fill `out` with mono samples. Holds the lock for the
    /// whole pass.
    pub fn render_block(&self, out: &mut [f32]) {
        self.lock().render_block(out);
    }

    pub fn sample_rate(&self) -> f32 {
        self.lock().config().sample_rate
    }

    /// Run a closure against the engine under the lock. Meant for meters and
    /// tests; keep the closure short, the render deadline is shared.
    pub fn with_engine<R>(&self, f: impl FnOnce(&AdditiveSynth) -> R) -> R {
        f(&self.lock())
    }
}
