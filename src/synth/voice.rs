use crate::dsp::{
    envelope::Envelope,
    lfo::{self, VibratoConfig},
    modulate::{self, BendConfig, SwellConfig},
    oscillator::{self, HarmonicStack},
};

/// What a voice reported after rendering a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceStatus {
    /// Still attacking, sustaining, or releasing.
    Sounding,
    /// Release fully decayed while untargeted; the table must drop the voice.
    Finished,
}

/// Per-block context handed to a voice by the engine.
///
/// Everything here is resolved by the engine before the voice runs: whether
/// the voice is currently targeted, which channel gain applies, and where the
/// shared vibrato LFO currently stands.
pub struct RenderCtx<'a> {
    pub sample_rate: f32,
    /// True iff this voice's frequency is in the target union.
    pub gated: bool,
    /// Resolved channel gain (melody / chord / cached).
    pub gain: f32,
    /// Shared LFO phase at the start of this buffer.
    pub lfo_phase: f32,
    pub vibrato: &'a VibratoConfig,
    pub bend: &'a BendConfig,
    pub swell: &'a SwellConfig,
    pub timbre: &'a HarmonicStack,
}

/// One sounding or releasing note.
///
/// A voice owns only primitive numeric state - envelope level, oscillator
/// phase, a sample counter, and the cached channel gain. No audio is cached
/// between buffers; the waveform is regenerated every block from this state.
#[derive(Debug, Clone)]
pub struct Voice {
    frequency: f32,
    envelope: Envelope,
    phase: f32,
    sample_counter: u64,
    cached_gain: f32,
}

impl Voice {
    pub fn new(frequency: f32, envelope: Envelope) -> Self {
        Self {
            frequency,
            envelope,
            phase: 0.0,
            sample_counter: 0,
            cached_gain: 1.0,
        }
    }

    /// Synthesize one block into `wave`, using `env` as scratch for the
    /// envelope curve. Both slices must be the same length.
    ///
    /// The envelope is advanced across the whole block first; if it lands on
    /// zero while the voice is untargeted, the voice reports `Finished` and
    /// nothing is synthesized - the table drops it, discarding phase, counter
    /// and cached gain in one step.
    pub fn render(&mut self, wave: &mut [f32], env: &mut [f32], ctx: &RenderCtx) -> VoiceStatus {
        debug_assert_eq!(wave.len(), env.len());

        self.envelope.render(env, ctx.gated);
        if !ctx.gated && self.envelope.is_silent() {
            return VoiceStatus::Finished;
        }

        let dt = 1.0 / ctx.sample_rate;
        let mut phase = self.phase;

        for (i, (out, &level)) in wave.iter_mut().zip(env.iter()).enumerate() {
            // Time within this buffer (drives the shared LFO) vs. time since
            // this voice was activated (drives its own transients).
            let t_buf = i as f32 * dt;
            let t_voice = (self.sample_counter + i as u64) as f32 * dt;

            let depth_scale =
                modulate::onset_ramp(t_voice, ctx.vibrato.onset_delay, ctx.vibrato.fade_time);
            let vibrato = lfo::frequency_factor(ctx.lfo_phase, ctx.vibrato, t_buf, depth_scale);
            let scoop = modulate::attack_scoop(ctx.bend, t_voice);
            let frequency = ((self.frequency + scoop) * vibrato).max(0.0);

            phase += oscillator::phase_increment(frequency, ctx.sample_rate);

            let swell = modulate::swell_factor(ctx.swell, t_voice);
            *out = ctx.timbre.evaluate(phase) * level * ctx.gain * swell;
        }

        // Wrap once at the buffer boundary; the in-loop accumulator must stay
        // monotonic so cumulative increments compose exactly.
        self.phase = oscillator::wrap_phase(phase);
        self.sample_counter += wave.len() as u64;

        VoiceStatus::Sounding
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Current envelope level (0.0 to 1.0).
    pub fn level(&self) -> f32 {
        self.envelope.level()
    }

    /// Gain applied in the most recent targeted buffer.
    pub fn cached_gain(&self) -> f32 {
        self.cached_gain
    }

    pub fn set_cached_gain(&mut self, gain: f32) {
        self.cached_gain = gain;
    }

    pub fn sample_counter(&self) -> u64 {
        self.sample_counter
    }
}
