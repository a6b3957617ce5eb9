use crate::dsp::{
    distortion,
    envelope::Envelope,
    lfo::{self, VibratoConfig},
    mix,
    modulate::{BendConfig, SwellConfig},
    oscillator::HarmonicStack,
};
use crate::synth::table::{Channel, FreqKey, Targets, VoiceTable};
use crate::synth::voice::{RenderCtx, Voice, VoiceStatus};
use crate::MAX_BLOCK_SIZE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Channel-classification policy: which gain each logical channel carries.
///
/// Single-channel use is the same policy applied to a melody-only target
/// set, which yields a constant 1.0 for every targeted frequency.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainPolicy {
    pub melody: f32,
    pub chord: f32,
}

impl GainPolicy {
    #[inline]
    pub fn level(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Melody => self.melody,
            Channel::Chord => self.chord,
        }
    }
}

impl Default for GainPolicy {
    fn default() -> Self {
        Self { melody: 1.0, chord: 0.8 }
    }
}

/// Everything fixed at engine construction.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    pub master_volume: f32,
    /// Soft-clip pre-gain; 1.0 engages the knee only on loud mixes.
    pub drive: f32,
    /// Attack time in seconds.
    pub attack: f32,
    /// Release time in seconds. Keep it >= 1.5x the attack to avoid
    /// percussive cutoffs.
    pub release: f32,
    pub gains: GainPolicy,
    pub vibrato: VibratoConfig,
    pub bend: BendConfig,
    pub swell: SwellConfig,
    pub timbre: HarmonicStack,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            master_volume: 0.8,
            drive: 1.0,
            attack: 0.04,
            release: 0.06,
            gains: GainPolicy::default(),
            vibrato: VibratoConfig::default(),
            bend: BendConfig::default(),
            swell: SwellConfig::default(),
            timbre: HarmonicStack::reed(),
        }
    }
}

/// The polyphonic additive engine.
///
/// Owns the voice table, the target sets, and the shared LFO phase. All entry
/// points take `&mut self`; sharing between the control and render contexts
/// happens one layer up in [`crate::synth::shared::SharedSynth`], which holds
/// the single mutex both contexts serialize on.
pub struct AdditiveSynth {
    config: EngineConfig,
    table: VoiceTable,
    targets: Targets,
    lfo_phase: f32,
    // Bounded scratch, allocated once; larger render requests are chunked.
    wave: Vec<f32>,
    env: Vec<f32>,
}

impl AdditiveSynth {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            table: VoiceTable::default(),
            targets: Targets::default(),
            lfo_phase: 0.0,
            wave: vec![0.0; MAX_BLOCK_SIZE],
            env: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Single-channel control entry point: replace the whole target set.
    ///
    /// Equivalent to `set_melody` with no chord set in play - every targeted
    /// note then resolves to the melody gain (1.0 by default).
    pub fn update_notes(&mut self, frequencies: &[f32]) {
        self.set_melody(frequencies);
    }

    /// Replace the melody target set wholesale and create voices for any
    /// frequency newly appearing in the target union.
    pub fn set_melody(&mut self, frequencies: &[f32]) {
        self.targets.set_melody(frequencies.iter().copied());
        self.sync_voices();
    }

    /// Replace the chord target set wholesale, as `set_melody`.
    pub fn set_chords(&mut self, frequencies: &[f32]) {
        self.targets.set_chord(frequencies.iter().copied());
        self.sync_voices();
    }

    fn sync_voices(&mut self) {
        let Self { config, table, targets, .. } = self;
        for key in targets.union_keys() {
            table.ensure(key, || {
                Voice::new(
                    key.frequency(),
                    Envelope::new(config.sample_rate, config.attack, config.release),
                )
            });
        }
    }

    /// Render exactly `out.len()` mono samples.
    ///
    /// Requests larger than the scratch capacity are processed in
    /// `MAX_BLOCK_SIZE` chunks; per-sample ramps and phase accumulation are
    /// continuous across chunks by construction, so the split is inaudible.
    pub fn render_block(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk);
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        out.fill(0.0);

        if self.table.is_empty() {
            // A new phrase starts vibrato-neutral.
            self.lfo_phase = 0.0;
            return;
        }

        let frames = out.len();
        let Self { config, table, targets, lfo_phase, wave, env } = self;
        let wave = &mut wave[..frames];
        let env = &mut env[..frames];

        table.retain(|key, voice| {
            let channel = targets.classify(key);
            let gain = match channel {
                Some(channel) => {
                    // Targeted: resolve from the policy and refresh the cache.
                    let gain = config.gains.level(channel);
                    voice.set_cached_gain(gain);
                    gain
                }
                // Releasing: replay the last targeted gain so the tail keeps
                // its loudness instead of snapping to a default.
                None => voice.cached_gain(),
            };

            let ctx = RenderCtx {
                sample_rate: config.sample_rate,
                gated: channel.is_some(),
                gain,
                lfo_phase: *lfo_phase,
                vibrato: &config.vibrato,
                bend: &config.bend,
                swell: &config.swell,
                timbre: &config.timbre,
            };

            match voice.render(wave, env, &ctx) {
                VoiceStatus::Finished => false,
                VoiceStatus::Sounding => {
                    mix::sum_in_place(out, wave);
                    true
                }
            }
        });

        *lfo_phase = lfo::advance_phase(
            *lfo_phase,
            config.vibrato.rate_hz,
            frames as f32 / config.sample_rate,
        );

        mix::scale_in_place(out, config.master_volume);
        distortion::soft_clip_buffer(out, config.drive);
    }

    /// Number of sounding or releasing voices.
    pub fn voice_count(&self) -> usize {
        self.table.len()
    }

    /// Envelope level of the voice at `frequency`, if present.
    pub fn voice_level(&self, frequency: f32) -> Option<f32> {
        self.table.get(FreqKey::new(frequency)).map(|v| v.level())
    }

    /// Gain the voice at `frequency` is currently rendered with (cached gain
    /// while releasing), if present.
    pub fn voice_gain(&self, frequency: f32) -> Option<f32> {
        self.table.get(FreqKey::new(frequency)).map(|v| v.cached_gain())
    }

    pub fn lfo_phase(&self) -> f32 {
        self.lfo_phase
    }
}
