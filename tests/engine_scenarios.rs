//! End-to-end scenarios for the voice lifecycle, envelope timing, anti-click
//! gain caching, and output guarantees.

use reedpipe_dsp::dsp::lfo::VibratoConfig;
use reedpipe_dsp::dsp::modulate::{BendConfig, SwellConfig};
use reedpipe_dsp::dsp::oscillator::{HarmonicStack, Partial};
use reedpipe_dsp::{AdditiveSynth, EngineConfig};

const SAMPLE_RATE: f32 = 48_000.0;
const BUFFER: usize = 1024;

/// Default timings with every modulation source disabled and a transparent
/// master stage, so envelope and phase behavior can be asserted exactly.
fn plain_config() -> EngineConfig {
    EngineConfig {
        sample_rate: SAMPLE_RATE,
        master_volume: 1.0,
        drive: 1.0,
        vibrato: VibratoConfig { depth: 0.0, ..VibratoConfig::default() },
        bend: BendConfig::off(),
        swell: SwellConfig::off(),
        ..EngineConfig::default()
    }
}

fn render_buffers(synth: &mut AdditiveSynth, count: usize) -> Vec<f32> {
    let mut all = Vec::with_capacity(count * BUFFER);
    let mut out = [0.0f32; BUFFER];
    for _ in 0..count {
        synth.render_block(&mut out);
        all.extend_from_slice(&out);
    }
    all
}

#[test]
fn attack_and_release_finish_on_schedule() {
    // attack 40 ms @ 48 kHz = 1920 samples, release 60 ms = 2880 samples
    let mut synth = AdditiveSynth::new(plain_config());
    synth.update_notes(&[440.0]);

    // One 1024-sample buffer is not enough to finish the attack...
    render_buffers(&mut synth, 1);
    let mid_attack = synth.voice_level(440.0).unwrap();
    assert!(mid_attack > 0.0 && mid_attack < 0.99, "got {mid_attack}");

    // ...two buffers (2048 >= 1920) are.
    render_buffers(&mut synth, 1);
    assert!(synth.voice_level(440.0).unwrap() > 0.99);

    // Release: still present after 2048 samples, gone within 3072 (>= 2880).
    synth.update_notes(&[]);
    render_buffers(&mut synth, 2);
    assert_eq!(synth.voice_count(), 1);
    assert!(synth.voice_level(440.0).unwrap() > 0.0);

    render_buffers(&mut synth, 1);
    assert_eq!(synth.voice_count(), 0);
    assert_eq!(synth.voice_level(440.0), None);
}

#[test]
fn envelope_is_monotonic_per_direction() {
    let mut synth = AdditiveSynth::new(plain_config());
    synth.update_notes(&[440.0]);

    let mut previous = 0.0;
    for _ in 0..6 {
        render_buffers(&mut synth, 1);
        let level = synth.voice_level(440.0).unwrap();
        assert!(level >= previous, "attack must be non-decreasing");
        assert!((0.0..=1.0).contains(&level));
        previous = level;
    }

    synth.update_notes(&[]);
    while synth.voice_count() > 0 {
        render_buffers(&mut synth, 1);
        if let Some(level) = synth.voice_level(440.0) {
            assert!(level <= previous, "release must be non-increasing");
            assert!((0.0..=1.0).contains(&level));
            previous = level;
        }
    }
}

#[test]
fn retarget_mid_release_resumes_without_reset() {
    let mut synth = AdditiveSynth::new(plain_config());
    synth.update_notes(&[440.0]);
    render_buffers(&mut synth, 1);

    synth.update_notes(&[]);
    render_buffers(&mut synth, 1);
    let resumed_from = synth.voice_level(440.0).unwrap();
    assert!(resumed_from > 0.0);

    // Re-targeting before the release finishes must keep the voice and
    // continue the attack from the current level, not from zero.
    synth.update_notes(&[440.0]);
    assert_eq!(synth.voice_count(), 1);
    render_buffers(&mut synth, 1);

    let after = synth.voice_level(440.0).unwrap();
    assert!(after > resumed_from);
    assert!(after < 1.0);
}

#[test]
fn waveform_is_phase_continuous_across_buffers() {
    // Pure sine timbre so the derivative bound is exactly the phase increment.
    let config = EngineConfig {
        timbre: HarmonicStack::new(vec![Partial { multiple: 1.0, weight: 1.0 }]),
        ..plain_config()
    };
    let mut synth = AdditiveSynth::new(config);
    synth.update_notes(&[440.0]);

    // Let the attack finish, then capture many consecutive buffers.
    render_buffers(&mut synth, 4);
    let samples = render_buffers(&mut synth, 20);

    // tanh is 1-Lipschitz, so sample-to-sample steps stay below the sine's
    // own per-sample bound everywhere, including at buffer boundaries.
    let max_step = std::f32::consts::TAU * 440.0 / SAMPLE_RATE * 1.1;
    for pair in samples.windows(2) {
        let delta = (pair[1] - pair[0]).abs();
        assert!(delta <= max_step, "discontinuity: step {delta} > {max_step}");
    }
}

#[test]
fn releasing_melody_voice_keeps_its_cached_gain() {
    let mut synth = AdditiveSynth::new(plain_config());
    synth.set_melody(&[261.63]);
    synth.set_chords(&[130.81]);
    render_buffers(&mut synth, 5);

    assert_eq!(synth.voice_gain(261.63), Some(1.0));
    assert_eq!(synth.voice_gain(130.81), Some(0.8));

    // Melody leaves the target set while the chord holds: through the whole
    // release tail the melody voice must replay its last targeted gain, never
    // the chord ratio and never zero.
    synth.set_melody(&[]);
    for _ in 0..2 {
        render_buffers(&mut synth, 1);
        assert_eq!(synth.voice_gain(261.63), Some(1.0));
        assert_eq!(synth.voice_gain(130.81), Some(0.8));
    }

    let melody_level = synth.voice_level(261.63).unwrap();
    assert!(melody_level < 1.0, "melody must be releasing");
    assert_eq!(synth.voice_level(130.81), Some(1.0));
}

#[test]
fn output_is_bounded_with_a_dense_mix() {
    // Full modulation stack, many simultaneous voices, default mastering.
    let mut synth = AdditiveSynth::new(EngineConfig::default());
    synth.set_melody(&[261.63, 329.63, 392.0, 523.25, 659.25, 783.99, 880.0, 1046.5]);
    synth.set_chords(&[65.41, 130.81, 196.0]);

    let samples = render_buffers(&mut synth, 50);
    for &sample in &samples {
        assert!(sample.is_finite());
        assert!(sample.abs() <= 1.0, "sample {sample} out of range");
    }
}

#[test]
fn empty_engine_renders_silence() {
    let mut synth = AdditiveSynth::new(EngineConfig::default());
    let samples = render_buffers(&mut synth, 3);
    assert!(samples.iter().all(|&s| s == 0.0));
    assert_eq!(synth.lfo_phase(), 0.0);
}

#[test]
fn lfo_resets_once_the_table_drains() {
    let mut synth = AdditiveSynth::new(plain_config());
    synth.update_notes(&[440.0]);
    render_buffers(&mut synth, 3);
    assert!(synth.lfo_phase() > 0.0);

    synth.update_notes(&[]);
    render_buffers(&mut synth, 3); // release (2880 samples) finishes in here
    assert_eq!(synth.voice_count(), 0);

    let samples = render_buffers(&mut synth, 1);
    assert!(samples.iter().all(|&s| s == 0.0));
    assert_eq!(synth.lfo_phase(), 0.0);
}

#[test]
fn rapid_retargeting_stays_bounded() {
    let mut synth = AdditiveSynth::new(EngineConfig::default());
    let sets: [&[f32]; 3] = [&[440.0, 554.37], &[329.63], &[]];

    for i in 0..60 {
        synth.update_notes(sets[i % sets.len()]);
        let samples = render_buffers(&mut synth, 1);
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
        if let Some(level) = synth.voice_level(440.0) {
            assert!((0.0..=1.0).contains(&level));
        }
    }
}
