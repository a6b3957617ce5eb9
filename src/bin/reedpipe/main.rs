//! reedpipe - plays a short phrase through the default output device.
//!
//! Run with: cargo run

use std::thread;
use std::time::Duration;

use reedpipe_dsp::io::OutputStream;
use reedpipe_dsp::{EngineConfig, SharedSynth};

// Equal-tempered note frequencies (Hz) - just enough for the phrase below.
const C3: f32 = 130.81;
const G3: f32 = 196.00;
const C4: f32 = 261.63;
const E4: f32 = 329.63;
const F4: f32 = 349.23;
const G4: f32 = 392.00;
const A4: f32 = 440.00;

/// (melody, chord, seconds). Empty slices are rests on that channel.
const PHRASE: &[(&[f32], &[f32], f32)] = &[
    (&[C4], &[], 0.95),
    (&[], &[], 0.05),
    (&[C4], &[C3], 0.5),
    (&[C4], &[G3], 0.5),
    (&[G4], &[C4], 0.25),
    (&[F4], &[C4], 0.25),
    (&[E4], &[G3], 0.25),
    (&[F4], &[G3], 0.25),
    (&[G4], &[C3], 0.5),
    (&[G4], &[G3], 0.5),
    (&[A4], &[C4], 0.5),
    (&[G4], &[G3], 1.0),
];

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let synth = SharedSynth::new(EngineConfig::default());
    let stream = OutputStream::open(synth.clone())?;
    stream.play()?;

    println!("Playing...");
    for &(melody, chord, seconds) in PHRASE {
        synth.set_melody(melody);
        synth.set_chords(chord);
        thread::sleep(Duration::from_secs_f32(seconds));
    }

    // Clear the targets and give the release tails time to decay before
    // tearing the stream down.
    synth.set_melody(&[]);
    synth.set_chords(&[]);
    thread::sleep(Duration::from_millis(300));

    stream.pause()?;
    println!("Done.");
    Ok(())
}
