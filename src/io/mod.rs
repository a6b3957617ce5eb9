// Purpose - the audio device boundary.
//
// Everything below this line is plumbing between the engine and cpal: the
// engine itself never touches a device, it only fills buffers on demand. The
// device callback is the render context of the concurrency contract - it
// takes the shared lock once per buffer, for the whole pass.

use std::error::Error;
use std::fmt;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::synth::shared::SharedSynth;
use crate::MAX_BLOCK_SIZE;

/// Failures while binding or driving the output device.
#[derive(Debug)]
pub enum OutputError {
    NoOutputDevice,
    DefaultConfig(cpal::DefaultStreamConfigError),
    Build(cpal::BuildStreamError),
    Play(cpal::PlayStreamError),
    Pause(cpal::PauseStreamError),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::NoOutputDevice => write!(f, "no default audio output device"),
            OutputError::DefaultConfig(e) => write!(f, "querying device config failed: {e}"),
            OutputError::Build(e) => write!(f, "building the output stream failed: {e}"),
            OutputError::Play(e) => write!(f, "starting the output stream failed: {e}"),
            OutputError::Pause(e) => write!(f, "stopping the output stream failed: {e}"),
        }
    }
}

impl Error for OutputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            OutputError::NoOutputDevice => None,
            OutputError::DefaultConfig(e) => Some(e),
            OutputError::Build(e) => Some(e),
            OutputError::Play(e) => Some(e),
            OutputError::Pause(e) => Some(e),
        }
    }
}

impl From<cpal::DefaultStreamConfigError> for OutputError {
    fn from(e: cpal::DefaultStreamConfigError) -> Self {
        OutputError::DefaultConfig(e)
    }
}

impl From<cpal::BuildStreamError> for OutputError {
    fn from(e: cpal::BuildStreamError) -> Self {
        OutputError::Build(e)
    }
}

impl From<cpal::PlayStreamError> for OutputError {
    fn from(e: cpal::PlayStreamError) -> Self {
        OutputError::Play(e)
    }
}

impl From<cpal::PauseStreamError> for OutputError {
    fn from(e: cpal::PauseStreamError) -> Self {
        OutputError::Pause(e)
    }
}

/// A running binding between a [`SharedSynth`] and the default output device.
///
/// The stream renders mono and replicates the sample across however many
/// channels the device exposes. Dropping the stream releases the device.
pub struct OutputStream {
    stream: cpal::Stream,
}

impl OutputStream {
    /// Bind the default output device at the engine's sample rate.
    pub fn open(synth: SharedSynth) -> Result<Self, OutputError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(OutputError::NoOutputDevice)?;

        let channels = device.default_output_config()?.channels();
        let config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(synth.sample_rate() as u32),
            buffer_size: cpal::BufferSize::Default,
        };

        let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];
        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let frames = data.len() / channels as usize;
                if mono.len() < frames {
                    // Device asked for more than we provisioned; grow once.
                    mono.resize(frames, 0.0);
                }
                synth.render_block(&mut mono[..frames]);

                for (frame, &sample) in data.chunks_mut(channels as usize).zip(&mono) {
                    frame.fill(sample);
                }
            },
            |err| eprintln!("output stream error: {err}"),
            None,
        )?;

        Ok(Self { stream })
    }

    /// Begin producing buffers.
    pub fn play(&self) -> Result<(), OutputError> {
        self.stream.play().map_err(OutputError::from)
    }

    /// Cease producing buffers. The device stays bound until drop.
    pub fn pause(&self) -> Result<(), OutputError> {
        self.stream.pause().map_err(OutputError::from)
    }
}
