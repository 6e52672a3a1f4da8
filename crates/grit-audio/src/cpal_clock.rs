//! CPAL-based sample clock.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use grit_core::SAMPLE_RATE_HZ;
use grit_engine::Mixer;

/// Error type for audio clock operations.
#[derive(Debug)]
pub enum AudioError {
    /// Failed to initialize audio device
    DeviceInit(String),
    /// Failed to create audio stream
    StreamCreate(String),
    /// Playback error
    Playback(String),
    /// No audio device available
    NoDevice,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::DeviceInit(msg) => write!(f, "Device init error: {}", msg),
            AudioError::StreamCreate(msg) => write!(f, "Stream create error: {}", msg),
            AudioError::Playback(msg) => write!(f, "Playback error: {}", msg),
            AudioError::NoDevice => write!(f, "No audio device available"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Output stream driving a [`Mixer`] at the engine's fixed rate.
///
/// Construction is the host counterpart of the firmware's one-time timer
/// setup: it captures the mixer handle into the stream callback. The
/// stream itself keeps running; a disabled engine reports no sample and
/// the callback emits silence.
pub struct CpalClock {
    _device: Device,
    stream: Stream,
}

impl CpalClock {
    /// Open the default output device at the engine sample rate and bind
    /// `mixer` to its callback.
    pub fn new(mut mixer: Mixer) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        let mut config: StreamConfig = config.into();
        // The engine mixes mono at its fixed rate; the stream callback
        // assumes 2-channel interleaving and duplicates the sample.
        config.channels = 2;
        config.sample_rate = SampleRate(SAMPLE_RATE_HZ);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(2) {
                        let value = match mixer.next_sample() {
                            Some(dac) => dac.to_f32(),
                            None => 0.0,
                        };
                        for sample in frame.iter_mut() {
                            *sample = value;
                        }
                    }
                },
                |err| log::error!("audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        Ok(Self { _device: device, stream })
    }

    /// Start the sample clock.
    pub fn start(&self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|e| AudioError::Playback(e.to_string()))
    }

    /// Pause the sample clock.
    pub fn stop(&self) -> Result<(), AudioError> {
        self.stream
            .pause()
            .map_err(|e| AudioError::Playback(e.to_string()))
    }
}
