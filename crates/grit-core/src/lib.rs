//! Shared constants and value types for the gritbox sampler.
//!
//! Everything the firmware-style core and the host glue agree on lives
//! here: sample rate, buffer sizing, fade defaults, and the fixed-capacity
//! path type used to name stored slices.
//!
//! Designed to be `no_std` compatible.

#![cfg_attr(not(feature = "std"), no_std)]

mod config;
mod path;

pub use config::{
    DAC_BIAS, DAC_CLAMP, DEFAULT_VOICE_GAIN, FADE_IN_TICKS, JOB_QUEUE_SIZE, LEVEL_RAMP_TICKS,
    MAX_PATH_LEN, MAX_RECORD_SAMPLES, MAX_RECORD_SECONDS, RETRIGGER_MUTE_TICKS, ROW_NAMES,
    SAMPLE_RATE_HZ, SLICES_PER_ROW, STOP_RAMP_TICKS, STREAM_CHUNK_SAMPLES, VOICE_BUF_SAMPLES,
    VOICE_COUNT,
};
pub use path::SlicePath;
