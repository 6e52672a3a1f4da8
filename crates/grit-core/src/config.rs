//! Core timing, sizing, and level constants.

/// Fixed output sample rate.
pub const SAMPLE_RATE_HZ: u32 = 22_050;

/// Longest capture the recorder front-end will ever hand us.
pub const MAX_RECORD_SECONDS: f32 = 2.6;

/// Sample count ceiling for a full capture.
pub const MAX_RECORD_SAMPLES: u32 = (SAMPLE_RATE_HZ as f32 * MAX_RECORD_SECONDS) as u32;

/// A capture is chopped into this many stored slices per pad row.
pub const SLICES_PER_ROW: u32 = 8;

/// Independently triggerable playback voices.
pub const VOICE_COUNT: usize = 4;

/// Per-voice ring capacity, sized to hold one whole slice.
pub const VOICE_BUF_SAMPLES: usize =
    ((MAX_RECORD_SAMPLES + SLICES_PER_ROW - 1) / SLICES_PER_ROW) as usize;

/// Granularity of a single storage read while streaming.
pub const STREAM_CHUNK_SAMPLES: usize = 256;

/// Deferred job queue depth. Overflow is upstream misuse, not a fault.
pub const JOB_QUEUE_SIZE: usize = 8;

/// Longest slice path, including the row folder prefix.
pub const MAX_PATH_LEN: usize = 32;

/// Service ticks for the fade-in armed on a voice's first buffer fill.
pub const FADE_IN_TICKS: u16 = 24;

/// Service ticks for a `set_level` glide.
pub const LEVEL_RAMP_TICKS: u16 = 8;

/// Service ticks for a `stop_voice` fade-to-silence.
pub const STOP_RAMP_TICKS: u16 = 48;

/// Near-instant mute armed when a voice is rebound to a new slice.
pub const RETRIGGER_MUTE_TICKS: u16 = 1;

/// Steady-state gain a voice starts life with.
pub const DEFAULT_VOICE_GAIN: f32 = 0.9;

/// Mix sum is clamped to +/- this before biasing for the converter.
pub const DAC_CLAMP: i32 = 2047;

/// Offset re-biasing the signed mix into the unsigned 12-bit DAC range.
pub const DAC_BIAS: i32 = 2048;

/// Pad row folder names on storage.
pub const ROW_NAMES: [&str; 4] = ["A", "B", "C", "D"];
