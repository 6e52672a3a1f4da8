//! Host audio clock for the gritbox sampler.
//!
//! On hardware the mixer runs in a timer interrupt; on a host it runs in
//! the audio callback. [`CpalClock`] owns the output stream and drives
//! the engine's [`Mixer`] handle once per output frame at the engine's
//! fixed sample rate.
//!
//! [`Mixer`]: grit_engine::Mixer

mod cpal_clock;

pub use cpal_clock::{AudioError, CpalClock};
