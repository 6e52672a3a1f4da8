//! Interrupt-rate mixing routine.
//!
//! Invoked once per sample period by the hardware timer (or the host
//! audio callback standing in for it). O(1) in the number of voices and
//! touches no storage, no heap, and no job queue — by construction there
//! is nothing in here that can fail or block.

use alloc::sync::Arc;
use core::sync::atomic::Ordering;

use grit_core::{DAC_BIAS, DAC_CLAMP};

use crate::voice::EngineShared;

/// One 12-bit converter word, written identically to both output channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DacSample(pub u16);

impl DacSample {
    /// The silent (mid-scale) converter word.
    pub const MIDPOINT: Self = Self(DAC_BIAS as u16);

    /// Convert to a signed full-scale float for host audio output.
    pub fn to_f32(self) -> f32 {
        (self.0 as i32 - DAC_BIAS) as f32 / DAC_BIAS as f32
    }
}

/// The engine's interrupt-facing half.
///
/// Obtained once from [`Engine::new`] and moved into whatever drives the
/// sample clock. Holds a handle to the shared voice state captured at
/// setup time; there is exactly one consumer, matching the single
/// interrupt source of the target.
///
/// [`Engine::new`]: crate::Engine::new
pub struct Mixer {
    shared: Arc<EngineShared>,
}

impl Mixer {
    pub(crate) fn new(shared: Arc<EngineShared>) -> Self {
        Self { shared }
    }

    /// Produce the next output sample, or `None` while the engine is
    /// disabled (the caller leaves the converter untouched).
    pub fn next_sample(&mut self) -> Option<DacSample> {
        if !self.shared.running.load(Ordering::Acquire) {
            return None;
        }

        let mut mix: i32 = 0;
        for vs in &self.shared.voices {
            if !vs.primed.load(Ordering::Acquire) {
                continue;
            }
            match vs.ring.pop() {
                Some((sample, left)) => {
                    mix += (sample as f32 * vs.gain()) as i32;
                    if left == 0 && !vs.streaming.load(Ordering::Acquire) {
                        // Natural drain: the loader is done and we just
                        // consumed the last sample.
                        vs.active.store(false, Ordering::Release);
                    }
                }
                None => {
                    if !vs.streaming.load(Ordering::Acquire) {
                        vs.active.store(false, Ordering::Release);
                    }
                }
            }
        }

        let out = (mix >> 1).clamp(-DAC_CLAMP, DAC_CLAMP);
        Some(DacSample((out + DAC_BIAS) as u16))
    }
}
