//! Per-voice state, split across the engine's two execution contexts.
//!
//! [`VoiceShared`] is everything the interrupt-rate mixer touches: the
//! sample ring, the priming/activity flags, and the published gain. It is
//! all atomics, so the mixer never takes a lock. [`VoiceCtl`] is the
//! service side's private bookkeeping — stream progress, ramp state, and
//! the one-shot flags — which only ever runs on the main-loop context.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use grit_core::{SlicePath, DEFAULT_VOICE_GAIN, VOICE_COUNT};

use crate::gain::GainRamp;
use crate::ring::StreamRing;

/// Mixer-visible state for one voice.
pub(crate) struct VoiceShared {
    pub ring: StreamRing,
    /// Buffer has received its first data; eligible for mixing.
    pub primed: AtomicBool,
    /// Mixer is currently producing sound for this voice.
    pub active: AtomicBool,
    /// More source data remains to be pulled from storage.
    pub streaming: AtomicBool,
    /// Current gain as f32 bits; written by the service side only.
    gain_bits: AtomicU32,
}

impl VoiceShared {
    fn new(ring_capacity: usize) -> Self {
        Self {
            ring: StreamRing::new(ring_capacity),
            primed: AtomicBool::new(false),
            active: AtomicBool::new(false),
            streaming: AtomicBool::new(false),
            gain_bits: AtomicU32::new(0),
        }
    }

    pub fn gain(&self) -> f32 {
        f32::from_bits(self.gain_bits.load(Ordering::Relaxed))
    }

    pub fn set_gain(&self, gain: f32) {
        self.gain_bits.store(gain.to_bits(), Ordering::Relaxed);
    }
}

/// State shared between the engine and its mixer handle.
pub(crate) struct EngineShared {
    pub running: AtomicBool,
    pub voices: [VoiceShared; VOICE_COUNT],
}

impl EngineShared {
    pub fn new(ring_capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            running: AtomicBool::new(false),
            voices: core::array::from_fn(|_| VoiceShared::new(ring_capacity)),
        })
    }
}

/// Service-side bookkeeping for one voice.
pub(crate) struct VoiceCtl {
    /// Storage object currently bound to this voice.
    pub path: SlicePath,
    /// Source length in samples; zero when unbound.
    pub total_samples: u32,
    /// Samples pulled from storage so far.
    pub loaded_samples: u32,
    /// Stop requested; suppresses further streaming.
    pub draining: bool,
    /// Arm a fade-in on the next successful buffer fill.
    pub needs_fade_in: bool,
    /// A diagnostics snapshot is already queued for this voice.
    pub diag_pending: bool,
    /// Last explicitly requested steady-state gain. Persists across
    /// retriggers; distinct from the ramp target, which is 0 during a
    /// fade-to-silence.
    pub desired_gain: f32,
    pub ramp: GainRamp,
}

impl VoiceCtl {
    pub fn new() -> Self {
        Self {
            path: SlicePath::new(),
            total_samples: 0,
            loaded_samples: 0,
            draining: false,
            needs_fade_in: false,
            diag_pending: false,
            desired_gain: DEFAULT_VOICE_GAIN,
            ramp: GainRamp::new(DEFAULT_VOICE_GAIN),
        }
    }
}

/// Point-in-time view of one voice's mixer-visible state.
#[derive(Clone, Copy, Debug, Default)]
pub struct VoiceStatus {
    pub primed: bool,
    pub active: bool,
    pub streaming: bool,
    /// Samples currently buffered.
    pub available: usize,
    /// Gain the mixer is applying right now.
    pub gain: f32,
}

/// Cheap cloneable handle for observing voice activity from any thread.
#[derive(Clone)]
pub struct StatusHandle {
    pub(crate) shared: Arc<EngineShared>,
}

impl StatusHandle {
    /// Snapshot a voice's mixer-visible state.
    pub fn voice(&self, voice: usize) -> Option<VoiceStatus> {
        let vs = self.shared.voices.get(voice)?;
        Some(VoiceStatus {
            primed: vs.primed.load(Ordering::Acquire),
            active: vs.active.load(Ordering::Acquire),
            streaming: vs.streaming.load(Ordering::Acquire),
            available: vs.ring.available(),
            gain: vs.gain(),
        })
    }

    /// True while any voice still holds or expects audio.
    pub fn any_busy(&self) -> bool {
        self.shared.voices.iter().any(|vs| {
            vs.primed.load(Ordering::Acquire)
                || vs.streaming.load(Ordering::Acquire)
                || vs.ring.available() > 0
        })
    }
}
