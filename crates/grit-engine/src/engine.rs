//! The engine's service side.
//!
//! All storage I/O and deferred work happens here, on the cooperative
//! main-loop context. Once per tick [`Engine::service`] drains the job
//! queue, pumps stream loading for every streaming voice, advances gain
//! ramps, and reclaims drained voices — in that order, so a freshly
//! enqueued preload can become audible within the same tick and a voice
//! reclaimed this tick cannot be re-primed until the next.

use alloc::sync::Arc;
use core::sync::atomic::Ordering;

use grit_core::{
    SlicePath, FADE_IN_TICKS, LEVEL_RAMP_TICKS, RETRIGGER_MUTE_TICKS, STOP_RAMP_TICKS,
    STREAM_CHUNK_SAMPLES, VOICE_BUF_SAMPLES, VOICE_COUNT,
};

use crate::job::{Job, JobQueue};
use crate::mixer::Mixer;
use crate::store::SliceStore;
use crate::voice::{EngineShared, StatusHandle, VoiceCtl};

/// Result of loading one chunk from storage into a voice's ring.
enum ChunkOutcome {
    /// Samples obtained this call (possibly short, possibly zero).
    Loaded(usize),
    /// Storage reported a failure; streaming was abandoned.
    Failed,
}

/// The sampler's voice streaming and mixing engine, service half.
///
/// Owns the four voices, the deferred job queue, and the storage
/// collaborator. The matching [`Mixer`] handle, returned by [`Engine::new`],
/// is the only other party that touches voice state, and only through
/// lock-free flags and the sample rings.
pub struct Engine<S> {
    store: S,
    shared: Arc<EngineShared>,
    voices: [VoiceCtl; VOICE_COUNT],
    jobs: JobQueue,
    /// Bitmask of voices already pumped this tick.
    pumped: u8,
    began: bool,
}

impl<S: SliceStore> Engine<S> {
    /// Create an engine over `store`, returning the interrupt-facing
    /// mixer handle alongside it.
    pub fn new(store: S) -> (Self, Mixer) {
        Self::with_ring_capacity(store, VOICE_BUF_SAMPLES)
    }

    pub(crate) fn with_ring_capacity(store: S, ring_capacity: usize) -> (Self, Mixer) {
        let shared = EngineShared::new(ring_capacity);
        let mixer = Mixer::new(shared.clone());
        let engine = Self {
            store,
            shared,
            voices: core::array::from_fn(|_| VoiceCtl::new()),
            jobs: JobQueue::new(),
            pumped: 0,
            began: false,
        };
        (engine, mixer)
    }

    /// One-time setup. Must be called before [`Engine::start`]; the host
    /// binds the sample clock to the [`Mixer`] handle separately.
    pub fn begin(&mut self) -> bool {
        self.began = true;
        true
    }

    /// Enable mixing. A disabled engine leaves the mixer a no-op.
    pub fn start(&mut self) {
        if !self.began {
            log::warn!("start() before begin(); ignoring");
            return;
        }
        self.shared.running.store(true, Ordering::Release);
    }

    /// Disable mixing.
    pub fn stop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
    }

    /// Observation handle usable from any thread.
    pub fn status(&self) -> StatusHandle {
        StatusHandle { shared: self.shared.clone() }
    }

    /// Schedule `path` to stream and play on `voice`.
    ///
    /// Rejects an invalid voice index or an unusable path synchronously;
    /// actual loading is deferred to the next service tick.
    pub fn preload_and_play(&mut self, voice: usize, path: &str) -> bool {
        if voice >= VOICE_COUNT || path.is_empty() {
            return false;
        }
        let Ok(path) = SlicePath::from(path) else {
            return false;
        };
        if !self.jobs.enqueue(Job::Preload { voice, path }) {
            log::warn!("job queue full, dropping preload of {} for voice {}", path, voice);
            return false;
        }
        true
    }

    /// Begin a fade-to-silence on `voice` and halt further streaming.
    ///
    /// Streaming stops synchronously; the audible fade and final buffer
    /// reclamation are gradual. There is no hard-stop that truncates
    /// audio mid-sample.
    pub fn stop_voice(&mut self, voice: usize) {
        if voice >= VOICE_COUNT {
            return;
        }
        self.voices[voice].draining = true;
        self.shared.voices[voice].streaming.store(false, Ordering::Release);
        let job = Job::Fade { voice, target: 0.0, ticks: STOP_RAMP_TICKS };
        if !self.jobs.enqueue(job) {
            log::warn!("job queue full, arming stop fade for voice {} directly", voice);
            self.arm_ramp(voice, 0.0, STOP_RAMP_TICKS);
        }
    }

    /// Glide `voice` to `level`. The level is not clamped here; range is
    /// the caller's responsibility.
    pub fn set_level(&mut self, voice: usize, level: f32) {
        if voice >= VOICE_COUNT {
            return;
        }
        self.voices[voice].desired_gain = level;
        let job = Job::Fade { voice, target: level, ticks: LEVEL_RAMP_TICKS };
        if !self.jobs.enqueue(job) {
            log::warn!("job queue full, arming level ramp for voice {} directly", voice);
            self.arm_ramp(voice, level, LEVEL_RAMP_TICKS);
        }
    }

    /// Best-effort request for a state dump of `voice` on the next tick.
    pub fn request_diagnostics(&mut self, voice: usize) {
        if voice >= VOICE_COUNT || self.voices[voice].diag_pending {
            return;
        }
        if self.jobs.enqueue(Job::Diagnostics { voice }) {
            self.voices[voice].diag_pending = true;
        } else {
            log::warn!("job queue full, dropping diagnostics for voice {}", voice);
        }
    }

    /// One service tick. Must be invoked at a bounded, regular interval;
    /// this is the only entry point that performs storage I/O.
    pub fn service(&mut self) {
        self.pumped = 0;

        // Jobs enqueued while handling earlier jobs wait for the next
        // tick; snapshotting the length also bounds per-tick work to the
        // queue capacity.
        let pending = self.jobs.len();
        for _ in 0..pending {
            let Some(job) = self.jobs.pop() else { break };
            self.handle_job(job);
        }

        // A preload's immediate fill counts as this tick's pump for that
        // voice, so a short read there is not retried until the next tick.
        for voice in 0..VOICE_COUNT {
            if self.pumped & (1 << voice) == 0
                && self.shared.voices[voice].streaming.load(Ordering::Acquire)
            {
                self.pump_voice(voice);
            }
        }

        self.advance_gains();
        self.reclaim_voices();
    }

    fn handle_job(&mut self, job: Job) {
        match job {
            Job::Preload { voice, path } => self.handle_preload(voice, path),
            Job::Fade { voice, target, ticks } => self.arm_ramp(voice, target, ticks),
            Job::Diagnostics { voice } => self.handle_diagnostics(voice),
        }
    }

    fn handle_preload(&mut self, voice: usize, path: SlicePath) {
        let vs = &self.shared.voices[voice];
        // Unprime first so the mixer skips this voice for the whole reset.
        vs.primed.store(false, Ordering::Release);
        vs.active.store(false, Ordering::Release);
        vs.streaming.store(false, Ordering::Release);
        vs.ring.reset();

        let vc = &mut self.voices[voice];
        vc.total_samples = 0;
        vc.loaded_samples = 0;
        vc.draining = false;
        vc.needs_fade_in = true;
        vc.path = path;

        let total = match self.store.total_samples(path.as_str()) {
            Ok(0) => {
                log::warn!("preload {}: slice is empty, nothing to play", path);
                self.voices[voice].needs_fade_in = false;
                return;
            }
            Ok(n) => n,
            Err(err) => {
                log::error!("preload {}: {}", path, err);
                self.voices[voice].needs_fade_in = false;
                return;
            }
        };

        let vc = &mut self.voices[voice];
        vc.total_samples = total;
        // Mute whatever the voice was doing before it is reused.
        vc.ramp.reset(0.0);
        vc.ramp.arm(0.0, RETRIGGER_MUTE_TICKS);
        self.shared.voices[voice].set_gain(0.0);
        self.shared.voices[voice].streaming.store(true, Ordering::Release);

        // First fill now, so playback can start on the very next mix tick
        // instead of waiting a full service period.
        self.pump_voice(voice);
    }

    /// Pull chunks from storage into `voice`'s ring until it is full, the
    /// source is exhausted, or a short read says the medium wants pacing.
    fn pump_voice(&mut self, voice: usize) {
        self.pumped |= 1 << voice;
        loop {
            if self.voices[voice].draining {
                self.shared.voices[voice].streaming.store(false, Ordering::Release);
                return;
            }
            let free = self.shared.voices[voice].ring.free();
            if free == 0 {
                return;
            }
            let vc = &self.voices[voice];
            let remaining = (vc.total_samples - vc.loaded_samples) as usize;
            if remaining == 0 {
                // Natural end of data, not an error.
                self.shared.voices[voice].streaming.store(false, Ordering::Release);
                return;
            }
            let chunk = STREAM_CHUNK_SAMPLES.min(remaining).min(free);
            match self.load_chunk(voice, chunk) {
                ChunkOutcome::Loaded(got) if got == chunk => continue,
                // Short read: apply what we got, retry on the next tick.
                ChunkOutcome::Loaded(_) => return,
                ChunkOutcome::Failed => return,
            }
        }
    }

    /// Load one chunk, splitting the storage read in two where it would
    /// cross the ring's wrap point.
    fn load_chunk(&mut self, voice: usize, chunk: usize) -> ChunkOutcome {
        let mut scratch = [0i16; STREAM_CHUNK_SAMPLES];
        let path = self.voices[voice].path;
        let offset = self.voices[voice].loaded_samples;

        let cap = self.shared.voices[voice].ring.capacity();
        let write = self.shared.voices[voice].ring.write_index();
        let first_len = chunk.min(cap - write);

        let mut got = 0usize;
        let mut failed = false;

        match self.store.read_chunk(path.as_str(), offset, &mut scratch[..first_len]) {
            Ok(n) => {
                got = n;
                if n == first_len && chunk > first_len {
                    // Second physical read fills from the ring start. If
                    // it comes up short it is not retried this tick.
                    let second_len = chunk - first_len;
                    let second = self.store.read_chunk(
                        path.as_str(),
                        offset + n as u32,
                        &mut scratch[n..n + second_len],
                    );
                    match second {
                        Ok(m) => got += m,
                        Err(err) => {
                            log::error!("voice {voice} read of {path} at {} failed: {err}", offset + n as u32);
                            failed = true;
                        }
                    }
                }
            }
            Err(err) => {
                log::error!("voice {voice} read of {path} at {offset} failed: {err}");
                failed = true;
            }
        }

        if got > 0 {
            self.shared.voices[voice].ring.commit(&scratch[..got]);
            self.shared.voices[voice].primed.store(true, Ordering::Release);
            self.shared.voices[voice].active.store(true, Ordering::Release);
            self.voices[voice].loaded_samples += got as u32;

            if self.voices[voice].needs_fade_in {
                // First fill since (re)trigger: ramp up from silence so
                // the voice does not start mid-amplitude.
                self.voices[voice].needs_fade_in = false;
                let target = self.voices[voice].desired_gain;
                self.arm_ramp(voice, target, FADE_IN_TICKS);
            }
            if self.voices[voice].loaded_samples >= self.voices[voice].total_samples {
                self.shared.voices[voice].streaming.store(false, Ordering::Release);
            }
        }

        if failed {
            // Keep whatever is buffered; the voice truncates rather than
            // glitching.
            self.shared.voices[voice].streaming.store(false, Ordering::Release);
            return ChunkOutcome::Failed;
        }
        ChunkOutcome::Loaded(got)
    }

    fn arm_ramp(&mut self, voice: usize, target: f32, ticks: u16) {
        let vc = &mut self.voices[voice];
        vc.ramp.arm(target, ticks);
        self.shared.voices[voice].set_gain(vc.ramp.current());
    }

    fn advance_gains(&mut self) {
        for (vc, vs) in self.voices.iter_mut().zip(self.shared.voices.iter()) {
            vs.set_gain(vc.ramp.advance());
        }
    }

    /// Reclaim every voice that has fully drained: loader done, mixer
    /// inactive, buffer empty, and any stop fade settled.
    fn reclaim_voices(&mut self) {
        for voice in 0..VOICE_COUNT {
            let vs = &self.shared.voices[voice];
            let vc = &self.voices[voice];
            let in_use = vs.primed.load(Ordering::Acquire) || vc.draining;
            if !in_use {
                continue;
            }
            if vs.streaming.load(Ordering::Acquire)
                || vs.active.load(Ordering::Acquire)
                || vs.ring.available() > 0
                || !vc.ramp.is_settled()
            {
                continue;
            }

            // Unprime before touching the cursors so the mixer never sees
            // the reset in progress.
            vs.primed.store(false, Ordering::Release);
            vs.ring.reset();

            let vc = &mut self.voices[voice];
            vc.total_samples = 0;
            vc.loaded_samples = 0;
            vc.draining = false;
            vc.needs_fade_in = false;
            vc.path.clear();
            // Restore the user's last requested level as the idle target;
            // the next trigger's mute-then-fade-in masks the snap back.
            let desired = vc.desired_gain;
            vc.ramp.reset(desired);
            vs.set_gain(0.0);

            if !vc.diag_pending && self.jobs.enqueue(Job::Diagnostics { voice }) {
                vc.diag_pending = true;
            }
        }
    }

    fn handle_diagnostics(&mut self, voice: usize) {
        let vc = &mut self.voices[voice];
        vc.diag_pending = false;
        let vs = &self.shared.voices[voice];
        log::info!(
            target: "grit_engine::diag",
            "voice {voice}: path={} loaded={}/{} avail={} rd={} wr={} primed={} active={} streaming={} draining={} gain={:.3}->{:.3}",
            vc.path,
            vc.loaded_samples,
            vc.total_samples,
            vs.ring.available(),
            vs.ring.read_index(),
            vs.ring.write_index(),
            vs.primed.load(Ordering::Acquire),
            vs.active.load(Ordering::Acquire),
            vs.streaming.load(Ordering::Acquire),
            vc.draining,
            vc.ramp.current(),
            vc.ramp.target(),
        );
    }
}
