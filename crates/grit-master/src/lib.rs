//! Headless pad controller for the gritbox sampler.
//!
//! Owns the engine, its storage, and the audio clock, and runs the
//! service loop on a dedicated thread at a bounded interval. Frontends
//! talk to it through plain commands; the engine itself never leaves the
//! service thread, preserving the core's single-main-loop model.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use grit_audio::{AudioError, CpalClock};
use grit_engine::{Engine, SliceStore, StatusHandle};
use grit_storage::RawDirStore;

// Re-export common types so frontends don't need the inner crates directly.
pub use grit_engine::VoiceStatus;
pub use grit_storage::{load_wav_mono, slice_into_row, ImportError, MemStore};

/// How often the service thread ticks the engine.
const SERVICE_PERIOD: Duration = Duration::from_millis(1);

/// A control-plane request forwarded to the service thread.
#[derive(Clone, Debug)]
pub enum PadCommand {
    /// Stream `path` on `voice` and play it.
    Trigger { voice: usize, path: String },
    /// Fade `voice` to silence and stop streaming it.
    Stop { voice: usize },
    /// Glide `voice` to `level`.
    Level { voice: usize, level: f32 },
    /// Request a state dump for `voice`.
    Diagnostics { voice: usize },
}

/// Error type for controller setup.
#[derive(Debug)]
pub enum PadsError {
    Audio(AudioError),
    Storage(std::io::Error),
}

impl std::fmt::Display for PadsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PadsError::Audio(err) => write!(f, "audio: {}", err),
            PadsError::Storage(err) => write!(f, "storage: {}", err),
        }
    }
}

impl std::error::Error for PadsError {}

/// The sampler's pad surface — engine, storage, and clock behind one handle.
pub struct Pads {
    commands: Sender<PadCommand>,
    stop_signal: Arc<AtomicBool>,
    status: StatusHandle,
    thread: Option<JoinHandle<()>>,
    clock: CpalClock,
}

impl Pads {
    /// Bring the sampler up over the slice tree rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PadsError> {
        let store = RawDirStore::new(root);
        store.ensure_tree().map_err(PadsError::Storage)?;

        let (mut engine, mixer) = Engine::new(store);
        engine.begin();
        engine.start();
        let status = engine.status();

        let clock = CpalClock::new(mixer).map_err(PadsError::Audio)?;
        clock.start().map_err(PadsError::Audio)?;

        let (commands, rx) = mpsc::channel();
        let stop_signal = Arc::new(AtomicBool::new(false));
        let stop = stop_signal.clone();
        let thread = std::thread::spawn(move || service_loop(engine, rx, stop));

        Ok(Self {
            commands,
            stop_signal,
            status,
            thread: Some(thread),
            clock,
        })
    }

    pub fn trigger(&self, voice: usize, path: &str) {
        let _ = self.commands.send(PadCommand::Trigger { voice, path: path.to_owned() });
    }

    pub fn stop(&self, voice: usize) {
        let _ = self.commands.send(PadCommand::Stop { voice });
    }

    pub fn set_level(&self, voice: usize, level: f32) {
        let _ = self.commands.send(PadCommand::Level { voice, level });
    }

    pub fn request_diagnostics(&self, voice: usize) {
        let _ = self.commands.send(PadCommand::Diagnostics { voice });
    }

    /// Snapshot of one voice's mixer-visible state.
    pub fn voice_status(&self, voice: usize) -> Option<VoiceStatus> {
        self.status.voice(voice)
    }

    /// True while any voice still holds or expects audio.
    pub fn any_busy(&self) -> bool {
        self.status.any_busy()
    }

    /// Stop the clock and join the service thread.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        self.stop_signal.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
        let _ = self.clock.stop();
    }
}

impl Drop for Pads {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}

fn service_loop<S: SliceStore>(
    mut engine: Engine<S>,
    rx: Receiver<PadCommand>,
    stop: Arc<AtomicBool>,
) where
    S: Send + 'static,
{
    while !stop.load(Ordering::Relaxed) {
        while let Ok(cmd) = rx.try_recv() {
            apply(&mut engine, cmd);
        }
        engine.service();
        std::thread::sleep(SERVICE_PERIOD);
    }
    engine.stop();
}

/// Apply one control-plane command to the engine.
fn apply<S: SliceStore>(engine: &mut Engine<S>, cmd: PadCommand) {
    match cmd {
        PadCommand::Trigger { voice, path } => {
            if !engine.preload_and_play(voice, &path) {
                log::warn!("trigger rejected: voice {} path {}", voice, path);
            }
        }
        PadCommand::Stop { voice } => engine.stop_voice(voice),
        PadCommand::Level { voice, level } => engine.set_level(voice, level),
        PadCommand::Diagnostics { voice } => engine.request_diagnostics(voice),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_slice(path: &str, len: usize) -> Engine<MemStore> {
        let mut store = MemStore::new();
        store.insert(path, (0..len).map(|i| i as i16).collect());
        let (mut engine, _mixer) = Engine::new(store);
        engine.begin();
        engine.start();
        engine
    }

    #[test]
    fn trigger_command_starts_streaming() {
        let mut engine = engine_with_slice("A/A1.raw", 400);
        apply(&mut engine, PadCommand::Trigger { voice: 0, path: "A/A1.raw".into() });
        engine.service();
        let status = engine.status();
        let v = status.voice(0).unwrap();
        assert!(v.primed);
        assert_eq!(v.available, 400);
    }

    #[test]
    fn bad_trigger_is_rejected_not_fatal() {
        let mut engine = engine_with_slice("A/A1.raw", 16);
        apply(&mut engine, PadCommand::Trigger { voice: 9, path: "A/A1.raw".into() });
        engine.service();
        assert!(!engine.status().any_busy());
    }

    #[test]
    fn stop_command_halts_a_voice() {
        let mut engine = engine_with_slice("A/A1.raw", 400);
        apply(&mut engine, PadCommand::Trigger { voice: 1, path: "A/A1.raw".into() });
        engine.service();
        apply(&mut engine, PadCommand::Stop { voice: 1 });
        let v = engine.status().voice(1).unwrap();
        assert!(!v.streaming);
    }

    #[test]
    fn level_command_reaches_the_mixer_gain() {
        let mut engine = engine_with_slice("A/A1.raw", 16);
        apply(&mut engine, PadCommand::Level { voice: 2, level: 0.25 });
        // One tick to process the fade job plus enough to settle the glide
        for _ in 0..20 {
            engine.service();
        }
        let v = engine.status().voice(2).unwrap();
        assert!((v.gain - 0.25).abs() < 1e-6);
    }
}
