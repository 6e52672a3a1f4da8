//! Slice storage backends for the gritbox sampler.
//!
//! Implements the engine's [`SliceStore`] seam over a host filesystem and
//! in memory, plus WAV import that chops a capture into pad-row slices.
//!
//! [`SliceStore`]: grit_engine::SliceStore

mod mem;
mod raw_dir;
mod wav;

pub use mem::MemStore;
pub use raw_dir::RawDirStore;
pub use wav::{load_wav_mono, slice_into_row, ImportError};
