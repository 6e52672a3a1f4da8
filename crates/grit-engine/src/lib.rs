//! Voice streaming and mixing engine for the gritbox sampler.
//!
//! Four sample voices stream from slow block storage into fixed-size
//! circular buffers and are mixed at the fixed output rate. The engine is
//! split into two execution contexts: a cooperative service side
//! ([`Engine::service`]) that owns storage I/O, the deferred job queue,
//! gain ramps, and voice lifecycle, and an interrupt-rate side
//! ([`Mixer::next_sample`]) that only ever reads buffers and flags the
//! service side maintains. The two sides share state through lock-free
//! atomics, so the mix path never blocks and never allocates.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod engine;
mod gain;
mod job;
mod mixer;
mod ring;
mod store;
mod voice;

pub use engine::Engine;
pub use job::Job;
pub use mixer::{DacSample, Mixer};
pub use store::{SliceStore, StorageError};
pub use voice::{StatusHandle, VoiceStatus};
