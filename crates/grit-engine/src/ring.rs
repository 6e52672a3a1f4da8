//! Lock-free sample ring shared between the stream loader and the mixer.
//!
//! Single producer (the service-side loader) and single consumer (the
//! interrupt-rate mixer). Slots are published by storing sample data first
//! and then adding to `available` with Release; the consumer's Acquire load
//! of `available` makes the slot contents visible. Each cursor is advanced
//! by exactly one side, so no stronger synchronization is needed.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicI16, AtomicU32, Ordering};

pub(crate) struct StreamRing {
    slots: Box<[AtomicI16]>,
    /// Next slot the mixer reads. Mixer-owned outside of voice reclamation.
    read: AtomicU32,
    /// Next slot the loader fills. Loader-owned.
    write: AtomicU32,
    /// Samples currently readable. Incremented by the loader, decremented
    /// by the mixer.
    available: AtomicU32,
}

impl StreamRing {
    pub fn new(capacity: usize) -> Self {
        let slots: Vec<AtomicI16> = (0..capacity).map(|_| AtomicI16::new(0)).collect();
        Self {
            slots: slots.into_boxed_slice(),
            read: AtomicU32::new(0),
            write: AtomicU32::new(0),
            available: AtomicU32::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn available(&self) -> usize {
        self.available.load(Ordering::Acquire) as usize
    }

    pub fn free(&self) -> usize {
        self.capacity() - self.available()
    }

    pub fn read_index(&self) -> usize {
        self.read.load(Ordering::Relaxed) as usize
    }

    pub fn write_index(&self) -> usize {
        self.write.load(Ordering::Relaxed) as usize
    }

    /// Publish `samples` starting at the write cursor, wrapping as needed.
    ///
    /// Caller must not exceed `free()`; the loader's chunk math guarantees
    /// that.
    pub fn commit(&self, samples: &[i16]) {
        debug_assert!(samples.len() <= self.free());
        let cap = self.capacity();
        let start = self.write_index();
        for (i, &s) in samples.iter().enumerate() {
            self.slots[(start + i) % cap].store(s, Ordering::Relaxed);
        }
        self.write
            .store(((start + samples.len()) % cap) as u32, Ordering::Relaxed);
        self.available
            .fetch_add(samples.len() as u32, Ordering::Release);
    }

    /// Consume one sample. Returns the sample and the count left after it.
    pub fn pop(&self) -> Option<(i16, usize)> {
        if self.available.load(Ordering::Acquire) == 0 {
            return None;
        }
        let cap = self.capacity();
        let r = self.read_index();
        let sample = self.slots[r].load(Ordering::Relaxed);
        self.read.store(((r + 1) % cap) as u32, Ordering::Relaxed);
        let before = self.available.fetch_sub(1, Ordering::Release);
        Some((sample, before as usize - 1))
    }

    /// Empty the ring and rewind both cursors.
    ///
    /// Service-side only, and only while the mixer is skipping this voice
    /// (voice unprimed), so the mixer never observes the cursors mid-reset.
    pub fn reset(&self) {
        self.available.store(0, Ordering::Release);
        self.read.store(0, Ordering::Relaxed);
        self.write.store(0, Ordering::Relaxed);
    }

    #[cfg(test)]
    pub fn force(&self, read: usize, write: usize, available: usize) {
        self.read.store(read as u32, Ordering::Relaxed);
        self.write.store(write as u32, Ordering::Relaxed);
        self.available.store(available as u32, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let ring = StreamRing::new(8);
        assert_eq!(ring.available(), 0);
        assert_eq!(ring.free(), 8);
        assert!(ring.pop().is_none());
    }

    #[test]
    fn commit_then_pop_in_order() {
        let ring = StreamRing::new(8);
        ring.commit(&[1, 2, 3]);
        assert_eq!(ring.available(), 3);
        assert_eq!(ring.pop(), Some((1, 2)));
        assert_eq!(ring.pop(), Some((2, 1)));
        assert_eq!(ring.pop(), Some((3, 0)));
        assert!(ring.pop().is_none());
    }

    #[test]
    fn wraps_around_capacity() {
        let ring = StreamRing::new(4);
        ring.commit(&[1, 2, 3]);
        ring.pop();
        ring.pop();
        // write cursor at 3, two slots free at the wrap point
        ring.commit(&[4, 5]);
        assert_eq!(ring.write_index(), 1);
        assert_eq!(ring.pop(), Some((3, 2)));
        assert_eq!(ring.pop(), Some((4, 1)));
        assert_eq!(ring.pop(), Some((5, 0)));
    }

    #[test]
    fn cursors_stay_below_capacity() {
        let ring = StreamRing::new(5);
        for round in 0..7 {
            ring.commit(&[round as i16; 3]);
            for _ in 0..3 {
                ring.pop().unwrap();
            }
            assert!(ring.read_index() < 5);
            assert!(ring.write_index() < 5);
            assert!(ring.available() <= 5);
        }
    }

    #[test]
    fn reset_rewinds_everything() {
        let ring = StreamRing::new(8);
        ring.commit(&[9; 5]);
        ring.pop();
        ring.reset();
        assert_eq!(ring.available(), 0);
        assert_eq!(ring.read_index(), 0);
        assert_eq!(ring.write_index(), 0);
    }
}
