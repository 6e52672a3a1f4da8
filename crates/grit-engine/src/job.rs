//! Deferred job queue bridging control-plane calls and the service tick.

use grit_core::{SlicePath, JOB_QUEUE_SIZE};
use heapless::Deque;

/// A deferred command record, processed only by [`Engine::service`].
///
/// Jobs are plain values with no external ownership; the queue owns a
/// fixed-capacity array of slots.
///
/// [`Engine::service`]: crate::Engine::service
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Job {
    /// Bind a voice to a stored slice and begin streaming it.
    Preload { voice: usize, path: SlicePath },
    /// Glide a voice's gain to `target` over `ticks` service ticks.
    Fade { voice: usize, target: f32, ticks: u16 },
    /// Dump a voice's state to the diagnostic sink.
    Diagnostics { voice: usize },
}

/// Bounded FIFO of [`Job`]s.
///
/// Intentionally small: overflow indicates upstream misuse and is reported
/// by the caller through the diagnostic sink, never fatal. Single-context
/// by construction — control-plane calls and the service tick share one
/// execution thread — so no synchronization is needed here.
#[derive(Default)]
pub(crate) struct JobQueue {
    jobs: Deque<Job, JOB_QUEUE_SIZE>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self { jobs: Deque::new() }
    }

    /// Returns false when the queue is full. Never blocks, never grows.
    pub fn enqueue(&mut self, job: Job) -> bool {
        self.jobs.push_back(job).is_ok()
    }

    pub fn pop(&mut self) -> Option<Job> {
        self.jobs.pop_front()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fade(voice: usize) -> Job {
        Job::Fade { voice, target: 0.5, ticks: 8 }
    }

    #[test]
    fn fifo_order() {
        let mut q = JobQueue::new();
        assert!(q.enqueue(fade(0)));
        assert!(q.enqueue(Job::Diagnostics { voice: 1 }));
        assert_eq!(q.pop(), Some(fade(0)));
        assert_eq!(q.pop(), Some(Job::Diagnostics { voice: 1 }));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn enqueue_fails_when_full() {
        let mut q = JobQueue::new();
        for v in 0..JOB_QUEUE_SIZE {
            assert!(q.enqueue(fade(v)));
        }
        assert!(!q.enqueue(fade(99)));
        assert_eq!(q.len(), JOB_QUEUE_SIZE);
        // Queue contents are untouched by the failed enqueue
        assert_eq!(q.pop(), Some(fade(0)));
    }
}
