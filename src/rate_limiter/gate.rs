//! # Queue Gate
//!
//! Bounds how many callers may wait for the admission clock at the same time.
//! The gate is a single atomic counter updated with a compare-and-swap loop;
//! it never takes a lock and never parks the calling thread, so a full queue
//! is detected without waiting behind the clock's mutex.
//!
//! ```text
//!     enter():
//!
//!     load(queued) ──► full? ──Yes──► ❌ QueueFull (no state change)
//!          ▲              │
//!          │              No
//!          │              ▼
//!          └──Lost──  CAS(q, q+1) ──Won──► ✅ queued
//! ```
//!
//! The gate only decides who may join the wait line. Order of service is
//! decided entirely by the clock's lock.

use super::{
    config::MemoryOrdering,
    error::{RateLimitError, Result},
    utils::{Backoff, CacheAligned},
};
use std::sync::atomic::AtomicU32;
use tracing::{debug, trace};

/// Spin steps before backoff stops growing (2^5 = 32 spins per retry).
const MAX_BACKOFF_STEP: u32 = 5;

/// Lock-free counter of callers waiting for the admission clock.
#[derive(Debug)]
pub(crate) struct QueueGate {
    queued: CacheAligned<AtomicU32>,
    max_queue: u32,
    ordering: MemoryOrdering,
}

impl QueueGate {
    /// Creates a gate. A `max_queue` of zero disables the ceiling.
    pub(crate) fn new(max_queue: u32, ordering: MemoryOrdering) -> Self {
        Self {
            queued: CacheAligned::new(AtomicU32::new(0)),
            max_queue,
            ordering,
        }
    }

    #[inline]
    pub(crate) fn is_bounded(&self) -> bool {
        self.max_queue > 0
    }

    #[inline]
    pub(crate) fn max_queue(&self) -> u32 {
        self.max_queue
    }

    /// Current number of callers inside the gate. Always 0 when unbounded.
    #[inline]
    pub(crate) fn depth(&self) -> u32 {
        self.queued.get().load(self.ordering.load())
    }

    /// Reserves a place in the wait queue.
    ///
    /// Retries the compare-and-swap until it either wins a slot or observes
    /// the queue at its ceiling.
    ///
    /// # Errors
    ///
    /// [`RateLimitError::QueueFull`] if the queue is at `max_queue`. Nothing is
    /// modified in that case.
    pub(crate) fn enter(&self) -> Result<()> {
        if !self.is_bounded() {
            return Ok(());
        }

        let mut backoff = Backoff::new(MAX_BACKOFF_STEP);
        let mut current = self.depth();

        loop {
            if current == u32::MAX || current >= self.max_queue {
                debug!(
                    queued = current,
                    max_queue = self.max_queue,
                    "Rate limiter queue is full, rejecting caller"
                );
                return Err(RateLimitError::QueueFull);
            }

            match self.queued.get().compare_exchange_weak(
                current,
                current + 1,
                self.ordering.rmw(),
                self.ordering.cas_failure(),
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => {
                    // Lost the race to another caller; re-check against the fresh value.
                    current = actual;
                    if backoff.is_at_max() {
                        trace!(queued = current, "Queue gate CAS under heavy contention");
                    }
                    backoff.spin();
                }
            }
        }
    }

    /// Releases a place taken by a successful [`enter`](Self::enter).
    #[inline]
    pub(crate) fn exit(&self) {
        if !self.is_bounded() {
            return;
        }

        let previous = self.queued.get().fetch_sub(1, self.ordering.rmw());
        debug_assert!(previous > 0, "queue gate exited more times than entered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32 as Counter, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_unbounded_gate_never_counts() {
        let gate = QueueGate::new(0, MemoryOrdering::default());

        for _ in 0..100 {
            assert!(gate.enter().is_ok());
        }
        assert_eq!(gate.depth(), 0);

        for _ in 0..100 {
            gate.exit();
        }
        assert_eq!(gate.depth(), 0);
    }

    #[test]
    fn test_bounded_gate_rejects_at_ceiling() {
        let gate = QueueGate::new(3, MemoryOrdering::default());

        assert!(gate.enter().is_ok());
        assert!(gate.enter().is_ok());
        assert!(gate.enter().is_ok());
        assert_eq!(gate.depth(), 3);

        assert_eq!(gate.enter(), Err(RateLimitError::QueueFull));
        // Rejection leaves the counter untouched
        assert_eq!(gate.depth(), 3);

        gate.exit();
        assert_eq!(gate.depth(), 2);
        assert!(gate.enter().is_ok());
        assert_eq!(gate.depth(), 3);
    }

    #[test]
    fn test_repeated_rejections_are_side_effect_free() {
        let gate = QueueGate::new(1, MemoryOrdering::default());
        gate.enter().unwrap();

        for _ in 0..10_000 {
            assert!(gate.enter().unwrap_err().is_queue_full());
        }
        assert_eq!(gate.depth(), 1);

        gate.exit();
        assert_eq!(gate.depth(), 0);
    }

    #[test]
    fn test_max_representable_queue() {
        let gate = QueueGate::new(u32::MAX, MemoryOrdering::Relaxed);
        gate.queued.get().store(u32::MAX - 1, Ordering::Relaxed);

        // The last representable slot can still be taken
        assert!(gate.enter().is_ok());
        assert_eq!(gate.depth(), u32::MAX);

        // A saturated counter is treated as full and never wraps
        assert!(gate.enter().is_err());
        assert_eq!(gate.depth(), u32::MAX);
    }

    #[test]
    fn test_concurrent_enter_respects_ceiling() {
        let max_queue = 8;
        let gate = Arc::new(QueueGate::new(max_queue, MemoryOrdering::AcquireRelease));
        let barrier = Arc::new(Barrier::new(32));
        let entered = Arc::new(Counter::new(0));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let gate = gate.clone();
                let barrier = barrier.clone();
                let entered = entered.clone();
                thread::spawn(move || {
                    barrier.wait();
                    if gate.enter().is_ok() {
                        entered.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // Nobody exited, so exactly max_queue callers got in
        assert_eq!(entered.load(Ordering::SeqCst), max_queue);
        assert_eq!(gate.depth(), max_queue);
    }

    #[test]
    fn test_enter_exit_stress_never_exceeds_ceiling() {
        let max_queue = 4;
        let gate = Arc::new(QueueGate::new(max_queue, MemoryOrdering::Sequential));
        let observed_max = Arc::new(Counter::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let gate = gate.clone();
                let observed_max = observed_max.clone();
                thread::spawn(move || {
                    for _ in 0..2_000 {
                        if gate.enter().is_ok() {
                            observed_max.fetch_max(gate.depth(), Ordering::SeqCst);
                            gate.exit();
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(observed_max.load(Ordering::SeqCst) <= max_queue);
        assert_eq!(gate.depth(), 0);
    }
}
