//! # Admission Clock
//!
//! Spaces admissions at least `interval` apart by serializing every caller
//! through a single mutex-guarded "next admission" instant.
//!
//! ```text
//!     interval = 100ms
//!
//!     caller   lock      now     next     wait    new next
//!     ──────   ────     ─────   ─────    ─────   ─────────
//!       A      ✅         0       0        0        100
//!       B      ⏳→✅      5      100       95       200   (sleeps 95ms holding the lock)
//!       C      ⏳→✅    100      200      100       300
//! ```
//!
//! The lock is held across the sleep. Whoever takes the lock first leaves
//! first, and the bookkeeping needs no separate wake-up structure. The mutex
//! is `parking_lot`'s, which is eventually fair: waiters are handed the lock
//! in roughly arrival order, but strict FIFO is not guaranteed.

use parking_lot::{Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Mutex-guarded timeline of admissions.
#[derive(Debug)]
pub(crate) struct AdmissionClock {
    next_admission: Mutex<Instant>,
    interval: Duration,
}

impl AdmissionClock {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            next_admission: Mutex::new(Instant::now()),
            interval,
        }
    }

    #[inline]
    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    /// True when admissions are never delayed.
    #[inline]
    pub(crate) fn is_unlimited(&self) -> bool {
        self.interval.is_zero()
    }

    /// Blocks until this caller holds the clock.
    ///
    /// The returned guard keeps every other caller out until it is consumed
    /// by [`ClockGuard::admit`] or dropped.
    #[inline]
    pub(crate) fn acquire(&self) -> ClockGuard<'_> {
        ClockGuard {
            next_admission: self.next_admission.lock(),
            interval: self.interval,
        }
    }

    #[cfg(test)]
    fn next_admission(&self) -> Instant {
        *self.next_admission.lock()
    }
}

/// Exclusive hold on the admission clock.
#[must_use = "dropping the guard releases the clock without admitting"]
pub(crate) struct ClockGuard<'a> {
    next_admission: MutexGuard<'a, Instant>,
    interval: Duration,
}

impl ClockGuard<'_> {
    /// Sleeps until the scheduled admission, then schedules the next one.
    ///
    /// The next admission is computed from the `now` read before sleeping
    /// plus the slept duration, so time spent waking up is not added on top.
    /// The lock is released when this returns.
    pub(crate) fn admit(mut self) -> Duration {
        let now = Instant::now();
        let wait = self.next_admission.saturating_duration_since(now);

        if wait.is_zero() {
            *self.next_admission = now + self.interval;
        } else {
            debug!(wait_us = wait.as_micros() as u64, "Delaying admission");
            thread::sleep(wait);
            *self.next_admission = now + self.interval + wait;
        }

        wait
    }
}
