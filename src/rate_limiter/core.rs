//! # Core Rate Limiter Implementation
//!
//! Composes the queue gate and the admission clock into the blocking
//! [`RateLimiter::wait`] call.
//!
//! ```text
//!     wait() flow:
//!
//!     unlimited? ──Yes──────────────────────────────────────► ✅ Ok
//!         │
//!         No
//!         ▼
//!     gate.enter() ──Full──► ❌ QueueFull
//!         │
//!         ▼
//!     clock.acquire()   (blocks behind earlier callers)
//!         │
//!         ▼
//!     gate.exit()       (no longer queued once the clock is held)
//!         │
//!         ▼
//!     guard.admit()     (sleeps until this caller's slot) ──────► ✅ Ok
//! ```
//!
//! "Queued" therefore means "waiting for a turn at the clock", not "waiting
//! for the timer": a caller sleeping inside the clock is not counted.

use super::{
    clock::AdmissionClock,
    config::{MemoryOrdering, RateLimiterConfig},
    error::Result,
    gate::QueueGate,
    metrics::RateLimiterMetrics,
};
use std::sync::atomic::AtomicU64;
use std::time::Duration;
use tracing::debug;

/// Blocking interval rate limiter.
///
/// Every successful [`wait`](Self::wait) is separated from the previous one by
/// at least the configured interval, no matter how many threads share the
/// limiter. An optional queue ceiling makes excess callers fail fast instead
/// of piling up behind the clock.
///
/// ## Example
///
/// ```rust
/// use pacer::RateLimiter;
/// use std::sync::Arc;
/// use std::thread;
/// use std::time::Duration;
///
/// let limiter = Arc::new(RateLimiter::new(Duration::from_millis(5)));
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let limiter = limiter.clone();
///         thread::spawn(move || limiter.wait())
///     })
///     .collect();
///
/// for handle in handles {
///     assert!(handle.join().unwrap().is_ok());
/// }
/// ```
pub struct RateLimiter {
    gate: QueueGate,
    clock: AdmissionClock,
    ordering: MemoryOrdering,

    // Metrics (never consulted for admission decisions)
    total_admitted: AtomicU64,
    total_rejected: AtomicU64,
    total_delayed: AtomicU64,
    total_wait_ns: AtomicU64,
    max_wait_ns: AtomicU64,
}

impl RateLimiter {
    /// Creates a limiter spacing admissions by `interval` with an unbounded queue.
    ///
    /// Pass [`NO_LIMIT`](crate::NO_LIMIT) to disable limiting.
    ///
    /// ```rust
    /// use pacer::{per_duration, RateLimiter};
    /// use std::time::Duration;
    ///
    /// // 100 requests per second
    /// let limiter = RateLimiter::new(per_duration(100, Duration::from_secs(1)));
    /// assert_eq!(limiter.interval(), Duration::from_millis(10));
    /// ```
    #[inline]
    pub fn new(interval: Duration) -> Self {
        Self::with_config(RateLimiterConfig::new(interval))
    }

    /// Creates a limiter from a full configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid (see [`RateLimiterConfig::validate`]).
    /// Use [`RateLimiterBuilder::try_build`](crate::RateLimiterBuilder::try_build)
    /// to get an error instead.
    ///
    /// ```rust
    /// use pacer::{RateLimiter, RateLimiterConfig};
    ///
    /// let limiter = RateLimiter::with_config(
    ///     RateLimiterConfig::per_second(10).with_max_queue_size(3),
    /// );
    /// assert_eq!(limiter.max_queue(), 3);
    /// ```
    pub fn with_config(config: RateLimiterConfig) -> Self {
        config.validate().expect("Invalid rate limiter configuration");

        debug!(
            interval_us = config.interval.as_micros() as u64,
            max_queue = config.max_queue,
            "Created rate limiter"
        );

        Self {
            gate: QueueGate::new(config.max_queue, config.ordering),
            clock: AdmissionClock::new(config.interval),
            ordering: config.ordering,
            total_admitted: AtomicU64::new(0),
            total_rejected: AtomicU64::new(0),
            total_delayed: AtomicU64::new(0),
            total_wait_ns: AtomicU64::new(0),
            max_wait_ns: AtomicU64::new(0),
        }
    }

    /// Blocks until the caller may proceed.
    ///
    /// Returns immediately for an unlimited limiter. Otherwise the caller
    /// joins the wait queue, waits for the clock, and sleeps until its slot.
    /// Once past the queue check the call cannot fail and cannot be cancelled.
    ///
    /// # Errors
    ///
    /// [`RateLimitError::QueueFull`](crate::RateLimitError::QueueFull) if a
    /// queue ceiling is configured and already reached. The clock is not
    /// touched in that case.
    ///
    /// ```rust
    /// use pacer::RateLimiter;
    /// use std::time::Duration;
    ///
    /// let limiter = RateLimiter::new(Duration::from_millis(1));
    /// for _ in 0..3 {
    ///     limiter.wait().expect("unbounded queue never rejects");
    /// }
    /// ```
    pub fn wait(&self) -> Result<()> {
        if self.clock.is_unlimited() {
            return Ok(());
        }

        if let Err(err) = self.gate.enter() {
            self.total_rejected.fetch_add(1, self.ordering.rmw());
            return Err(err);
        }

        let guard = self.clock.acquire();
        self.gate.exit();

        let waited = guard.admit();
        self.on_admission(waited);

        Ok(())
    }

    /// Number of callers currently waiting for a turn at the clock.
    ///
    /// Always 0 when no queue ceiling is configured.
    #[inline]
    pub fn num_queued(&self) -> u32 {
        self.gate.depth()
    }

    /// The minimum spacing between admissions.
    #[inline]
    pub fn interval(&self) -> Duration {
        self.clock.interval()
    }

    /// The configured queue ceiling, 0 if unbounded.
    #[inline]
    pub fn max_queue(&self) -> u32 {
        self.gate.max_queue()
    }

    /// True if this limiter never delays callers.
    #[inline]
    pub fn is_unlimited(&self) -> bool {
        self.clock.is_unlimited()
    }

    /// Records an admission that went through the clock.
    #[inline]
    fn on_admission(&self, waited: Duration) {
        self.total_admitted.fetch_add(1, self.ordering.rmw());

        if waited.is_zero() {
            return;
        }

        let wait_ns = u64::try_from(waited.as_nanos()).unwrap_or(u64::MAX);
        self.total_delayed.fetch_add(1, self.ordering.rmw());
        self.total_wait_ns.fetch_add(wait_ns, self.ordering.rmw());
        self.max_wait_ns.fetch_max(wait_ns, self.ordering.rmw());
    }

    /// Returns a snapshot of the limiter's counters.
    ///
    /// ```rust
    /// use pacer::RateLimiter;
    /// use std::time::Duration;
    ///
    /// let limiter = RateLimiter::new(Duration::from_millis(1));
    /// limiter.wait().unwrap();
    /// limiter.wait().unwrap();
    ///
    /// let metrics = limiter.metrics();
    /// assert_eq!(metrics.total_admitted, 2);
    /// println!("{}", metrics);
    /// ```
    pub fn metrics(&self) -> RateLimiterMetrics {
        let ordering = self.ordering.load();
        RateLimiterMetrics {
            total_admitted: self.total_admitted.load(ordering),
            total_rejected: self.total_rejected.load(ordering),
            total_delayed: self.total_delayed.load(ordering),
            total_wait_ns: self.total_wait_ns.load(ordering),
            max_wait_ns: self.max_wait_ns.load(ordering),
            queued: self.gate.depth(),
            max_queue: self.gate.max_queue(),
            interval: self.clock.interval(),
        }
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("interval", &self.interval())
            .field("max_queue", &self.max_queue())
            .field("queued", &self.num_queued())
            .finish()
    }
}
