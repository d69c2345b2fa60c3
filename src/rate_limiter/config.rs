//! # Rate Limiter Configuration
//!
//! Settings for an interval limiter. A limiter is described by two numbers:
//! the minimum spacing between admissions and the largest number of callers
//! allowed to wait for their turn.
//!
//! ```text
//!     interval = 250ms, max_queue = 3
//!
//!     time ──►  0ms      250ms     500ms     750ms
//!               │         │         │         │
//!     admitted  A         B         C         D
//!
//!     waiting   [B C D]   [C D]     [D]       []
//!                 ▲
//!                 └── a 5th caller arriving here is rejected (queue full)
//! ```
//!
//! ### Memory Ordering
//!
//! The queue counter and the metrics counters are plain atomics. The ordering
//! used for them is configurable:
//!
//! ```text
//!     Relaxed ──────► Fast but minimal guarantees
//!        │
//!     AcquireRelease ► Balanced (recommended)
//!        │
//!     Sequential ───► Slow but strongest guarantees
//! ```

use super::error::{RateLimitError, Result};
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

/// Interval value that disables limiting entirely.
///
/// A limiter built with this interval admits every caller immediately and
/// never touches its queue or clock.
pub const NO_LIMIT: Duration = Duration::ZERO;

/// Computes the spacing between calls for a "`count` requests per `period`" rate.
///
/// ```rust
/// use pacer::per_duration;
/// use std::time::Duration;
///
/// // 100 requests per second => one every 10ms
/// assert_eq!(per_duration(100, Duration::from_secs(1)), Duration::from_millis(10));
/// ```
///
/// A `count` of zero has no meaningful spacing and yields [`NO_LIMIT`].
#[inline]
pub fn per_duration(count: u32, period: Duration) -> Duration {
    period.checked_div(count).unwrap_or(NO_LIMIT)
}

/// Memory ordering strategy for atomic operations.
///
/// Controls the synchronization used for the wait-queue counter and the
/// metrics counters. The clock itself is always protected by a mutex and is
/// not affected by this setting.
///
/// ## Example
///
/// ```rust
/// use pacer::{RateLimiterConfig, MemoryOrdering};
/// use std::time::Duration;
///
/// let config = RateLimiterConfig::new(Duration::from_millis(10))
///     .with_ordering(MemoryOrdering::Sequential);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryOrdering {
    /// Relaxed ordering - fastest but provides minimal guarantees.
    Relaxed,

    /// Acquire-Release ordering - balanced performance and correctness (default).
    #[default]
    AcquireRelease,

    /// Sequential consistency - strongest guarantees but slower.
    Sequential,
}

impl MemoryOrdering {
    /// Returns the appropriate `Ordering` for load (read) operations.
    #[inline(always)]
    pub(crate) fn load(&self) -> Ordering {
        match self {
            Self::Relaxed => Ordering::Relaxed,
            Self::AcquireRelease => Ordering::Acquire,
            Self::Sequential => Ordering::SeqCst,
        }
    }

    /// Returns the appropriate `Ordering` for read-modify-write operations.
    #[inline(always)]
    pub(crate) fn rmw(&self) -> Ordering {
        match self {
            Self::Relaxed => Ordering::Relaxed,
            Self::AcquireRelease => Ordering::AcqRel,
            Self::Sequential => Ordering::SeqCst,
        }
    }

    /// Returns the appropriate `Ordering` for compare-and-swap failure cases.
    #[inline(always)]
    pub(crate) fn cas_failure(&self) -> Ordering {
        match self {
            Self::Relaxed => Ordering::Relaxed,
            Self::AcquireRelease => Ordering::Acquire,
            Self::Sequential => Ordering::SeqCst,
        }
    }
}

/// Configuration for rate limiter instances.
///
/// Both values are fixed once a limiter is built.
///
/// ## Examples
///
/// ```rust
/// use pacer::RateLimiterConfig;
/// use std::time::Duration;
///
/// // One call every 10ms, unbounded queue
/// let config = RateLimiterConfig::new(Duration::from_millis(10));
///
/// // 60 calls per minute, at most 5 callers waiting
/// let config = RateLimiterConfig::per_minute(60).with_max_queue_size(5);
/// assert_eq!(config.interval, Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Minimum time between two successive admissions.
    ///
    /// [`NO_LIMIT`] (zero) disables limiting.
    pub interval: Duration,

    /// Maximum number of callers allowed to wait for the clock at once.
    ///
    /// Zero means the queue is unbounded and never rejects.
    pub max_queue: u32,

    /// Memory ordering strategy for the queue and metrics counters.
    pub ordering: MemoryOrdering,
}

impl Default for RateLimiterConfig {
    /// An unlimited limiter with an unbounded queue.
    fn default() -> Self {
        Self {
            interval: NO_LIMIT,
            max_queue: 0,
            ordering: MemoryOrdering::AcquireRelease,
        }
    }
}

impl RateLimiterConfig {
    /// Creates a configuration spacing admissions by `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Creates a configuration that never limits.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Creates a configuration admitting `requests_per_second` calls per second.
    ///
    /// ```rust
    /// use pacer::RateLimiterConfig;
    /// use std::time::Duration;
    ///
    /// let config = RateLimiterConfig::per_second(500);
    /// assert_eq!(config.interval, Duration::from_millis(2));
    /// ```
    pub fn per_second(requests_per_second: u32) -> Self {
        Self::new(per_duration(requests_per_second, Duration::from_secs(1)))
    }

    /// Creates a configuration admitting `requests_per_minute` calls per minute.
    pub fn per_minute(requests_per_minute: u32) -> Self {
        Self::new(per_duration(requests_per_minute, Duration::from_secs(60)))
    }

    /// Sets the maximum number of waiting callers. Zero means unbounded.
    pub fn with_max_queue_size(mut self, max_queue: u32) -> Self {
        self.max_queue = max_queue;
        self
    }

    /// Sets the memory ordering strategy.
    pub fn with_ordering(mut self, ordering: MemoryOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Returns true if this configuration disables limiting.
    #[inline]
    pub fn is_unlimited(&self) -> bool {
        self.interval.is_zero()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitError::InvalidConfig`] if the interval is so large
    /// that the next admission time cannot be represented.
    ///
    /// ```rust
    /// use pacer::RateLimiterConfig;
    /// use std::time::Duration;
    ///
    /// assert!(RateLimiterConfig::new(Duration::MAX).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if Instant::now().checked_add(self.interval).is_none() {
            return Err(RateLimitError::InvalidConfig(
                "interval is too large to schedule admissions",
            ));
        }

        Ok(())
    }

    /// Returns the admission rate per second, or infinity when unlimited.
    pub fn effective_rate_per_second(&self) -> f64 {
        if self.interval.is_zero() {
            f64::INFINITY
        } else {
            1.0 / self.interval.as_secs_f64()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_duration() {
        let cases = [
            ("100 per second", 100, Duration::from_secs(1), Duration::from_millis(10)),
            ("500 per second", 500, Duration::from_secs(1), Duration::from_millis(2)),
            ("60 per minute", 60, Duration::from_secs(60), Duration::from_secs(1)),
        ];

        for (name, count, period, want) in cases {
            assert_eq!(per_duration(count, period), want, "{}", name);
        }
    }

    #[test]
    fn test_per_duration_zero_count() {
        assert_eq!(per_duration(0, Duration::from_secs(1)), NO_LIMIT);
    }

    #[test]
    fn test_memory_ordering() {
        let ordering = MemoryOrdering::AcquireRelease;
        assert_eq!(ordering.load(), Ordering::Acquire);
        assert_eq!(ordering.rmw(), Ordering::AcqRel);
        assert_eq!(ordering.cas_failure(), Ordering::Acquire);
    }

    #[test]
    fn test_memory_ordering_all_variants() {
        let relaxed = MemoryOrdering::Relaxed;
        assert_eq!(relaxed.load(), Ordering::Relaxed);
        assert_eq!(relaxed.rmw(), Ordering::Relaxed);
        assert_eq!(relaxed.cas_failure(), Ordering::Relaxed);

        let sequential = MemoryOrdering::Sequential;
        assert_eq!(sequential.load(), Ordering::SeqCst);
        assert_eq!(sequential.rmw(), Ordering::SeqCst);
        assert_eq!(sequential.cas_failure(), Ordering::SeqCst);
    }

    #[test]
    fn test_default_config() {
        let config = RateLimiterConfig::default();
        assert!(config.is_unlimited());
        assert_eq!(config.max_queue, 0);
        assert_eq!(config.ordering, MemoryOrdering::AcquireRelease);
        assert_eq!(config, RateLimiterConfig::unlimited());
    }

    #[test]
    fn test_config_builders() {
        let config = RateLimiterConfig::per_second(100).with_max_queue_size(4);
        assert_eq!(config.interval, Duration::from_millis(10));
        assert_eq!(config.max_queue, 4);
        assert!((config.effective_rate_per_second() - 100.0).abs() < 1e-9);

        let config = RateLimiterConfig::per_minute(120);
        assert_eq!(config.interval, Duration::from_millis(500));
        assert!((config.effective_rate_per_second() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_config_with_ordering() {
        let config = RateLimiterConfig::default().with_ordering(MemoryOrdering::Sequential);
        assert_eq!(config.ordering, MemoryOrdering::Sequential);
    }

    #[test]
    fn test_config_validation() {
        assert!(RateLimiterConfig::default().validate().is_ok());
        assert!(RateLimiterConfig::new(Duration::from_secs(3600)).validate().is_ok());

        let err = RateLimiterConfig::new(Duration::MAX).validate().unwrap_err();
        assert!(matches!(err, RateLimitError::InvalidConfig(_)));
    }

    #[test]
    fn test_unlimited_rate() {
        assert!(RateLimiterConfig::unlimited()
            .effective_rate_per_second()
            .is_infinite());
    }
}
