//! # Pacer - Interval Rate Limiter for Rust
//!
//! A blocking rate limiter that spaces calls a fixed interval apart, shared by
//! any number of threads. Use it in front of outbound work that must respect a
//! limit such as "no more than 100 requests per second".
//!
//! ## How It Works
//!
//! Every caller goes through two stages:
//!
//! ```text
//!     Caller ──► Queue Gate ──► Admission Clock ──► your work
//!                   │                 │
//!                   │                 └─ one caller at a time, sleeps
//!                   │                    until `interval` after the last
//!                   │                    admission
//!                   │
//!                   └─ lock-free counter, rejects at once
//!                      when `max_queue` callers already wait
//! ```
//!
//! - **Interval** = the minimum time between two admissions
//! - **Queue ceiling** = how many callers may wait for their turn (0 = unbounded)
//!
//! ## Quick Start
//!
//! ### Basic Rate Limiting
//!
//! ```rust
//! use pacer::{per_duration, RateLimiter};
//! use std::time::Duration;
//!
//! // 100 requests per second => one every 10ms
//! let limiter = RateLimiter::new(per_duration(100, Duration::from_secs(1)));
//!
//! for _ in 0..3 {
//!     limiter.wait().expect("unbounded queue never rejects");
//!     // Perform the rate-limited work here
//! }
//! ```
//!
//! ### Bounded Queue
//!
//! ```rust
//! use pacer::{RateLimitError, RateLimiterBuilder};
//! use std::time::Duration;
//!
//! let limiter = RateLimiterBuilder::new()
//!     .interval(Duration::from_millis(50))
//!     .max_queue_size(8)
//!     .build();
//!
//! match limiter.wait() {
//!     Ok(()) => { /* proceed */ }
//!     Err(RateLimitError::QueueFull) => { /* drop or retry later */ }
//!     Err(err) => panic!("unexpected error: {}", err),
//! }
//! ```
//!
//! ## Thread Safety
//!
//! `RateLimiter` is `Send + Sync`; share it with `Arc<RateLimiter>`
//! ([`SharedRateLimiter`]). Admissions are served in the order callers obtain
//! the clock's mutex. That mutex is eventually fair, not strictly FIFO.
//!
//! ## Cancellation
//!
//! A caller that passed the queue gate always waits for its slot; there is no
//! timeout or cancellation.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    missing_debug_implementations
)]
#![forbid(unsafe_code)]

mod rate_limiter;

pub use rate_limiter::{
    cpu_relax, per_duration, HealthStatus, MemoryOrdering, RateLimitError, RateLimiter,
    RateLimiterConfig, RateLimiterMetrics, Result, CACHE_LINE_SIZE, NO_LIMIT,
};

use std::time::Duration;

/// A rate limiter wrapped in `Arc` for convenient thread-safe sharing.
///
/// # Example
/// ```rust
/// use pacer::{RateLimiter, SharedRateLimiter};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let shared: SharedRateLimiter = Arc::new(RateLimiter::new(Duration::from_millis(1)));
///
/// let limiter = shared.clone();
/// std::thread::spawn(move || limiter.wait()).join().unwrap().unwrap();
/// ```
pub type SharedRateLimiter = std::sync::Arc<RateLimiter>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minimum supported Rust version.
pub const MSRV: &str = "1.70.0";

/// Prelude module for convenient imports.
///
/// ```rust
/// use pacer::prelude::*;
/// ```
pub mod prelude {
    //! Common imports for typical rate limiting use cases.

    pub use crate::{
        per_duration, HealthStatus, MemoryOrdering, RateLimitError, RateLimiter,
        RateLimiterBuilder, RateLimiterConfig, RateLimiterMetrics, SharedRateLimiter, NO_LIMIT,
    };
}

/// Builder pattern for creating rate limiters with custom configuration.
///
/// # Example
///
/// ```rust
/// use pacer::{RateLimiterBuilder, MemoryOrdering};
/// use std::time::Duration;
///
/// // 60 requests per minute, at most 10 callers waiting
/// let limiter = RateLimiterBuilder::new()
///     .per_duration(60, Duration::from_secs(60))
///     .max_queue_size(10)
///     .memory_ordering(MemoryOrdering::Sequential)
///     .build();
///
/// assert_eq!(limiter.interval(), Duration::from_secs(1));
///
/// // Or use try_build() for error handling
/// let result = RateLimiterBuilder::new()
///     .interval(Duration::MAX)  // Invalid!
///     .try_build();
///
/// assert!(result.is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateLimiterBuilder {
    config: RateLimiterConfig,
}

impl RateLimiterBuilder {
    /// Creates a new builder with default configuration.
    ///
    /// Default configuration:
    /// - no limit ([`NO_LIMIT`])
    /// - unbounded queue
    /// - AcquireRelease memory ordering
    pub fn new() -> Self {
        Self {
            config: RateLimiterConfig::default(),
        }
    }

    /// Sets the minimum spacing between admissions.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    /// Sets the spacing from a "`count` requests per `period`" rate.
    pub fn per_duration(mut self, count: u32, period: Duration) -> Self {
        self.config.interval = per_duration(count, period);
        self
    }

    /// Sets the maximum number of callers that may wait at once.
    ///
    /// When the ceiling is reached, [`RateLimiter::wait`] returns
    /// [`RateLimitError::QueueFull`]. Zero means unbounded.
    pub fn max_queue_size(mut self, max_queue: u32) -> Self {
        self.config.max_queue = max_queue;
        self
    }

    /// Sets the memory ordering strategy for atomic operations.
    pub fn memory_ordering(mut self, ordering: MemoryOrdering) -> Self {
        self.config.ordering = ordering;
        self
    }

    /// Builds the rate limiter with the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid. Use `try_build()` if you want
    /// to handle errors.
    pub fn build(self) -> RateLimiter {
        RateLimiter::with_config(self.config)
    }

    /// Attempts to build the rate limiter, returning an error if invalid.
    ///
    /// # Errors
    ///
    /// [`RateLimitError::InvalidConfig`] if the configuration is invalid.
    pub fn try_build(self) -> Result<RateLimiter> {
        self.config.validate()?;
        Ok(RateLimiter::with_config(self.config))
    }
}
