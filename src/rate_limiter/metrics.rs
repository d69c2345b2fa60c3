//! Performance monitoring and health analysis for rate limiters.
//!
//! ```text
//!     Metrics Dashboard:
//!     ┌─────────────────────────────────────┐
//!     │  Success Rate: 96%                  │
//!     │  Queue: 3/4 waiting                 │
//!     │  Avg Wait: 9.8ms   Max Wait: 31ms   │
//!     │  Health: ⚠️ Degraded                │
//!     └─────────────────────────────────────┘
//! ```

use std::fmt;
use std::time::Duration;

/// Snapshot of a rate limiter's counters.
///
/// Counters are read one by one without a common lock, so under concurrent
/// use the fields may be a few operations apart from each other.
///
/// ## Example Usage
///
/// ```rust
/// use pacer::RateLimiter;
/// use std::time::Duration;
///
/// let limiter = RateLimiter::new(Duration::from_millis(1));
/// limiter.wait().unwrap();
///
/// let metrics = limiter.metrics();
/// if metrics.health_status().is_unhealthy() {
///     println!("{}", metrics.summary());
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimiterMetrics {
    /// Calls admitted through the clock. An unlimited limiter never counts.
    pub total_admitted: u64,

    /// Calls rejected because the queue was full.
    pub total_rejected: u64,

    /// Admitted calls that had to sleep for their slot.
    pub total_delayed: u64,

    /// Sum of all sleeps performed inside the clock, in nanoseconds.
    pub total_wait_ns: u64,

    /// Longest single sleep performed inside the clock, in nanoseconds.
    pub max_wait_ns: u64,

    /// Callers waiting for a turn at the clock when the snapshot was taken.
    pub queued: u32,

    /// Configured queue ceiling, 0 if unbounded.
    pub max_queue: u32,

    /// Configured spacing between admissions.
    pub interval: Duration,
}

impl RateLimiterMetrics {
    /// Total number of `wait` calls (admitted + rejected).
    #[inline]
    pub fn total_requests(&self) -> u64 {
        self.total_admitted + self.total_rejected
    }

    /// Fraction of calls that were admitted, 1.0 if there were none.
    #[inline]
    pub fn success_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            1.0
        } else {
            self.total_admitted as f64 / total as f64
        }
    }

    /// Fraction of calls rejected with queue-full.
    #[inline]
    pub fn rejection_rate(&self) -> f64 {
        1.0 - self.success_rate()
    }

    /// How full the wait queue is, from 0.0 to 1.0. Always 0.0 when unbounded.
    #[inline]
    pub fn queue_utilization(&self) -> f64 {
        if self.max_queue == 0 {
            0.0
        } else {
            self.queued as f64 / self.max_queue as f64
        }
    }

    /// True if the queue is bounded and currently at its ceiling.
    #[inline]
    pub fn is_queue_full(&self) -> bool {
        self.max_queue > 0 && self.queued >= self.max_queue
    }

    /// Longest sleep a caller spent waiting for its slot.
    #[inline]
    pub fn max_wait(&self) -> Duration {
        Duration::from_nanos(self.max_wait_ns)
    }

    /// Mean sleep over all admitted calls (immediate admissions count as zero).
    pub fn average_wait(&self) -> Duration {
        if self.total_admitted == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.total_wait_ns / self.total_admitted)
        }
    }

    /// Determines the health status of the rate limiter.
    ///
    /// - **Critical**: more than 30% of calls are being rejected
    /// - **Degraded**: the queue is at its ceiling, or some calls were rejected
    /// - **Healthy**: otherwise
    pub fn health_status(&self) -> HealthStatus {
        let rejection_rate = self.rejection_rate();
        if rejection_rate > 0.3 {
            HealthStatus::Critical
        } else if self.is_queue_full() || self.total_rejected > 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }

    /// Generates a human-readable summary of the metrics.
    ///
    /// # Example Output
    ///
    /// ```text
    /// RateLimiter Metrics:
    /// ├─ Schedule:
    /// │  ├─ Interval: 10ms
    /// │  ├─ Average Wait: 4.2ms
    /// │  └─ Max Wait: 9.9ms
    /// ├─ Queue:
    /// │  ├─ Waiting: 1/4
    /// │  └─ Utilization: 25.00%
    /// ├─ Counters:
    /// │  ├─ Total Admitted: 120
    /// │  ├─ Total Delayed: 118
    /// │  └─ Total Rejected: 3
    /// └─ Health:
    ///    ├─ Status: Degraded
    ///    └─ Success Rate: 97.56%
    /// ```
    pub fn summary(&self) -> String {
        let max_queue = if self.max_queue == 0 {
            "unbounded".to_string()
        } else {
            self.max_queue.to_string()
        };

        format!(
            "RateLimiter Metrics:\n\
             ├─ Schedule:\n\
             │  ├─ Interval: {:?}\n\
             │  ├─ Average Wait: {:?}\n\
             │  └─ Max Wait: {:?}\n\
             ├─ Queue:\n\
             │  ├─ Waiting: {}/{}\n\
             │  └─ Utilization: {:.2}%\n\
             ├─ Counters:\n\
             │  ├─ Total Admitted: {}\n\
             │  ├─ Total Delayed: {}\n\
             │  └─ Total Rejected: {}\n\
             └─ Health:\n\
                ├─ Status: {:?}\n\
                └─ Success Rate: {:.2}%",
            self.interval,
            self.average_wait(),
            self.max_wait(),
            self.queued,
            max_queue,
            self.queue_utilization() * 100.0,
            self.total_admitted,
            self.total_delayed,
            self.total_rejected,
            self.health_status(),
            self.success_rate() * 100.0,
        )
    }
}

impl fmt::Display for RateLimiterMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// Health status indicator for the rate limiter.
///
/// ```text
///     Healthy ──────► Every caller found room in the queue
///        │
///     Degraded ─────► Queue at its ceiling or occasional rejections
///        │
///     Critical ─────► A large share of callers is being turned away
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// No rejections and room left in the queue.
    Healthy,

    /// Some pressure: the queue is full or a few callers were rejected.
    Degraded,

    /// More than 30% of callers are rejected.
    Critical,
}

impl HealthStatus {
    /// Returns true if the status indicates any problems.
    pub fn is_unhealthy(&self) -> bool {
        !matches!(self, Self::Healthy)
    }

    /// Returns a suggested action based on the health status.
    pub fn suggested_action(&self) -> &'static str {
        match self {
            Self::Healthy => "No action needed",
            Self::Degraded => "Monitor closely, consider a larger queue or fewer callers",
            Self::Critical => "Immediate action required: reduce load or raise the rate",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "✅ Healthy"),
            Self::Degraded => write!(f, "⚠️ Degraded"),
            Self::Critical => write!(f, "🔴 Critical"),
        }
    }
}
