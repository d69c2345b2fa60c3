//! Error types returned by the rate limiter.
//!
//! Admission has exactly one failure mode: the wait queue is full. Everything
//! past the queue gate (taking the clock lock, sleeping, advancing the clock)
//! cannot fail. Configuration validation has its own variant so builders can
//! report bad settings without panicking.

/// Errors produced by [`RateLimiter`](crate::RateLimiter) and its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    /// The configured maximum number of waiting callers was already reached.
    ///
    /// The limiter never retries on its own; the caller decides whether to
    /// drop, retry or propagate the unit of work.
    #[error("ratelimiter: queue is full")]
    QueueFull,

    /// The configuration cannot be used to build a limiter.
    #[error("ratelimiter: invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl RateLimitError {
    /// Returns true if this is the queue-full rejection.
    #[inline]
    pub fn is_queue_full(&self) -> bool {
        matches!(self, Self::QueueFull)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RateLimitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_full_display() {
        assert_eq!(RateLimitError::QueueFull.to_string(), "ratelimiter: queue is full");
        assert!(RateLimitError::QueueFull.is_queue_full());
    }

    #[test]
    fn test_invalid_config_display() {
        let err = RateLimitError::InvalidConfig("interval is too large");
        assert!(err.to_string().contains("interval is too large"));
        assert!(!err.is_queue_full());
    }

    #[test]
    fn test_is_std_error() {
        let err: Box<dyn std::error::Error + Send + Sync> = Box::new(RateLimitError::QueueFull);
        assert_eq!(err.to_string(), "ratelimiter: queue is full");
    }
}
