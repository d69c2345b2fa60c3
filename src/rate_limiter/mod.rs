//! # Rate Limiter Module
//!
//! Internal implementation of the interval limiter.
//!
//! ## Module Structure
//!
//! ```text
//!     rate_limiter/
//!     ├── mod.rs          (You are here - Module organization)
//!     ├── config.rs       (Configuration and the per-duration helper)
//!     ├── core.rs         (RateLimiter: gate + clock composition)
//!     ├── clock.rs        (Mutex-guarded admission timeline)
//!     ├── gate.rs         (Lock-free wait-queue counter)
//!     ├── error.rs        (Error types)
//!     ├── metrics.rs      (Performance monitoring)
//!     └── utils.rs        (Spin hints and cache padding)
//! ```
//!
//! ## Architecture Flow
//!
//! ```text
//!     Caller
//!       │
//!       ▼
//!     ┌─────────┐
//!     │  Gate   │ ◄── Lock-free, may reject at once (queue full)
//!     └────┬────┘
//!          │
//!          ▼
//!     ┌─────────┐
//!     │  Clock  │ ◄── One caller at a time, sleeps until its slot
//!     └────┬────┘
//!          │
//!          ▼
//!       Admitted
//! ```

mod clock;
mod config;
mod core;
mod error;
mod gate;
mod metrics;
mod utils;

/// Configuration types and the per-duration helper
pub use config::{per_duration, MemoryOrdering, RateLimiterConfig, NO_LIMIT};

/// The blocking interval rate limiter
pub use self::core::RateLimiter;

/// Error types
pub use error::{RateLimitError, Result};

/// Metrics and health monitoring for observability
pub use metrics::{HealthStatus, RateLimiterMetrics};

/// Low-level helpers
pub use utils::{cpu_relax, CACHE_LINE_SIZE};
