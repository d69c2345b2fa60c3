//! # Utility Functions (utils.rs)
//!
//! Low-level helpers for the lock-free parts of the limiter.
//!
//! ```text
//!     x86_64 (Intel/AMD):
//!     ├─ Cache line: 64 bytes
//!     └─ PAUSE instruction for spin loops
//!
//!     AArch64 (ARM):
//!     ├─ Cache line: 128 bytes
//!     └─ YIELD instruction for spin loops
//!
//!     Generic (Fallback):
//!     ├─ Cache line: 64 bytes (assumed)
//!     └─ Standard spin loop hints
//! ```

/// Cache line size assumed for padding hot atomics.
#[cfg(target_arch = "x86_64")]
pub const CACHE_LINE_SIZE: usize = 64;

/// Cache line size assumed for padding hot atomics.
#[cfg(target_arch = "aarch64")]
pub const CACHE_LINE_SIZE: usize = 128;

/// Cache line size assumed for padding hot atomics.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub const CACHE_LINE_SIZE: usize = 64;

/// Hints the CPU that the caller is spinning on a contended atomic.
///
/// Never blocks or yields the thread.
#[inline(always)]
pub fn cpu_relax() {
    std::hint::spin_loop();
}

/// Pads a value out to its own cache line.
///
/// The wait-queue counter is written by every caller while the clock mutex
/// is held by one of them; keeping them on separate lines avoids false sharing.
#[cfg_attr(target_arch = "aarch64", repr(C, align(128)))]
#[cfg_attr(not(target_arch = "aarch64"), repr(C, align(64)))]
pub(crate) struct CacheAligned<T>(T);

impl<T> CacheAligned<T> {
    #[inline(always)]
    pub(crate) const fn new(value: T) -> Self {
        Self(value)
    }

    #[inline(always)]
    pub(crate) fn get(&self) -> &T {
        &self.0
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for CacheAligned<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Exponential spin backoff for compare-and-swap retry loops.
///
/// Spins 1, 2, 4, ... up to `2^max_step` times between attempts. It only
/// ever spins, so a retry loop using it never parks the thread.
#[derive(Debug, Clone)]
pub(crate) struct Backoff {
    step: u32,
    max_step: u32,
}

impl Backoff {
    pub(crate) fn new(max_step: u32) -> Self {
        Self { step: 0, max_step }
    }

    #[inline]
    pub(crate) fn spin(&mut self) {
        for _ in 0..(1u32 << self.step) {
            cpu_relax();
        }
        self.step = (self.step + 1).min(self.max_step);
    }

    #[inline]
    pub(crate) fn is_at_max(&self) -> bool {
        self.step >= self.max_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_line_size() {
        assert!(CACHE_LINE_SIZE >= 32);
        assert!(CACHE_LINE_SIZE <= 256);
        assert!(CACHE_LINE_SIZE.is_power_of_two());
    }

    #[test]
    fn test_cache_aligned() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let aligned = CacheAligned::new(AtomicU32::new(42));
        assert_eq!(aligned.get().load(Ordering::Relaxed), 42);
        assert!(std::mem::align_of::<CacheAligned<AtomicU32>>() >= CACHE_LINE_SIZE);
    }

    #[test]
    fn test_backoff_saturates() {
        let mut backoff = Backoff::new(3);
        assert!(!backoff.is_at_max());

        for _ in 0..10 {
            backoff.spin();
        }
        assert!(backoff.is_at_max());
    }

    #[test]
    fn test_cpu_relax_returns() {
        for _ in 0..1000 {
            cpu_relax();
        }
    }
}
