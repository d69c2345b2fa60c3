//! Bounded queue example for the pacer crate.
//!
//! Run with: `cargo run --example queue_limit`

use pacer::{per_duration, RateLimiter, RateLimiterBuilder};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Interval Rate Limiter Example ===\n");

    steady_rate_example();

    println!("{}", "\n".to_owned() + "=".repeat(50).as_str() + "\n");

    bounded_queue_example();
}

fn steady_rate_example() {
    println!("1. 100 requests per second:");

    let limiter = RateLimiter::new(per_duration(100, Duration::from_secs(1)));

    let start = Instant::now();
    let mut succeeded = 0;
    let mut failed = 0;

    for _ in 0..100 {
        match limiter.wait() {
            Ok(()) => succeeded += 1,
            // The queue is not bounded, so this never happens
            Err(_) => failed += 1,
        }
    }

    println!("   Elapsed: {:?} (expected >= 990ms)", start.elapsed());
    println!("   Results: {} admitted, {} rejected", succeeded, failed);
}

fn bounded_queue_example() {
    println!("2. One request per second, one caller may wait:");

    let limiter = Arc::new(
        RateLimiterBuilder::new()
            .interval(Duration::from_secs(1))
            .max_queue_size(1)
            .build(),
    );

    // First call is admitted immediately
    let _ = limiter.wait();

    let start = Instant::now();
    let handles: Vec<_> = (0..5)
        .map(|i| {
            let limiter = limiter.clone();
            let handle = thread::spawn(move || match limiter.wait() {
                Ok(()) => println!("   {} ✅ admitted after {:?}", i, start.elapsed()),
                Err(err) => println!("   {} ❌ {}", i, err),
            });
            // Make sure callers reach the gate in order
            thread::sleep(Duration::from_millis(10));
            handle
        })
        .collect();

    for handle in handles {
        let _ = handle.join();
    }

    println!("\n{}", limiter.metrics());
}
