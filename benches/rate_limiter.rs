//! # Rate Limiter Benchmarks
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pacer::{MemoryOrdering, RateLimiter, RateLimiterConfig, NO_LIMIT};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

/// Unlimited fast path: no gate, no lock
fn bench_no_limit(c: &mut Criterion) {
    let limiter = RateLimiter::new(NO_LIMIT);
    c.bench_function("wait_no_limit", |b| {
        b.iter(|| std::hint::black_box(limiter.wait()))
    });
}

/// One nanosecond interval, with and without a queue ceiling
fn bench_queue_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("wait_1ns_interval");
    group.throughput(Throughput::Elements(1));

    let configs = [
        ("no_queue_limit", RateLimiterConfig::new(Duration::from_nanos(1))),
        (
            "with_queue_limit",
            RateLimiterConfig::new(Duration::from_nanos(1)).with_max_queue_size(u32::MAX),
        ),
    ];

    for (name, config) in configs {
        let limiter = RateLimiter::with_config(config);
        group.bench_function(name, |b| b.iter(|| std::hint::black_box(limiter.wait())));
    }

    group.finish();
}

/// Queue counter cost under each memory ordering
fn bench_memory_orderings(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_orderings");

    let orderings = [
        ("Relaxed", MemoryOrdering::Relaxed),
        ("AcquireRelease", MemoryOrdering::AcquireRelease),
        ("Sequential", MemoryOrdering::Sequential),
    ];

    for (name, ordering) in orderings {
        let limiter = RateLimiter::with_config(
            RateLimiterConfig::new(Duration::from_nanos(1))
                .with_max_queue_size(65_536)
                .with_ordering(ordering),
        );
        group.bench_function(name, |b| b.iter(|| std::hint::black_box(limiter.wait())));
    }

    group.finish();
}

/// Many threads contending for the clock
fn bench_concurrent_wait(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_wait");
    group.sample_size(20);

    for num_threads in [2, 4, 8, 16] {
        group.throughput(Throughput::Elements(num_threads as u64 * 100));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_threads", num_threads)),
            &num_threads,
            |b, &num_threads| {
                let limiter = Arc::new(RateLimiter::with_config(
                    RateLimiterConfig::new(Duration::from_nanos(1)).with_max_queue_size(65_536),
                ));

                b.iter_custom(|iters| {
                    let mut total_duration = Duration::ZERO;

                    for _ in 0..iters {
                        let barrier = Arc::new(Barrier::new(num_threads + 1));
                        let handles: Vec<_> = (0..num_threads)
                            .map(|_| {
                                let limiter = limiter.clone();
                                let barrier = barrier.clone();
                                thread::spawn(move || {
                                    barrier.wait();
                                    for _ in 0..100 {
                                        let _ = limiter.wait();
                                    }
                                })
                            })
                            .collect();

                        barrier.wait();
                        let start = Instant::now();
                        for handle in handles {
                            handle.join().unwrap();
                        }
                        total_duration += start.elapsed();
                    }

                    total_duration
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_no_limit,
    bench_queue_modes,
    bench_memory_orderings,
    bench_concurrent_wait
);
criterion_main!(benches);
