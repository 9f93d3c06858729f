//! Benchmarks comparing lock strategies on the guarded-increment workload.
//!
//! Two shapes: an uncontended single-thread loop (pure acquire/release
//! overhead) and a contended multi-thread run splitting 100_000 increments
//! across workers. The unguarded atomic baseline shows the cost floor of
//! the workload itself.

#![allow(missing_docs)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use guarded::{Guarded, LockStrategy, MutexLock, QueueLock, RwStrategy, SemaphoreLock, SpinLock};

const TOTAL_INCREMENTS: usize = 100_000;
const WORKERS: usize = 8;

/// One thread, `TOTAL_INCREMENTS` updates, no contention.
fn run_uncontended<L: LockStrategy>(lock: L) -> usize {
    let count = Guarded::with_lock(0_usize, lock);
    for _ in 0..TOTAL_INCREMENTS {
        count.update(|c| *c += 1);
    }
    count.into_inner()
}

/// `WORKERS` threads splitting `TOTAL_INCREMENTS` updates.
fn run_contended<L>(lock: L) -> usize
where
    L: LockStrategy + Send + Sync + 'static,
{
    let count = Arc::new(Guarded::with_lock(0_usize, lock));
    let per_worker = TOTAL_INCREMENTS / WORKERS;

    let mut handles = Vec::new();
    for _ in 0..WORKERS {
        let count = Arc::clone(&count);
        handles.push(thread::spawn(move || {
            for _ in 0..per_worker {
                count.update(|c| *c += 1);
            }
        }));
    }
    for handle in handles {
        handle.join().expect("worker failed");
    }

    count.unsafe_read()
}

fn bench_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");
    group.throughput(Throughput::Elements(TOTAL_INCREMENTS as u64));

    group.bench_function(BenchmarkId::from_parameter("semaphore"), |b| {
        b.iter(|| run_uncontended(SemaphoreLock::new(1)));
    });
    group.bench_function(BenchmarkId::from_parameter("queue"), |b| {
        b.iter(|| run_uncontended(QueueLock::new("bench")));
    });
    group.bench_function(BenchmarkId::from_parameter("rwlock"), |b| {
        b.iter(|| run_uncontended(RwStrategy::new().expect("init failed")));
    });
    group.bench_function(BenchmarkId::from_parameter("mutex"), |b| {
        b.iter(|| run_uncontended(MutexLock::new()));
    });
    group.bench_function(BenchmarkId::from_parameter("spin"), |b| {
        b.iter(|| run_uncontended(SpinLock::new()));
    });

    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");
    group.throughput(Throughput::Elements(TOTAL_INCREMENTS as u64));
    group.sample_size(10);

    group.bench_function(BenchmarkId::from_parameter("baseline-atomic"), |b| {
        b.iter(|| {
            let count = Arc::new(AtomicUsize::new(0));
            let per_worker = TOTAL_INCREMENTS / WORKERS;
            let mut handles = Vec::new();
            for _ in 0..WORKERS {
                let count = Arc::clone(&count);
                handles.push(thread::spawn(move || {
                    for _ in 0..per_worker {
                        count.fetch_add(1, Ordering::Relaxed);
                    }
                }));
            }
            for handle in handles {
                handle.join().expect("worker failed");
            }
            count.load(Ordering::Relaxed)
        });
    });
    group.bench_function(BenchmarkId::from_parameter("semaphore"), |b| {
        b.iter(|| run_contended(SemaphoreLock::new(1)));
    });
    group.bench_function(BenchmarkId::from_parameter("queue"), |b| {
        b.iter(|| run_contended(QueueLock::new("bench")));
    });
    group.bench_function(BenchmarkId::from_parameter("rwlock"), |b| {
        b.iter(|| run_contended(RwStrategy::new().expect("init failed")));
    });
    group.bench_function(BenchmarkId::from_parameter("mutex"), |b| {
        b.iter(|| run_contended(MutexLock::new()));
    });
    group.bench_function(BenchmarkId::from_parameter("spin"), |b| {
        b.iter(|| run_contended(SpinLock::new()));
    });

    group.finish();
}

criterion_group!(benches, bench_uncontended, bench_contended);
criterion_main!(benches);
