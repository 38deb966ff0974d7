use crate::order_book::setup_two_sided_book;
use criterion::{BenchmarkId, Criterion};
use fx_matching_engine::Side;
use std::hint::black_box;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

/// Register benchmarks for market data snapshots taken while the book changes
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("OrderBook - Concurrent Publication");

    group.bench_function("snapshot_quiet_book", |b| {
        let book = setup_two_sided_book(20, 5);
        b.iter(|| black_box(book.create_market_data_snapshot()))
    });

    // Publisher threads snapshotting while a single writer churns the touch
    for readers in [1usize, 2, 4].iter() {
        group.bench_with_input(
            BenchmarkId::new("snapshot_under_writer", readers),
            readers,
            |b, &readers| b.iter_custom(|iters| measure_snapshots_under_writer(readers, iters)),
        );
    }

    group.finish();
}

/// Time for `readers` threads to take `iterations` snapshots each while one
/// writer keeps adding and cancelling orders at the best prices
fn measure_snapshots_under_writer(readers: usize, iterations: u64) -> Duration {
    let book = Arc::new(setup_two_sided_book(20, 5));
    let stop = Arc::new(AtomicBool::new(false));
    let barrier = Arc::new(Barrier::new(readers + 2)); // +1 writer, +1 main

    let writer = {
        let book = Arc::clone(&book);
        let stop = Arc::clone(&stop);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            let mut id = 10_000_000u64;
            while !stop.load(Ordering::Relaxed) {
                book.add_limit_order(id, Side::Buy, 123_450, 10, 1);
                book.cancel_order(id);
                id += 1;
            }
        })
    };

    let handles: Vec<_> = (0..readers)
        .map(|_| {
            let book = Arc::clone(&book);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..iterations {
                    black_box(book.create_market_data_snapshot());
                }
            })
        })
        .collect();

    barrier.wait();
    let start = Instant::now();
    for handle in handles {
        let _ = handle.join();
    }
    let elapsed = start.elapsed();

    stop.store(true, Ordering::Relaxed);
    let _ = writer.join();
    elapsed
}
