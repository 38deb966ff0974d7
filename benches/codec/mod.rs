use criterion::Criterion;
use fx_matching_engine::codec::{
    MAX_SNAPSHOT_SIZE, SNAPSHOT_BUFFER_CAPACITY, decode_snapshot, encode_snapshot,
};
use fx_matching_engine::{LevelSummary, MarketDataSnapshot, OrderCommand, Side, Symbol};
use std::hint::black_box;

/// Register benchmarks for the binary protocol
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Codec");

    let new_order = OrderCommand::NewOrder {
        symbol: Symbol::EurUsd,
        side: Side::Buy,
        price: 123_450,
        quantity: 100,
        user_id: 1001,
    };
    let bytes = new_order.to_bytes();

    group.bench_function("encode_new_order", |b| {
        let mut buffer = [0u8; 32];
        b.iter(|| black_box(new_order.encode(&mut buffer)))
    });

    group.bench_function("decode_new_order", |b| {
        b.iter(|| black_box(OrderCommand::decode(black_box(&bytes))))
    });

    let mut snapshot = MarketDataSnapshot::new(Symbol::EurUsd, 1);
    for i in 0..5 {
        snapshot.bids.push(LevelSummary {
            price: 123_449 - i,
            total_quantity: 1_000,
            order_count: 4,
        });
        snapshot.asks.push(LevelSummary {
            price: 123_451 + i,
            total_quantity: 1_000,
            order_count: 4,
        });
    }

    group.bench_function("encode_full_snapshot", |b| {
        let mut buffer = vec![0u8; SNAPSHOT_BUFFER_CAPACITY];
        b.iter(|| black_box(encode_snapshot(&snapshot, &mut buffer)))
    });

    let mut encoded = [0u8; MAX_SNAPSHOT_SIZE];
    let _ = encode_snapshot(&snapshot, &mut encoded);
    group.bench_function("decode_full_snapshot", |b| {
        b.iter(|| black_box(decode_snapshot(black_box(&encoded))))
    });

    group.finish();
}
