use super::setup_two_sided_book;
use criterion::{BatchSize, Criterion};
use std::hint::black_box;

/// Register all benchmarks for cancelling and modifying resting orders
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("OrderBook - Update Orders");

    group.bench_function("cancel_orders", |b| {
        b.iter_batched(
            || setup_two_sided_book(10, 10),
            |book| {
                for id in (1..=200u64).step_by(3) {
                    black_box(book.cancel_order(id));
                }
            },
            BatchSize::SmallInput,
        )
    });

    // Quantity-only modify keeps queue position
    group.bench_function("amend_quantity", |b| {
        b.iter_batched(
            || setup_two_sided_book(10, 10),
            |book| {
                for id in 1..=100u64 {
                    if let Some(order) = book.get_order(id) {
                        black_box(book.modify_order(id, order.price(), 5));
                    }
                }
            },
            BatchSize::SmallInput,
        )
    });

    // Price change re-enters the order away from the touch
    group.bench_function("replace_price", |b| {
        b.iter_batched(
            || setup_two_sided_book(10, 10),
            |book| {
                for id in 1..=100u64 {
                    if let Some(order) = book.get_order(id) {
                        let away = if id % 2 == 1 { 20 } else { -20 };
                        black_box(book.modify_order(id, order.price() + away, 10));
                    }
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}
