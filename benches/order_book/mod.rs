pub mod update_orders;

use fx_matching_engine::{OrderBook, Side, Symbol};

// Import common benchmarks into the main bench group
pub fn register_benchmarks(c: &mut criterion::Criterion) {
    add_orders::register_benchmarks(c);
    match_orders::register_benchmarks(c);
    update_orders::register_benchmarks(c);
}

/// A book with `levels` ask levels above 1.23450 and `levels` bid levels
/// below it, `orders_per_level` orders of 10 each. Ids start at 1.
pub fn setup_two_sided_book(levels: i64, orders_per_level: u64) -> OrderBook {
    let book = OrderBook::new(Symbol::EurUsd);
    let mut id = 1;
    for level in 0..levels {
        for _ in 0..orders_per_level {
            book.add_limit_order(id, Side::Sell, 123_451 + level, 10, 1);
            book.add_limit_order(id + 1, Side::Buy, 123_449 - level, 10, 2);
            id += 2;
        }
    }
    book
}
