//! Randomised command sequences checked against the book invariants.

#[cfg(test)]
mod property_tests {
    use fx_matching_engine::{ModifyOutcome, OrderBook, Side, Symbol};
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[derive(Debug, Clone)]
    enum Op {
        Add {
            side: Side,
            price: i64,
            quantity: u32,
        },
        Cancel {
            order_id: u64,
        },
        Modify {
            order_id: u64,
            new_price: i64,
            new_quantity: u32,
        },
    }

    fn any_side() -> impl Strategy<Value = Side> {
        prop_oneof![Just(Side::Buy), Just(Side::Sell)]
    }

    fn any_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (any_side(), 123_400i64..123_500i64, 1u32..500u32)
                .prop_map(|(side, price, quantity)| Op::Add { side, price, quantity }),
            1 => (1u64..400u64).prop_map(|order_id| Op::Cancel { order_id }),
            1 => (1u64..400u64, 123_400i64..123_500i64, 0u32..500u32).prop_map(
                |(order_id, new_price, new_quantity)| Op::Modify {
                    order_id,
                    new_price,
                    new_quantity
                }
            ),
        ]
    }

    fn assert_invariants(book: &OrderBook) {
        let mut seen = HashSet::new();

        for side in [Side::Buy, Side::Sell] {
            for price in book.level_prices(side) {
                let level = book.get_level(price, side).unwrap();
                let orders = level.iter_orders();

                assert!(!orders.is_empty(), "empty level at {price}");
                assert_eq!(level.order_count(), orders.len());
                let sum: u64 = orders
                    .iter()
                    .map(|o| u64::from(o.remaining_quantity()))
                    .sum();
                assert_eq!(level.total_quantity(), sum, "aggregate drift at {price}");

                for order in orders {
                    assert!(order.remaining_quantity() > 0);
                    assert_eq!(order.price(), price);
                    assert_eq!(order.side(), side);
                    let indexed = book.get_order(order.id()).unwrap();
                    assert_eq!(indexed.price(), price);
                    assert!(seen.insert(order.id()), "order {} rests twice", order.id());
                }
            }
        }

        assert_eq!(book.order_count(), seen.len());
        if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
            assert!(bid < ask, "crossed book: bid {bid} ask {ask}");
        }
        assert_eq!(book.best_bid(), book.level_prices(Side::Buy).first().copied());
        assert_eq!(book.best_ask(), book.level_prices(Side::Sell).first().copied());
    }

    proptest! {
        #[test]
        fn book_invariants_hold(ops in prop::collection::vec(any_op(), 1..400)) {
            let book = OrderBook::new(Symbol::EurUsd);
            let mut next_id = 1u64;
            let mut submitted = 0u64;
            let mut executed = 0u64;

            for op in ops {
                match op {
                    Op::Add { side, price, quantity } => {
                        let outcome = book.add_limit_order(next_id, side, price, quantity, next_id);
                        next_id += 1;
                        let traded: u32 = outcome.trades.iter().map(|t| t.quantity).sum();
                        prop_assert_eq!(traded, outcome.executed_quantity);
                        prop_assert_eq!(outcome.executed_quantity + outcome.remaining_quantity, quantity);
                        submitted += u64::from(quantity);
                        executed += 2 * u64::from(traded);
                    }
                    Op::Cancel { order_id } => {
                        if let Some(order) = book.cancel_order(order_id) {
                            submitted -= u64::from(order.remaining_quantity());
                        }
                    }
                    Op::Modify { order_id, new_price, new_quantity } => {
                        let before = book.get_order(order_id).map(|o| o.remaining_quantity());
                        match (before, book.modify_order(order_id, new_price, new_quantity)) {
                            (Some(previous), Some(ModifyOutcome::Amended { new_quantity, .. })) => {
                                submitted = submitted - u64::from(previous) + u64::from(new_quantity);
                            }
                            (Some(previous), Some(ModifyOutcome::Cancelled)) => {
                                submitted -= u64::from(previous);
                            }
                            (Some(previous), Some(ModifyOutcome::Replaced(outcome))) => {
                                submitted = submitted - u64::from(previous) + u64::from(new_quantity);
                                executed += 2 * u64::from(outcome.executed_quantity);
                            }
                            (_, Some(ModifyOutcome::Rejected)) | (None, None) => {}
                            (before, after) => {
                                prop_assert!(false, "unexpected modify result {:?} -> {:?}", before, after);
                            }
                        }
                    }
                }
                assert_invariants(&book);
            }

            // Everything submitted either rests or has traded
            let resting = book.total_quantity(Side::Buy) + book.total_quantity(Side::Sell);
            prop_assert_eq!(resting + executed, submitted);
        }
    }
}
