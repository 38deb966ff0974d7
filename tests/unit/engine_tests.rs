//! Engine tests driving the matching path synchronously through encoded
//! commands, the way the matching thread would.

#[cfg(test)]
mod engine_tests {
    use fx_matching_engine::codec::decode_snapshot;
    use fx_matching_engine::{
        DecodeError, EngineConfig, EngineError, MatchingEngine, OrderCommand, Side, Symbol,
    };

    fn setup_engine() -> MatchingEngine {
        let config = EngineConfig {
            inbound_capacity: 64,
            outbound_capacity: 64,
            ..EngineConfig::default()
        };
        MatchingEngine::with_ipc(config).unwrap()
    }

    fn new_order(symbol: Symbol, side: Side, price: i64, quantity: u32, user_id: u64) -> Vec<u8> {
        OrderCommand::NewOrder {
            symbol,
            side,
            price,
            quantity,
            user_id,
        }
        .to_bytes()
    }

    #[test]
    fn test_new_orders_are_assigned_increasing_ids() {
        let engine = setup_engine();
        engine
            .process_message(&new_order(Symbol::EurUsd, Side::Buy, 123450, 100, 1001))
            .unwrap();
        engine
            .process_message(&new_order(Symbol::EurUsd, Side::Buy, 123440, 50, 1002))
            .unwrap();

        let acks = engine.drain_acks();
        assert_eq!(acks.len(), 2);
        assert_eq!(acks[0].order_id, 1);
        assert_eq!(acks[0].user_id, 1001);
        assert_eq!(acks[0].symbol, Symbol::EurUsd);
        assert_eq!(acks[0].price, 123450);
        assert_eq!(acks[1].order_id, 2);
        assert!(engine.drain_acks().is_empty());

        let book = engine.order_book(Symbol::EurUsd).unwrap();
        assert_eq!(book.get_order(1).unwrap().user_id(), 1001);
        assert_eq!(book.best_bid(), Some(123450));
        assert_eq!(engine.counter().processed_count(), 2);
    }

    #[test]
    fn test_cross_produces_trades_at_maker_price() {
        let engine = setup_engine();
        engine
            .process_message(&new_order(Symbol::EurUsd, Side::Buy, 123440, 100, 1))
            .unwrap();
        engine
            .process_message(&new_order(Symbol::EurUsd, Side::Sell, 123400, 50, 2))
            .unwrap();

        let trades = engine.drain_trades();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, 123440);
        assert_eq!(trades[0].quantity, 50);
        assert_eq!(trades[0].maker_order_id, 1);
        assert_eq!(trades[0].taker_order_id, 2);
        assert_eq!(trades[0].buy_user_id, 1);
        assert_eq!(trades[0].sell_user_id, 2);

        let book = engine.order_book(Symbol::EurUsd).unwrap();
        assert_eq!(book.get_order(1).unwrap().remaining_quantity(), 50);
        assert_eq!(book.best_ask(), None);
    }

    #[test]
    fn test_books_are_isolated_per_symbol() {
        let engine = setup_engine();
        engine
            .process_message(&new_order(Symbol::EurUsd, Side::Buy, 100, 10, 1))
            .unwrap();
        engine
            .process_message(&new_order(Symbol::GbpUsd, Side::Sell, 100, 10, 2))
            .unwrap();

        assert!(engine.drain_trades().is_empty());
        assert_eq!(engine.registry().len(), 2);
        assert!(engine.order_book(Symbol::UsdJpy).is_none());
    }

    #[test]
    fn test_cancel_and_modify_commands() {
        let engine = setup_engine();
        engine
            .process_message(&new_order(Symbol::UsdJpy, Side::Sell, 15_000_000, 40, 5))
            .unwrap();
        engine
            .process_message(&new_order(Symbol::UsdJpy, Side::Sell, 15_000_100, 40, 5))
            .unwrap();

        let modify = OrderCommand::ModifyOrder {
            symbol: Symbol::UsdJpy,
            order_id: 2,
            new_price: 15_000_100,
            new_quantity: 10,
        };
        engine.process_message(&modify.to_bytes()).unwrap();

        let cancel = OrderCommand::CancelOrder {
            symbol: Symbol::UsdJpy,
            order_id: 1,
        };
        engine.process_message(&cancel.to_bytes()).unwrap();
        // Cancelling again is a harmless no-op
        engine.process_message(&cancel.to_bytes()).unwrap();

        let book = engine.order_book(Symbol::UsdJpy).unwrap();
        assert!(book.get_order(1).is_none());
        assert_eq!(book.get_order(2).unwrap().remaining_quantity(), 10);
        assert_eq!(book.best_ask(), Some(15_000_100));
        // Only NEW_ORDER commands count as processed
        assert_eq!(engine.counter().processed_count(), 2);
    }

    #[test]
    fn test_malformed_messages_leave_state_untouched() {
        let engine = setup_engine();

        assert!(matches!(
            engine.process_message(&[1, 0, 0]),
            Err(EngineError::Decode(DecodeError::BufferTooSmall { .. }))
        ));

        let mut bad_side = new_order(Symbol::EurUsd, Side::Buy, 100, 10, 1);
        bad_side[8] = 7;
        assert!(matches!(
            engine.process_message(&bad_side),
            Err(EngineError::Decode(DecodeError::InvalidSide(7)))
        ));

        let mut negative = new_order(Symbol::EurUsd, Side::Buy, 100, 10, 1);
        negative[17..21].copy_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(
            engine.process_message(&negative),
            Err(EngineError::Decode(DecodeError::InvalidQuantity(u32::MAX)))
        ));

        assert!(engine.registry().is_empty());
        assert!(engine.drain_acks().is_empty());
        assert_eq!(engine.counter().processed_count(), 0);
    }

    #[test]
    fn test_poll_inbound_skips_bad_messages() {
        let engine = setup_engine();
        let inbound = engine.inbound();
        inbound
            .offer(&new_order(Symbol::EurUsd, Side::Buy, 100, 10, 1))
            .unwrap();
        inbound.offer(&[0xFF; 12]).unwrap();
        inbound
            .offer(&new_order(Symbol::EurUsd, Side::Sell, 100, 4, 2))
            .unwrap();

        assert_eq!(engine.poll_inbound().unwrap(), 3);
        assert_eq!(engine.poll_inbound().unwrap(), 0);

        let trades = engine.drain_trades();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, 4);
    }

    #[test]
    fn test_poll_respects_fragment_limit() {
        let config = EngineConfig {
            poll_fragment_limit: 2,
            ..EngineConfig::default()
        };
        let engine = MatchingEngine::with_ipc(config).unwrap();
        for user in 0..5 {
            engine
                .submit_order(Symbol::EurUsd, Side::Buy, 100, 1, user)
                .unwrap();
        }

        assert_eq!(engine.poll_inbound().unwrap(), 2);
        assert_eq!(engine.poll_inbound().unwrap(), 2);
        assert_eq!(engine.poll_inbound().unwrap(), 1);
        assert_eq!(engine.drain_acks().len(), 5);
    }

    #[test]
    fn test_ack_overflow_is_counted_not_retained() {
        let config = EngineConfig {
            ack_capacity: 3,
            ..EngineConfig::default()
        };
        let engine = MatchingEngine::with_ipc(config).unwrap();
        for user in 0..5 {
            engine
                .process_message(&new_order(Symbol::EurUsd, Side::Buy, 100 + user as i64, 1, user))
                .unwrap();
        }

        let acks = engine.drain_acks();
        let ids: Vec<u64> = acks.iter().map(|ack| ack.order_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(engine.dropped_acks(), 2);

        // Orders are still applied even when their ack is dropped
        let book = engine.order_book(Symbol::EurUsd).unwrap();
        assert_eq!(book.get_order(5).map(|order| order.user_id()), Some(4));
        assert_eq!(engine.counter().processed_count(), 5);

        // Draining frees room again
        engine
            .process_message(&new_order(Symbol::EurUsd, Side::Buy, 90, 1, 9))
            .unwrap();
        assert_eq!(engine.drain_acks().len(), 1);
        assert_eq!(engine.dropped_acks(), 2);
    }

    #[test]
    fn test_zero_ack_capacity_disables_acks() {
        let config = EngineConfig {
            ack_capacity: 0,
            ..EngineConfig::default()
        };
        let engine = MatchingEngine::with_ipc(config).unwrap();
        engine
            .process_message(&new_order(Symbol::EurUsd, Side::Buy, 100, 1, 1))
            .unwrap();

        assert!(engine.drain_acks().is_empty());
        assert_eq!(engine.dropped_acks(), 0);
        assert!(engine.order_book(Symbol::EurUsd).unwrap().get_order(1).is_some());
    }

    #[test]
    fn test_publish_sweep_emits_decodable_snapshots() {
        let engine = setup_engine();
        for (i, price) in [123440, 123430, 123420].iter().enumerate() {
            engine
                .process_message(&new_order(Symbol::EurUsd, Side::Buy, *price, 100, i as u64))
                .unwrap();
        }
        engine
            .process_message(&new_order(Symbol::EurUsd, Side::Sell, 123460, 70, 9))
            .unwrap();
        engine
            .process_message(&new_order(Symbol::GbpUsd, Side::Sell, 127000, 5, 9))
            .unwrap();

        assert_eq!(engine.publish_sweep(), 2);

        let mut snapshots = Vec::new();
        engine.outbound().poll(
            &mut |message| snapshots.push(decode_snapshot(message).unwrap()),
            10,
        );
        assert_eq!(snapshots.len(), 2);

        let eur = snapshots
            .iter()
            .find(|s| s.symbol == Symbol::EurUsd)
            .unwrap();
        let bid_prices: Vec<i64> = eur.bids.iter().map(|l| l.price).collect();
        assert_eq!(bid_prices, vec![123440, 123430, 123420]);
        assert_eq!(eur.best_ask(), Some((123460, 70)));
        assert_eq!(eur.spread(), Some(20));

        let gbp = snapshots
            .iter()
            .find(|s| s.symbol == Symbol::GbpUsd)
            .unwrap();
        assert!(gbp.bids.is_empty());
        assert_eq!(gbp.asks.len(), 1);
    }

    #[test]
    fn test_snapshot_depth_follows_config() {
        let config = EngineConfig {
            snapshot_depth: 2,
            ..EngineConfig::default()
        };
        let engine = MatchingEngine::with_ipc(config).unwrap();
        for i in 0..4 {
            engine
                .process_message(&new_order(Symbol::EurUsd, Side::Sell, 100 + i, 1, 1))
                .unwrap();
        }

        engine.publish_sweep();
        let mut levels = 0;
        engine.outbound().poll(
            &mut |message| levels = decode_snapshot(message).unwrap().asks.len(),
            1,
        );
        assert_eq!(levels, 2);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            poll_fragment_limit: 0,
            ..EngineConfig::default()
        };
        assert!(MatchingEngine::with_ipc(config).is_err());
    }
}
