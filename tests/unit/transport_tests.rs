//! The engine over caller-supplied message channels.

#[cfg(test)]
mod transport_tests {
    use fx_matching_engine::codec::decode_snapshot;
    use fx_matching_engine::{
        EngineConfig, EngineError, IpcChannel, MatchingEngine, MessageChannel, OfferError, Side,
        Symbol,
    };
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Unbounded channel that remembers everything offered to it
    #[derive(Default)]
    struct RecordingChannel {
        queue: Mutex<VecDeque<Vec<u8>>>,
        offered: Mutex<Vec<Vec<u8>>>,
    }

    impl MessageChannel for RecordingChannel {
        fn offer(&self, message: &[u8]) -> Result<(), OfferError> {
            self.offered.lock().push(message.to_vec());
            self.queue.lock().push_back(message.to_vec());
            Ok(())
        }

        fn poll(&self, handler: &mut dyn FnMut(&[u8]), fragment_limit: usize) -> usize {
            let mut delivered = 0;
            while delivered < fragment_limit {
                let Some(message) = self.queue.lock().pop_front() else {
                    break;
                };
                handler(&message);
                delivered += 1;
            }
            delivered
        }
    }

    #[test]
    fn test_engine_runs_over_custom_channels() {
        let inbound = Arc::new(RecordingChannel::default());
        let outbound = Arc::new(RecordingChannel::default());
        let engine = MatchingEngine::new(
            EngineConfig::default(),
            inbound.clone(),
            outbound.clone(),
        )
        .unwrap();

        engine
            .submit_order(Symbol::GbpUsd, Side::Buy, 127_000, 25, 3)
            .unwrap();
        assert_eq!(inbound.offered.lock().len(), 1);
        assert_eq!(inbound.offered.lock()[0].len(), 29);

        assert_eq!(engine.poll_inbound().unwrap(), 1);
        assert_eq!(engine.publish_sweep(), 1);

        let published = outbound.offered.lock();
        assert_eq!(published.len(), 1);
        let snapshot = decode_snapshot(&published[0]).unwrap();
        assert_eq!(snapshot.symbol, Symbol::GbpUsd);
        assert_eq!(snapshot.best_bid(), Some((127_000, 25)));
    }

    #[test]
    fn test_submit_to_closed_channel_fails() {
        let inbound = Arc::new(IpcChannel::new(4, 64));
        inbound.close();
        let engine = MatchingEngine::new(
            EngineConfig::default(),
            inbound,
            Arc::new(IpcChannel::new(4, 256)),
        )
        .unwrap();

        let result = engine.submit_cancel(Symbol::EurUsd, 1);
        assert!(matches!(
            result,
            Err(EngineError::Offer(OfferError::Closed))
        ));
    }

    #[test]
    fn test_publish_to_closed_channel_drops_snapshot() {
        let outbound = Arc::new(IpcChannel::new(4, 256));
        outbound.close();
        let engine = MatchingEngine::new(
            EngineConfig::default(),
            Arc::new(IpcChannel::new(16, 64)),
            outbound,
        )
        .unwrap();
        engine
            .submit_order(Symbol::EurUsd, Side::Sell, 123_460, 10, 1)
            .unwrap();
        engine.poll_inbound().unwrap();

        assert_eq!(engine.publish_sweep(), 0);
    }

    #[test]
    fn test_full_outbound_does_not_block_stopped_engine() {
        let outbound = Arc::new(IpcChannel::new(1, 256));
        let engine = MatchingEngine::new(
            EngineConfig::default(),
            Arc::new(IpcChannel::new(16, 64)),
            outbound.clone(),
        )
        .unwrap();
        engine
            .submit_order(Symbol::EurUsd, Side::Buy, 123_440, 10, 1)
            .unwrap();
        engine
            .submit_order(Symbol::UsdJpy, Side::Buy, 15_000_000, 10, 1)
            .unwrap();
        engine.poll_inbound().unwrap();

        // The second snapshot finds the channel full and the engine stopped
        assert_eq!(engine.publish_sweep(), 1);
        assert_eq!(outbound.len(), 1);
    }
}
