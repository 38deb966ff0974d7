//! Market data publication.

use super::EngineCore;
use crate::codec::{SNAPSHOT_BUFFER_CAPACITY, encode_snapshot};
use crate::idle::Idler;
use std::sync::atomic::Ordering;
use std::thread;
use tracing::{debug, error, warn};

impl EngineCore {
    /// Encodes and publishes a snapshot of every book assigned to `shard`.
    ///
    /// Books are spread over publishers by symbol ordinal. Returns the number
    /// of snapshots published.
    pub(super) fn publish_sweep(&self, shard: usize, shards: usize, buffer: &mut [u8]) -> usize {
        let shards = shards.max(1);
        let mut published = 0;

        for book in self.registry.all_books() {
            if book.symbol().ordinal() as usize % shards != shard {
                continue;
            }

            let snapshot = book.create_snapshot(self.config.snapshot_depth);
            let size = match encode_snapshot(&snapshot, buffer) {
                Ok(size) => size,
                Err(err) => {
                    error!("Failed to encode snapshot for {}: {}", book.symbol(), err);
                    continue;
                }
            };

            if !self.offer_market_data(&buffer[..size]) {
                break;
            }
            published += 1;
        }
        published
    }

    /// Offers one market data message, retrying while the channel is back
    /// pressured. Gives up once the engine stops or the channel fails.
    fn offer_market_data(&self, message: &[u8]) -> bool {
        let idler = Idler::new(self.config.idle_strategy);
        loop {
            match self.outbound.offer(message) {
                Ok(()) => return true,
                Err(err) if err.is_transient() => {
                    if !self.running.load(Ordering::Acquire) {
                        return false;
                    }
                    idler.idle();
                }
                Err(err) => {
                    warn!("Dropping market data message: {}", err);
                    return false;
                }
            }
        }
    }

    /// Publisher `shard` of `shards`: sweeps only the books whose symbol
    /// ordinal maps to it, so the pool publishes each book once per interval
    pub(super) fn run_publisher_loop(&self, shard: usize, shards: usize) {
        debug!("Publisher {} of {} started", shard, shards);
        let mut buffer = vec![0u8; SNAPSHOT_BUFFER_CAPACITY];
        let interval = self.config.publish_interval();

        while self.running.load(Ordering::Acquire) {
            self.publish_sweep(shard, shards, &mut buffer);
            thread::sleep(interval);
        }
        debug!("Publisher {} stopped", shard);
    }
}
