//! The matching engine: one matching thread applying inbound commands to the
//! order books, and a small pool of publisher threads streaming top-of-book
//! snapshots to the outbound channel.

mod error;
mod ingestion;
mod publisher;

pub use error::EngineError;

use crate::codec::{OrderCommand, SNAPSHOT_BUFFER_CAPACITY};
use crate::config::EngineConfig;
use crate::counter::OrderCounter;
use crate::orderbook::{OrderBook, Side, Trade};
use crate::registry::OrderBookRegistry;
use crate::symbol::Symbol;
use crate::transport::{IpcChannel, MessageChannel, offer_with_retry};
use crossbeam::queue::ArrayQueue;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

/// Price around which warm-up orders are placed (1.23450)
const WARM_UP_BASE_PRICE: i64 = 123_450;
const WARM_UP_QUANTITY: u32 = 100;

/// Acknowledgement that a NEW_ORDER was accepted, carrying the id the engine
/// assigned to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: u64,
    pub user_id: u64,
    pub symbol: Symbol,
    pub side: Side,
    pub price: i64,
    pub quantity: u32,
    /// Monotonic nanoseconds at acceptance
    pub timestamp: u64,
}

/// State shared by the engine handle and its threads
pub(crate) struct EngineCore {
    config: EngineConfig,
    registry: OrderBookRegistry,
    counter: OrderCounter,
    inbound: Arc<dyn MessageChannel>,
    outbound: Arc<dyn MessageChannel>,
    /// Bounded; absent when `ack_capacity` is 0
    acks: Option<ArrayQueue<OrderAck>>,
    dropped_acks: AtomicU64,
    running: AtomicBool,
    /// Held by whichever thread is applying commands to the books
    writer: Mutex<()>,
}

/// An FX matching engine instance.
///
/// The engine owns its books, counter and channel handles; nothing is global.
/// Book state is only ever mutated by the matching thread started by
/// [`start`](Self::start). The synchronous [`process_message`](Self::process_message)
/// and [`poll_inbound`](Self::poll_inbound) entry points drive the same code
/// path and fail with [`EngineError::Running`] while that thread owns the books.
pub struct MatchingEngine {
    core: Arc<EngineCore>,
    threads: Mutex<Vec<JoinHandle<()>>>,
}

impl MatchingEngine {
    /// Creates a stopped engine over the given channels
    pub fn new(
        config: EngineConfig,
        inbound: Arc<dyn MessageChannel>,
        outbound: Arc<dyn MessageChannel>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let counter = OrderCounter::new(config.completion_threshold);
        let acks = (config.ack_capacity > 0).then(|| ArrayQueue::new(config.ack_capacity));

        Ok(Self {
            core: Arc::new(EngineCore {
                config,
                registry: OrderBookRegistry::new(),
                counter,
                inbound,
                outbound,
                acks,
                dropped_acks: AtomicU64::new(0),
                running: AtomicBool::new(false),
                writer: Mutex::new(()),
            }),
            threads: Mutex::new(Vec::new()),
        })
    }

    /// Creates a stopped engine over bounded in-process channels sized from
    /// the configuration
    pub fn with_ipc(config: EngineConfig) -> Result<Self, EngineError> {
        let inbound = Arc::new(IpcChannel::new(
            config.inbound_capacity,
            config.max_message_size,
        ));
        let outbound = Arc::new(IpcChannel::new(
            config.outbound_capacity,
            config.max_message_size,
        ));
        Self::new(config, inbound, outbound)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.core.config
    }

    pub fn registry(&self) -> &OrderBookRegistry {
        &self.core.registry
    }

    pub fn counter(&self) -> &OrderCounter {
        &self.core.counter
    }

    /// The channel order commands are read from
    pub fn inbound(&self) -> Arc<dyn MessageChannel> {
        Arc::clone(&self.core.inbound)
    }

    /// The channel market data snapshots are written to
    pub fn outbound(&self) -> Arc<dyn MessageChannel> {
        Arc::clone(&self.core.outbound)
    }

    /// The book for `symbol`, if any command has referenced it
    pub fn order_book(&self, symbol: Symbol) -> Option<Arc<OrderBook>> {
        self.core.registry.get(symbol)
    }

    pub fn is_running(&self) -> bool {
        self.core.running.load(Ordering::Acquire)
    }

    /// Starts the matching thread and the publisher threads
    pub fn start(&self) -> Result<(), EngineError> {
        if self.core.running.swap(true, Ordering::AcqRel) {
            return Err(EngineError::AlreadyRunning);
        }

        let mut threads = self.threads.lock();
        let publishers = self.core.config.publisher_threads;

        let core = Arc::clone(&self.core);
        let spawned = thread::Builder::new()
            .name("fx-matching".to_string())
            .spawn(move || core.run_matching_loop());
        match spawned {
            Ok(handle) => threads.push(handle),
            Err(err) => {
                self.core.running.store(false, Ordering::Release);
                return Err(err.into());
            }
        }

        for shard in 0..publishers {
            let core = Arc::clone(&self.core);
            let spawned = thread::Builder::new()
                .name(format!("fx-publisher-{shard}"))
                .spawn(move || core.run_publisher_loop(shard, publishers));
            match spawned {
                Ok(handle) => threads.push(handle),
                Err(err) => {
                    drop(threads);
                    self.shutdown();
                    return Err(err.into());
                }
            }
        }

        info!(
            "Matching engine started with {} publisher thread(s)",
            publishers
        );
        Ok(())
    }

    /// Stops and joins every engine thread. Commands already accepted by the
    /// inbound channel are applied before the matching thread exits.
    pub fn shutdown(&self) {
        self.core.running.store(false, Ordering::Release);
        let handles: Vec<JoinHandle<()>> = self.threads.lock().drain(..).collect();
        if handles.is_empty() {
            return;
        }

        for handle in handles {
            let name = handle.thread().name().unwrap_or("engine").to_string();
            if handle.join().is_err() {
                error!("Engine thread {} panicked", name);
            }
        }
        info!("Matching engine stopped");
    }

    /// Encodes a command and offers it to the inbound channel, retrying while
    /// the channel is back pressured
    pub fn submit(&self, command: OrderCommand) -> Result<(), EngineError> {
        let mut buffer = [0u8; 32];
        let size = command.encode(&mut buffer)?;
        offer_with_retry(
            self.core.inbound.as_ref(),
            &buffer[..size],
            self.core.config.idle_strategy,
        )?;
        Ok(())
    }

    /// Submits a NEW_ORDER. The assigned order id is reported through
    /// [`drain_acks`](Self::drain_acks) once the matching thread accepts it.
    pub fn submit_order(
        &self,
        symbol: Symbol,
        side: Side,
        price: i64,
        quantity: u32,
        user_id: u64,
    ) -> Result<(), EngineError> {
        self.submit(OrderCommand::NewOrder {
            symbol,
            side,
            price,
            quantity,
            user_id,
        })
    }

    /// Submits a CANCEL_ORDER
    pub fn submit_cancel(&self, symbol: Symbol, order_id: u64) -> Result<(), EngineError> {
        self.submit(OrderCommand::CancelOrder { symbol, order_id })
    }

    /// Submits a MODIFY_ORDER
    pub fn submit_modify(
        &self,
        symbol: Symbol,
        order_id: u64,
        new_price: i64,
        new_quantity: u32,
    ) -> Result<(), EngineError> {
        self.submit(OrderCommand::ModifyOrder {
            symbol,
            order_id,
            new_price,
            new_quantity,
        })
    }

    /// Primes the engine with `count` alternating buy/sell orders around
    /// 1.23450, waits for the completion signal, then resets the counter.
    ///
    /// Returns whether the signal fired within the configured timeout. The
    /// engine must be running for the orders to be processed.
    pub fn warm_up(&self, count: usize, symbol: Symbol, user_id: u64) -> Result<bool, EngineError> {
        debug!("Warming up with {} orders on {}", count, symbol);
        for i in 0..count {
            let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
            let price = WARM_UP_BASE_PRICE + (i % 20) as i64 - 10;
            self.submit_order(symbol, side, price, WARM_UP_QUANTITY, user_id)?;
        }

        let completed = self
            .core
            .counter
            .wait_for_completion(self.core.config.completion_timeout());
        self.core.counter.reset();
        info!("Warm-up finished (completed: {})", completed);
        Ok(completed)
    }

    /// Applies one encoded command synchronously on the calling thread.
    /// Fails with [`EngineError::Running`] while the matching thread is live.
    pub fn process_message(&self, message: &[u8]) -> Result<(), EngineError> {
        let _writer = self.acquire_writer()?;
        self.core.dispatch(message)?;
        Ok(())
    }

    /// Applies the inbound messages currently available, up to the fragment
    /// limit. Fails with [`EngineError::Running`] while the matching thread
    /// is live.
    pub fn poll_inbound(&self) -> Result<usize, EngineError> {
        let _writer = self.acquire_writer()?;
        Ok(self.core.poll_inbound())
    }

    /// The matching thread holds the writer lock until it has drained the
    /// inbound channel, so this also fails during shutdown
    fn acquire_writer(&self) -> Result<MutexGuard<'_, ()>, EngineError> {
        if self.is_running() {
            return Err(EngineError::Running);
        }
        self.core.writer.try_lock().ok_or(EngineError::Running)
    }

    /// Publishes one snapshot per book to the outbound channel. Returns the
    /// number of snapshots published.
    pub fn publish_sweep(&self) -> usize {
        let mut buffer = vec![0u8; SNAPSHOT_BUFFER_CAPACITY];
        self.core.publish_sweep(0, 1, &mut buffer)
    }

    /// Removes and returns the pending trades of every book
    pub fn drain_trades(&self) -> Vec<Trade> {
        self.core
            .registry
            .all_books()
            .iter()
            .flat_map(|book| book.drain_trades())
            .collect()
    }

    /// Removes and returns pending order acknowledgements, in acceptance order
    pub fn drain_acks(&self) -> Vec<OrderAck> {
        let Some(queue) = &self.core.acks else {
            return Vec::new();
        };
        let mut acks = Vec::with_capacity(queue.len());
        while let Some(ack) = queue.pop() {
            acks.push(ack);
        }
        acks
    }

    /// Acknowledgements discarded because the ack queue was full
    pub fn dropped_acks(&self) -> u64 {
        self.core.dropped_acks.load(Ordering::Relaxed)
    }
}

impl Drop for MatchingEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
