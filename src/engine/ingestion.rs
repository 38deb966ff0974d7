//! The single-writer matching loop.

use super::{EngineCore, OrderAck};
use crate::codec::{DecodeError, OrderCommand};
use crate::idle::Idler;
use crate::orderbook::Order;
use crate::utils::monotonic_nanos;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use tracing::{debug, error, trace, warn};

/// Dropped acks between two overflow warnings
const ACK_DROP_LOG_INTERVAL: u64 = 10_000;

impl EngineCore {
    /// Decodes one inbound message and applies it to its book
    pub(super) fn dispatch(&self, message: &[u8]) -> Result<(), DecodeError> {
        let command = OrderCommand::decode(message)?;
        self.apply(command);
        Ok(())
    }

    fn apply(&self, command: OrderCommand) {
        let book = self.registry.get_or_create(command.symbol());

        match command {
            OrderCommand::NewOrder {
                symbol,
                side,
                price,
                quantity,
                user_id,
            } => {
                let order_id = self.counter.next_order_id();
                let timestamp = monotonic_nanos();
                self.record_ack(OrderAck {
                    order_id,
                    user_id,
                    symbol,
                    side,
                    price,
                    quantity,
                    timestamp,
                });

                let order = Order::new(order_id, symbol, side, price, quantity, user_id, timestamp);
                let outcome = book.add_order(order);
                trace!(
                    "Order {} executed {} remaining {}",
                    order_id, outcome.executed_quantity, outcome.remaining_quantity
                );
                self.counter.increment();
            }
            OrderCommand::CancelOrder { order_id, .. } => {
                if book.cancel_order(order_id).is_none() {
                    trace!("Cancel for unknown order {} ignored", order_id);
                }
            }
            OrderCommand::ModifyOrder {
                order_id,
                new_price,
                new_quantity,
                ..
            } => {
                if book.modify_order(order_id, new_price, new_quantity).is_none() {
                    trace!("Modify for unknown order {} ignored", order_id);
                }
            }
        }
    }

    fn record_ack(&self, ack: OrderAck) {
        let Some(queue) = &self.acks else {
            return;
        };
        if queue.push(ack).is_err() {
            let dropped = self.dropped_acks.fetch_add(1, Ordering::Relaxed);
            if dropped % ACK_DROP_LOG_INTERVAL == 0 {
                warn!(
                    "Ack queue full ({} entries); {} acks dropped so far",
                    queue.capacity(),
                    dropped + 1
                );
            }
        }
    }

    /// Handles one message, logging and dropping anything that fails
    fn handle_message(&self, message: &[u8]) {
        match panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(message))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!("Dropping inbound message ({} bytes): {}", message.len(), err),
            Err(_) => error!(
                "Panic while processing inbound message ({} bytes); message dropped",
                message.len()
            ),
        }
    }

    /// Processes the messages currently available, up to the fragment limit
    pub(super) fn poll_inbound(&self) -> usize {
        self.inbound.poll(
            &mut |message| self.handle_message(message),
            self.config.poll_fragment_limit,
        )
    }

    pub(super) fn run_matching_loop(&self) {
        let _writer = self.writer.lock();
        debug!("Matching loop started");
        let idler = Idler::new(self.config.idle_strategy);

        while self.running.load(Ordering::Acquire) {
            if self.poll_inbound() == 0 {
                idler.idle();
            } else {
                idler.reset();
            }
        }

        // Apply whatever was accepted before the stop request
        let mut drained = 0;
        loop {
            let processed = self.poll_inbound();
            if processed == 0 {
                break;
            }
            drained += processed;
        }
        debug!("Matching loop stopped after draining {} messages", drained);
    }
}
