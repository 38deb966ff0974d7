use super::{MessageChannel, OfferError};
use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Bounded in-process channel.
///
/// Backed by a lock-free array queue; a full queue refuses offers with
/// `OfferError::BackPressured` until a consumer drains it. Closing the channel
/// makes later offers fail while still letting consumers drain what is queued.
#[derive(Debug)]
pub struct IpcChannel {
    queue: ArrayQueue<Vec<u8>>,
    max_message_size: usize,
    closed: AtomicBool,
}

impl IpcChannel {
    /// Creates a channel holding at most `capacity` messages of at most
    /// `max_message_size` bytes. A zero capacity is raised to one.
    pub fn new(capacity: usize, max_message_size: usize) -> Self {
        Self {
            queue: ArrayQueue::new(capacity.max(1)),
            max_message_size,
            closed: AtomicBool::new(false),
        }
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Messages currently queued
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!("IPC channel closed with {} queued messages", self.len());
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl MessageChannel for IpcChannel {
    fn offer(&self, message: &[u8]) -> Result<(), OfferError> {
        if self.is_closed() {
            return Err(OfferError::Closed);
        }
        if message.len() > self.max_message_size {
            return Err(OfferError::MessageTooLarge {
                size: message.len(),
                max: self.max_message_size,
            });
        }
        self.queue
            .push(message.to_vec())
            .map_err(|_| OfferError::BackPressured)
    }

    fn poll(&self, handler: &mut dyn FnMut(&[u8]), fragment_limit: usize) -> usize {
        let mut delivered = 0;
        while delivered < fragment_limit {
            let Some(message) = self.queue.pop() else {
                break;
            };
            handler(&message);
            delivered += 1;
        }
        delivered
    }
}
