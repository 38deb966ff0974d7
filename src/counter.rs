//! Order id generation and processed-order accounting.

use crossbeam::utils::CachePadded;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

/// Issues order ids and counts processed orders.
///
/// The id generator is shared by every producer while the processed count is
/// written by the matching thread, so each lives on its own cache line. Once
/// the processed count reaches the completion threshold a one-shot signal
/// fires; `reset` re-arms it for the next batch.
pub struct OrderCounter {
    next_order_id: CachePadded<AtomicU64>,
    processed: CachePadded<AtomicU64>,
    completion_threshold: u64,
    completion: CompletionSignal,
}

struct CompletionSignal {
    fired: Mutex<bool>,
    condvar: Condvar,
}

impl OrderCounter {
    /// Creates a counter whose first issued id is 1.
    pub fn new(completion_threshold: u64) -> Self {
        Self {
            next_order_id: CachePadded::new(AtomicU64::new(1)),
            processed: CachePadded::new(AtomicU64::new(0)),
            completion_threshold,
            completion: CompletionSignal {
                fired: Mutex::new(false),
                condvar: Condvar::new(),
            },
        }
    }

    /// Returns a fresh order id. Ids are unique and strictly increasing for the
    /// lifetime of the counter, including across `reset`.
    #[inline]
    pub fn next_order_id(&self) -> u64 {
        self.next_order_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Records one processed order, firing the completion signal when the
    /// threshold is reached.
    #[inline]
    pub fn increment(&self) {
        let processed = self.processed.fetch_add(1, Ordering::AcqRel) + 1;
        if processed == self.completion_threshold {
            self.complete();
        }
    }

    /// Number of orders processed since construction or the last `reset`.
    pub fn processed_count(&self) -> u64 {
        self.processed.load(Ordering::Acquire)
    }

    /// The processed count at which the completion signal fires.
    pub fn completion_threshold(&self) -> u64 {
        self.completion_threshold
    }

    /// Whether the completion signal has fired since the last `reset`.
    pub fn is_complete(&self) -> bool {
        *self.completion.fired.lock()
    }

    /// Blocks until the completion signal fires or `timeout` elapses.
    /// Returns `true` if the signal fired.
    pub fn wait_for_completion(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut fired = self.completion.fired.lock();
        while !*fired {
            if self
                .completion
                .condvar
                .wait_until(&mut fired, deadline)
                .timed_out()
            {
                return *fired;
            }
        }
        true
    }

    /// Clears the processed count and re-arms the completion signal. The id
    /// sequence is left untouched.
    pub fn reset(&self) {
        let mut fired = self.completion.fired.lock();
        self.processed.store(0, Ordering::Release);
        *fired = false;
        debug!("Order counter reset");
    }

    fn complete(&self) {
        let mut fired = self.completion.fired.lock();
        *fired = true;
        self.completion.condvar.notify_all();
        debug!(
            "Order counter reached completion threshold {}",
            self.completion_threshold
        );
    }
}
