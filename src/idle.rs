//! Strategies for waiting without blocking.

use crossbeam::utils::Backoff;
use serde::{Deserialize, Serialize};

/// How a loop waits when it has no work, or when an offer is back pressured.
///
/// `BusySpin` keeps the core hot for the lowest latency. `Backoff` spins with
/// exponential backoff and then yields to the scheduler, trading some latency
/// for CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleStrategy {
    #[default]
    BusySpin,
    Backoff,
}

/// Per-loop idle state
#[derive(Debug)]
pub struct Idler {
    strategy: IdleStrategy,
    backoff: Backoff,
}

impl Idler {
    pub fn new(strategy: IdleStrategy) -> Self {
        Self {
            strategy,
            backoff: Backoff::new(),
        }
    }

    /// Waits briefly after a pass that found no work
    #[inline]
    pub fn idle(&self) {
        match self.strategy {
            IdleStrategy::BusySpin => std::hint::spin_loop(),
            IdleStrategy::Backoff => self.backoff.snooze(),
        }
    }

    /// Resets the backoff after a pass that did work
    #[inline]
    pub fn reset(&self) {
        if self.strategy == IdleStrategy::Backoff {
            self.backoff.reset();
        }
    }

    pub fn strategy(&self) -> IdleStrategy {
        self.strategy
    }
}
