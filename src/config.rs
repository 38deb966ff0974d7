//! Engine configuration

use crate::codec::{MAX_SNAPSHOT_LEVELS, MAX_SNAPSHOT_SIZE, NEW_ORDER_SIZE};
use crate::idle::IdleStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Tunables for a [`MatchingEngine`](crate::MatchingEngine).
///
/// Every field has a default, so a JSON document only needs the fields it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Messages the inbound command channel can hold
    pub inbound_capacity: usize,
    /// Messages the outbound market data channel can hold
    pub outbound_capacity: usize,
    /// Largest message either in-process channel accepts
    pub max_message_size: usize,
    /// Number of market data publisher threads
    pub publisher_threads: usize,
    /// Levels per side in published snapshots, at most 5
    pub snapshot_depth: usize,
    /// Pause between two publisher sweeps
    pub publish_interval_micros: u64,
    /// Messages handled per inbound poll
    pub poll_fragment_limit: usize,
    /// How loops wait when idle or back pressured
    pub idle_strategy: IdleStrategy,
    /// Processed orders that fire the completion signal
    pub completion_threshold: u64,
    /// Longest wait on the completion signal during warm-up
    pub completion_timeout_millis: u64,
    /// Order acknowledgements retained until drained; 0 disables them.
    /// Acks past the bound are dropped and counted.
    pub ack_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inbound_capacity: 65_536,
            outbound_capacity: 4_096,
            max_message_size: 1_024,
            publisher_threads: 2,
            snapshot_depth: MAX_SNAPSHOT_LEVELS,
            publish_interval_micros: 1_000,
            poll_fragment_limit: 10,
            idle_strategy: IdleStrategy::BusySpin,
            completion_threshold: 10_000,
            completion_timeout_millis: 1_000,
            ack_capacity: 65_536,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inbound_capacity == 0 || self.outbound_capacity == 0 {
            return Err(ConfigError::Invalid(
                "channel capacities must be positive".to_string(),
            ));
        }
        let smallest = NEW_ORDER_SIZE.max(MAX_SNAPSHOT_SIZE);
        if self.max_message_size < smallest {
            return Err(ConfigError::Invalid(format!(
                "max_message_size {} is below the largest protocol message ({smallest} bytes)",
                self.max_message_size
            )));
        }
        if self.snapshot_depth == 0 || self.snapshot_depth > MAX_SNAPSHOT_LEVELS {
            return Err(ConfigError::Invalid(format!(
                "snapshot_depth must be between 1 and {MAX_SNAPSHOT_LEVELS}, got {}",
                self.snapshot_depth
            )));
        }
        if self.poll_fragment_limit == 0 {
            return Err(ConfigError::Invalid(
                "poll_fragment_limit must be positive".to_string(),
            ));
        }
        if self.completion_threshold == 0 {
            return Err(ConfigError::Invalid(
                "completion_threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn publish_interval(&self) -> Duration {
        Duration::from_micros(self.publish_interval_micros)
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_millis(self.completion_timeout_millis)
    }
}
