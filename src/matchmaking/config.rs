//! Matchmaking configuration

use std::time::Duration;

/// Limits for relayed chat messages
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Maximum message length in characters, after trimming
    pub max_message_len: usize,

    /// Minimum gap between two relayed messages from one connection
    pub min_message_interval: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_message_len: 500,
            min_message_interval: Duration::from_millis(300),
        }
    }
}

impl MatchConfig {
    /// Set the maximum message length
    pub fn max_message_len(mut self, len: usize) -> Self {
        self.max_message_len = len;
        self
    }

    /// Set the minimum message interval
    pub fn min_message_interval(mut self, interval: Duration) -> Self {
        self.min_message_interval = interval;
        self
    }
}
