//! Board configuration
//!
//! Lifetimes, limits and intervals for the ticket board.

use std::time::Duration;

/// Configuration for the ticket board
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// How long a ticket lives after creation (not renewed by activity)
    pub ticket_ttl: Duration,

    /// How long a closed ticket stays visible before the sweeper removes it
    pub close_grace_period: Duration,

    /// Interval between cleanup sweeps
    pub sweep_interval: Duration,

    /// Minimum gap between two mutating requests from one connection
    pub rate_limit_interval: Duration,

    /// Maximum title length in characters
    pub max_title_len: usize,

    /// Maximum body length in characters
    pub max_body_len: usize,

    /// Maximum reply length in characters
    pub max_reply_len: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            ticket_ttl: Duration::from_secs(6 * 60 * 60),
            close_grace_period: Duration::from_secs(60),
            sweep_interval: Duration::from_secs(60),
            rate_limit_interval: Duration::from_secs(1),
            max_title_len: 80,
            max_body_len: 1000,
            max_reply_len: 500,
        }
    }
}

impl BoardConfig {
    /// Set the ticket TTL
    pub fn ticket_ttl(mut self, ttl: Duration) -> Self {
        self.ticket_ttl = ttl;
        self
    }

    /// Set the grace period after closing
    pub fn close_grace_period(mut self, grace: Duration) -> Self {
        self.close_grace_period = grace;
        self
    }

    /// Set the sweep interval
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Set the rate-limit interval
    pub fn rate_limit_interval(mut self, interval: Duration) -> Self {
        self.rate_limit_interval = interval;
        self
    }
}
