//! Statistics for the ticket board

use std::time::{Duration, Instant};

/// Board-wide counters
///
/// Updated inside board turns, so plain integers are enough.
#[derive(Debug, Clone)]
pub struct BoardStats {
    /// Total connections ever accepted
    pub total_connections: u64,
    /// Currently connected
    pub active_connections: u64,
    /// Tickets created
    pub tickets_created: u64,
    /// Replies posted
    pub replies_posted: u64,
    /// Tickets removed (sweep or expired-on-join)
    pub tickets_removed: u64,
    /// Requests rejected by the rate limiter
    pub rate_limited: u64,
    /// Sweeps run
    pub sweeps: u64,
    /// When the board was created
    pub started_at: Instant,
}

impl Default for BoardStats {
    fn default() -> Self {
        Self {
            total_connections: 0,
            active_connections: 0,
            tickets_created: 0,
            replies_posted: 0,
            tickets_removed: 0,
            rate_limited: 0,
            sweeps: 0,
            started_at: Instant::now(),
        }
    }
}

impl BoardStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new connection
    pub fn connection_opened(&mut self) {
        self.total_connections += 1;
        self.active_connections += 1;
    }

    /// Record a closed connection
    pub fn connection_closed(&mut self) {
        self.active_connections = self.active_connections.saturating_sub(1);
    }

    /// Time since the board was created
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
