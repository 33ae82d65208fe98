//! Per-connection rate limiting
//!
//! Remembers when each connection last performed a gated action. A request
//! that arrives sooner than the configured interval is rejected and not
//! queued; the client decides whether to try again.

use std::collections::HashMap;
use std::time::Duration;

use super::ConnectionId;
use crate::board::clock::{self, Millis};

/// Last-action timestamps per connection
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_action: HashMap<ConnectionId, Millis>,
}

impl RateLimiter {
    /// Create a limiter allowing one action per `interval`
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_action: HashMap::new(),
        }
    }

    /// Whether `conn` may act at `now`, without recording anything
    pub fn allows(&self, conn: ConnectionId, now: Millis) -> bool {
        match self.last_action.get(&conn) {
            Some(&last) => !clock::within_interval(last, self.interval, now),
            None => true,
        }
    }

    /// Record an action at `now`
    pub fn record(&mut self, conn: ConnectionId, now: Millis) {
        self.last_action.insert(conn, now);
    }

    /// Admit and record an action, or reject it
    ///
    /// Returns `false` (and records nothing) when the connection acted too
    /// recently.
    pub fn try_acquire(&mut self, conn: ConnectionId, now: Millis) -> bool {
        if !self.allows(conn, now) {
            return false;
        }
        self.record(conn, now);
        true
    }

    /// Forget a connection
    pub fn forget(&mut self, conn: ConnectionId) {
        self.last_action.remove(&conn);
    }

    /// Number of tracked connections
    pub fn tracked(&self) -> usize {
        self.last_action.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_action_allowed() {
        let mut limiter = RateLimiter::new(Duration::from_millis(300));
        assert!(limiter.try_acquire(1, 10_000));
    }

    #[test]
    fn test_second_action_too_soon() {
        let mut limiter = RateLimiter::new(Duration::from_millis(300));
        assert!(limiter.try_acquire(1, 10_000));
        assert!(!limiter.try_acquire(1, 10_299));

        // Rejected attempt does not push the window forward
        assert!(limiter.try_acquire(1, 10_300));
    }

    #[test]
    fn test_connections_are_independent() {
        let mut limiter = RateLimiter::new(Duration::from_secs(1));
        assert!(limiter.try_acquire(1, 0));
        assert!(limiter.try_acquire(2, 1));
        assert!(!limiter.allows(1, 2));
    }

    #[test]
    fn test_forget() {
        let mut limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.record(1, 0);
        assert_eq!(limiter.tracked(), 1);

        limiter.forget(1);
        assert_eq!(limiter.tracked(), 0);
        assert!(limiter.allows(1, 1));
    }
}
