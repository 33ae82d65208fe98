//! Clock and TTL policy
//!
//! All timestamps are unix milliseconds (`u64`), the same unit that goes
//! out on the wire. Everything here is a pure function of its inputs, so
//! expiry decisions can be tested without a running clock.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the unix epoch
pub type Millis = u64;

/// Current wall-clock time in milliseconds
pub fn now_ms() -> Millis {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as Millis)
        .unwrap_or(0)
}

fn as_ms(d: Duration) -> Millis {
    d.as_millis() as Millis
}

/// Deadline at which a ticket created at `created_at` expires
pub fn expires_at(created_at: Millis, ttl: Duration) -> Millis {
    created_at.saturating_add(as_ms(ttl))
}

/// Whether the TTL deadline has been reached
pub fn is_expired(expires_at: Millis, now: Millis) -> bool {
    now >= expires_at
}

/// Whether a ticket closed at `closed_at` has outlived its grace period
pub fn close_removal_due(closed_at: Millis, grace: Duration, now: Millis) -> bool {
    now.saturating_sub(closed_at) >= as_ms(grace)
}

/// Whether the gap since `last` is shorter than `interval`
pub fn within_interval(last: Millis, interval: Duration, now: Millis) -> bool {
    now.saturating_sub(last) < as_ms(interval)
}
