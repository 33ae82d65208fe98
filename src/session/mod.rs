//! Per-connection bookkeeping
//!
//! Connection identity, outbound queues and rate limiting. Nothing here
//! knows about tickets.

pub mod peers;
pub mod rate_limit;

pub use peers::{channel, FrameReceiver, FrameSender, Peers};
pub use rate_limit::RateLimiter;

/// Unique id of a live connection, assigned by the listener
pub type ConnectionId = u64;
