//! Crate-wide error type
//!
//! Process-level failures (binding, serving, socket I/O). Per-request
//! failures never reach this type; they are reported to the offending
//! connection as `warn`/`error` events instead.

use std::io;

/// Result alias used by the transport layer
pub type Result<T> = std::result::Result<T, Error>;

/// Transport and process errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Socket I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// WebSocket read or write failed
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] axum::Error),
}
