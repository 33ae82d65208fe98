//! Connection handler trait
//!
//! The seam between the transport (listener + per-connection tasks) and an
//! application state machine. The server keeps one handler behind a single
//! mutex and calls exactly one method per turn, so implementations can
//! assume they never observe a half-applied update.

use std::time::Duration;

use crate::board::Millis;
use crate::session::{ConnectionId, FrameSender};

/// Application driven by connection events
pub trait ConnectionHandler: Send + 'static {
    /// A WebSocket connection completed its handshake
    ///
    /// `sender` is the connection's outbound queue; the handler owns it
    /// until `on_close`.
    fn on_open(&mut self, conn: ConnectionId, sender: FrameSender, now: Millis);

    /// A text frame arrived from `conn`
    fn on_frame(&mut self, conn: ConnectionId, text: &str, now: Millis);

    /// The connection closed or failed
    fn on_close(&mut self, conn: ConnectionId);

    /// Periodic housekeeping, called every `tick_interval`
    fn on_tick(&mut self, _now: Millis) {}

    /// Interval for `on_tick`; `None` disables the background task
    fn tick_interval(&self) -> Option<Duration> {
        None
    }
}
