//! Outbound delivery to connected peers
//!
//! Each live connection owns an unbounded channel drained by its writer
//! task. Sending only enqueues, so a whole fan-out completes inside the
//! turn that produced it. A frame for a connection that is gone is dropped
//! without error.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::mpsc;

use super::ConnectionId;
use crate::protocol::Frame;

/// Sending half of a connection's outbound queue
pub type FrameSender = mpsc::UnboundedSender<Frame>;

/// Receiving half of a connection's outbound queue
pub type FrameReceiver = mpsc::UnboundedReceiver<Frame>;

/// Create an outbound queue for a new connection
pub fn channel() -> (FrameSender, FrameReceiver) {
    mpsc::unbounded_channel()
}

/// Live connections and their outbound queues
#[derive(Debug, Default)]
pub struct Peers {
    senders: HashMap<ConnectionId, FrameSender>,
}

impl Peers {
    /// Create an empty peer table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection's outbound queue
    pub fn insert(&mut self, conn: ConnectionId, sender: FrameSender) {
        self.senders.insert(conn, sender);
    }

    /// Forget a connection
    pub fn remove(&mut self, conn: ConnectionId) -> bool {
        self.senders.remove(&conn).is_some()
    }

    /// Whether a connection is registered and its queue still open
    pub fn is_open(&self, conn: ConnectionId) -> bool {
        self.senders
            .get(&conn)
            .map(|tx| !tx.is_closed())
            .unwrap_or(false)
    }

    /// Number of registered connections
    pub(crate) fn len(&self) -> usize {
        self.senders.len()
    }

    /// Send an event to one connection
    pub fn send<T: Serialize>(&self, conn: ConnectionId, event: &T) {
        if let Some(frame) = encode(event) {
            self.send_frame(conn, frame);
        }
    }

    /// Send an event to several connections, serializing it once
    ///
    /// Returns the number of connections the frame was queued for.
    pub fn send_many<T: Serialize>(&self, conns: &[ConnectionId], event: &T) -> usize {
        if conns.is_empty() {
            return 0;
        }
        match encode(event) {
            Some(frame) => conns
                .iter()
                .filter(|&&conn| self.send_frame(conn, frame.clone()))
                .count(),
            None => 0,
        }
    }

    /// Queue an already-encoded frame
    ///
    /// Returns `false` if the connection is unknown or its queue closed.
    pub fn send_frame(&self, conn: ConnectionId, frame: Frame) -> bool {
        match self.senders.get(&conn) {
            Some(tx) => tx.send(frame).is_ok(),
            None => false,
        }
    }
}

fn encode<T: Serialize>(event: &T) -> Option<Frame> {
    match Frame::encode(event) {
        Ok(frame) => Some(frame),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize event");
            None
        }
    }
}
