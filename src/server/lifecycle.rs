//! Connection lifecycle for the ticket board
//!
//! A new connection joins the feed and gets the live list, nothing else.
//! Teardown removes every trace of the connection without broadcasting.

use std::time::Duration;

use super::board::TicketBoard;
use super::handler::ConnectionHandler;
use crate::board::Millis;
use crate::session::{ConnectionId, FrameSender};

impl ConnectionHandler for TicketBoard {
    fn on_open(&mut self, conn: ConnectionId, sender: FrameSender, now: Millis) {
        self.peers.insert(conn, sender);
        self.subscriptions.join_feed(conn);
        self.stats.connection_opened();

        tracing::debug!(conn = conn, active = self.peers.len(), "Connection opened");

        self.send_ticket_list(conn, now);
    }

    fn on_frame(&mut self, conn: ConnectionId, text: &str, now: Millis) {
        self.handle_frame(conn, text, now);
    }

    fn on_close(&mut self, conn: ConnectionId) {
        let watched = self.subscriptions.unsubscribe_all(conn);
        self.subscriptions.leave_feed(conn);
        self.limiter.forget(conn);
        if self.peers.remove(conn) {
            self.stats.connection_closed();
        }

        tracing::debug!(
            conn = conn,
            watched = watched.len(),
            active = self.peers.len(),
            "Connection closed"
        );
    }

    fn on_tick(&mut self, now: Millis) {
        self.sweep(now);
    }

    fn tick_interval(&self) -> Option<Duration> {
        Some(self.config().sweep_interval)
    }
}
