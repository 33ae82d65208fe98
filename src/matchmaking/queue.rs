//! Waiting queue and pair table
//!
//! The queue is FIFO and may hold stale entries (connections that closed or
//! got paired while waiting); those are skipped when a partner is popped.

use std::collections::{HashMap, VecDeque};

use super::config::MatchConfig;
use super::message::{DisconnectReason, MatchEvent, MatchRequest, MatchStatus};
use crate::board::Millis;
use crate::protocol::decode;
use crate::server::ConnectionHandler;
use crate::session::{ConnectionId, FrameSender, Peers, RateLimiter};

/// Where a connection stands in matchmaking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    Idle,
    Searching,
    Paired,
}

/// Matchmaking state for every live connection
pub struct Matchmaker {
    config: MatchConfig,
    waiting: VecDeque<ConnectionId>,
    partners: HashMap<ConnectionId, ConnectionId>,
    limiter: RateLimiter,
    peers: Peers,
}

impl Matchmaker {
    /// Create a matchmaker with default limits
    pub fn new() -> Self {
        Self::with_config(MatchConfig::default())
    }

    /// Create a matchmaker with custom limits
    pub fn with_config(config: MatchConfig) -> Self {
        Self {
            limiter: RateLimiter::new(config.min_message_interval),
            config,
            waiting: VecDeque::new(),
            partners: HashMap::new(),
            peers: Peers::new(),
        }
    }

    /// Current state of a connection
    pub fn state(&self, conn: ConnectionId) -> MatchState {
        if self.partners.contains_key(&conn) {
            MatchState::Paired
        } else if self.waiting.contains(&conn) {
            MatchState::Searching
        } else {
            MatchState::Idle
        }
    }

    /// Partner of a paired connection
    pub fn partner_of(&self, conn: ConnectionId) -> Option<ConnectionId> {
        self.partners.get(&conn).copied()
    }

    /// Number of queue entries, stale ones included
    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    /// Number of active pairs
    pub fn pair_count(&self) -> usize {
        self.partners.len() / 2
    }

    /// Route one decoded request
    pub fn handle_request(&mut self, conn: ConnectionId, request: MatchRequest, now: Millis) {
        match request {
            MatchRequest::Find => self.find(conn),
            MatchRequest::CancelFind => {
                self.leave_queue(conn);
                self.send_status(conn, MatchStatus::Idle);
            }
            MatchRequest::Message { text } => self.relay(conn, &text, now),
            MatchRequest::Disconnect => self.leave(conn, DisconnectReason::Disconnected),
            MatchRequest::Report => self.leave(conn, DisconnectReason::Reported),
        }
    }

    fn find(&mut self, conn: ConnectionId) {
        if self.partners.contains_key(&conn) {
            return;
        }

        self.leave_queue(conn);

        let Some(partner) = self.next_partner(conn) else {
            self.waiting.push_back(conn);
            self.send_status(conn, MatchStatus::Searching);
            return;
        };

        self.partners.insert(conn, partner);
        self.partners.insert(partner, conn);

        tracing::debug!(conn = conn, partner = partner, "Paired");

        self.peers.send_many(&[conn, partner], &MatchEvent::Matched);
    }

    fn next_partner(&mut self, conn: ConnectionId) -> Option<ConnectionId> {
        while let Some(candidate) = self.waiting.pop_front() {
            if candidate == conn {
                continue;
            }
            if self.peers.is_open(candidate) && !self.partners.contains_key(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    fn relay(&mut self, conn: ConnectionId, text: &str, now: Millis) {
        let text = text.trim();
        let len = text.chars().count();
        if len == 0 || len > self.config.max_message_len {
            return;
        }

        if !self.limiter.allows(conn, now) {
            return;
        }

        let Some(partner) = self.partner_of(conn) else {
            return;
        };
        if !self.peers.is_open(partner) {
            return;
        }

        self.limiter.record(conn, now);
        self.peers.send(
            partner,
            &MatchEvent::Message {
                text: text.to_string(),
            },
        );
    }

    fn leave(&mut self, conn: ConnectionId, reason: DisconnectReason) {
        self.break_pair(conn, reason);
        self.leave_queue(conn);
        self.send_status(conn, MatchStatus::Idle);
    }

    fn break_pair(&mut self, conn: ConnectionId, reason: DisconnectReason) {
        let Some(partner) = self.partners.remove(&conn) else {
            return;
        };
        self.partners.remove(&partner);

        tracing::debug!(conn = conn, partner = partner, reason = ?reason, "Pair broken");

        self.peers
            .send_many(&[conn, partner], &MatchEvent::Disconnected { reason });
    }

    fn leave_queue(&mut self, conn: ConnectionId) {
        self.waiting.retain(|&c| c != conn);
    }

    fn send_status(&self, conn: ConnectionId, status: MatchStatus) {
        self.peers.send(conn, &MatchEvent::Status { status });
    }
}

impl Default for Matchmaker {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionHandler for Matchmaker {
    fn on_open(&mut self, conn: ConnectionId, sender: FrameSender, _now: Millis) {
        self.peers.insert(conn, sender);
        tracing::debug!(conn = conn, active = self.peers.len(), "Connection opened");
        self.send_status(conn, MatchStatus::Idle);
    }

    fn on_frame(&mut self, conn: ConnectionId, text: &str, now: Millis) {
        match decode::<MatchRequest>(text) {
            Ok(request) => self.handle_request(conn, request, now),
            Err(e) => {
                tracing::debug!(conn = conn, error = %e, "Undecodable frame");
                self.peers.send(
                    conn,
                    &MatchEvent::Error {
                        message: e.to_string(),
                    },
                );
            }
        }
    }

    fn on_close(&mut self, conn: ConnectionId) {
        self.peers.remove(conn);
        self.leave_queue(conn);
        self.break_pair(conn, DisconnectReason::Disconnected);
        self.limiter.forget(conn);

        tracing::debug!(conn = conn, active = self.peers.len(), "Connection closed");
    }
}
