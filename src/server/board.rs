//! Ticket board state
//!
//! `TicketBoard` bundles everything one board turn may touch: the ticket
//! store, the subscription registry, the rate limiter and the outbound
//! queues of live connections. It is constructed once at server start and
//! shared with connection tasks and the sweeper behind a single mutex.
//!
//! Request routing lives in [`router`](super::router), the periodic sweep
//! in [`sweeper`](super::sweeper) and connect/disconnect handling in
//! [`lifecycle`](super::lifecycle).

use crate::board::{BoardConfig, Millis, TicketStore};
use crate::protocol::ServerEvent;
use crate::registry::SubscriptionRegistry;
use crate::session::{ConnectionId, Peers, RateLimiter};
use crate::stats::BoardStats;

/// Why a ticket left the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// TTL elapsed
    Expired,
    /// Grace period after closing elapsed
    Closed,
}

impl std::fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemovalReason::Expired => write!(f, "expired"),
            RemovalReason::Closed => write!(f, "closed"),
        }
    }
}

/// The whole mutable state of a ticket board
pub struct TicketBoard {
    pub(super) store: TicketStore,
    pub(super) subscriptions: SubscriptionRegistry,
    pub(super) limiter: RateLimiter,
    pub(super) peers: Peers,
    pub(super) stats: BoardStats,
}

impl TicketBoard {
    /// Create an empty board with default configuration
    pub fn new() -> Self {
        Self::with_config(BoardConfig::default())
    }

    /// Create an empty board with custom configuration
    pub fn with_config(config: BoardConfig) -> Self {
        Self {
            limiter: RateLimiter::new(config.rate_limit_interval),
            store: TicketStore::with_config(config),
            subscriptions: SubscriptionRegistry::new(),
            peers: Peers::new(),
            stats: BoardStats::new(),
        }
    }

    /// Board configuration
    pub fn config(&self) -> &BoardConfig {
        self.store.config()
    }

    /// Read access to the ticket store
    pub fn store(&self) -> &TicketStore {
        &self.store
    }

    /// Read access to the subscription registry
    pub fn subscriptions(&self) -> &SubscriptionRegistry {
        &self.subscriptions
    }

    /// Board statistics
    pub fn stats(&self) -> &BoardStats {
        &self.stats
    }

    /// Number of live connections
    pub fn connection_count(&self) -> usize {
        self.peers.len()
    }

    /// Send the live ticket list to one connection
    pub(super) fn send_ticket_list(&self, conn: ConnectionId, now: Millis) {
        let event = ServerEvent::Tickets {
            tickets: self.store.list_live(now),
        };
        self.peers.send(conn, &event);
    }

    /// Send the live ticket list to every feed member
    pub(super) fn broadcast_ticket_list(&self, now: Millis) {
        let members = self.subscriptions.feed_members();
        let event = ServerEvent::Tickets {
            tickets: self.store.list_live(now),
        };
        let sent = self.peers.send_many(&members, &event);
        tracing::trace!(recipients = sent, "Ticket list broadcast");
    }

    /// Send an event to every subscriber of a ticket
    pub(super) fn notify_subscribers(&self, ticket_id: &str, event: &ServerEvent) -> usize {
        let subscribers = self.subscriptions.subscribers_of(ticket_id);
        self.peers.send_many(&subscribers, event)
    }

    /// Remove a ticket, its replies and its subscriptions
    ///
    /// Current subscribers receive `ticket_deleted`. The feed is not
    /// refreshed here; callers batch that. Returns the number of notified
    /// connections, or `None` if the ticket was already gone.
    pub fn remove_ticket(&mut self, ticket_id: &str, reason: RemovalReason) -> Option<usize> {
        let (ticket, replies) = self.store.remove_ticket(ticket_id)?;
        let subscribers = self.subscriptions.drop_ticket(ticket_id);

        let event = ServerEvent::TicketDeleted {
            ticket_id: ticket.id.clone(),
        };
        let notified = self.peers.send_many(&subscribers, &event);
        self.stats.tickets_removed += 1;

        tracing::info!(
            ticket = %ticket.id,
            reason = %reason,
            replies = replies.len(),
            subscribers = subscribers.len(),
            "Ticket removed"
        );

        Some(notified)
    }
}

impl Default for TicketBoard {
    fn default() -> Self {
        Self::new()
    }
}
