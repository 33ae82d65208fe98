//! Subscription registry implementation
//!
//! Two mirrored indices over the same edge set: connection → tickets (used
//! for teardown) and ticket → connections (used for fan-out). Every
//! mutation touches both sides before returning and prunes entries that
//! become empty.

use std::collections::{HashMap, HashSet};

use crate::session::ConnectionId;

/// Registry of which connection watches which ticket, plus the feed topic
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    /// connection → ticket ids it has joined
    by_connection: HashMap<ConnectionId, HashSet<String>>,

    /// ticket id → connections that joined it
    by_ticket: HashMap<String, HashSet<ConnectionId>>,

    /// Members of the global ticket-list feed
    feed: HashSet<ConnectionId>,
}

impl SubscriptionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a connection to a ticket
    ///
    /// Returns `false` if the edge already existed.
    pub fn subscribe(&mut self, conn: ConnectionId, ticket_id: &str) -> bool {
        let added = self
            .by_ticket
            .entry(ticket_id.to_string())
            .or_default()
            .insert(conn);
        self.by_connection
            .entry(conn)
            .or_default()
            .insert(ticket_id.to_string());

        if added {
            tracing::debug!(conn = conn, ticket = %ticket_id, "Subscribed");
        }
        added
    }

    /// Remove a single edge
    ///
    /// Returns `false` if the connection was not subscribed.
    pub fn unsubscribe(&mut self, conn: ConnectionId, ticket_id: &str) -> bool {
        let removed = remove_edge(&mut self.by_ticket, ticket_id, &conn);
        remove_edge(&mut self.by_connection, &conn, ticket_id);

        if removed {
            tracing::debug!(conn = conn, ticket = %ticket_id, "Unsubscribed");
        }
        removed
    }

    /// Remove every ticket edge of a connection
    ///
    /// Returns the ticket ids the connection was watching. Feed membership
    /// is left alone.
    pub fn unsubscribe_all(&mut self, conn: ConnectionId) -> Vec<String> {
        let tickets: Vec<String> = self
            .by_connection
            .remove(&conn)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();

        for ticket_id in &tickets {
            remove_edge(&mut self.by_ticket, ticket_id.as_str(), &conn);
        }
        tickets
    }

    /// Remove every edge of a ticket that no longer exists
    ///
    /// Returns the connections that were subscribed to it.
    pub fn drop_ticket(&mut self, ticket_id: &str) -> Vec<ConnectionId> {
        let conns: Vec<ConnectionId> = self
            .by_ticket
            .remove(ticket_id)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();

        for conn in &conns {
            remove_edge(&mut self.by_connection, conn, ticket_id);
        }
        conns
    }

    /// Connections currently subscribed to a ticket
    pub fn subscribers_of(&self, ticket_id: &str) -> Vec<ConnectionId> {
        self.by_ticket
            .get(ticket_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Tickets a connection is subscribed to
    pub fn tickets_of(&self, conn: ConnectionId) -> Vec<String> {
        self.by_connection
            .get(&conn)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether a specific edge exists
    pub fn is_subscribed(&self, conn: ConnectionId, ticket_id: &str) -> bool {
        self.by_ticket
            .get(ticket_id)
            .map(|set| set.contains(&conn))
            .unwrap_or(false)
    }

    /// Add a connection to the feed
    pub fn join_feed(&mut self, conn: ConnectionId) {
        self.feed.insert(conn);
    }

    /// Remove a connection from the feed
    pub fn leave_feed(&mut self, conn: ConnectionId) {
        self.feed.remove(&conn);
    }

    /// Connections that receive ticket-list refreshes
    pub fn feed_members(&self) -> Vec<ConnectionId> {
        self.feed.iter().copied().collect()
    }

    /// Number of tickets with at least one subscriber
    pub fn watched_ticket_count(&self) -> usize {
        self.by_ticket.len()
    }

    /// Number of connections with at least one subscription
    pub fn subscribed_connection_count(&self) -> usize {
        self.by_connection.len()
    }

    /// Check that both indices describe the same edge set
    pub fn is_consistent(&self) -> bool {
        let forward = self.by_connection.iter().all(|(conn, tickets)| {
            !tickets.is_empty()
                && tickets.iter().all(|t| {
                    self.by_ticket
                        .get(t)
                        .map(|set| set.contains(conn))
                        .unwrap_or(false)
                })
        });
        let backward = self.by_ticket.iter().all(|(ticket, conns)| {
            !conns.is_empty()
                && conns.iter().all(|c| {
                    self.by_connection
                        .get(c)
                        .map(|set| set.contains(ticket))
                        .unwrap_or(false)
                })
        });
        forward && backward
    }
}

/// Remove `value` from the set under `key`, dropping the set once empty
fn remove_edge<K, V, Q, R>(index: &mut HashMap<K, HashSet<V>>, key: &Q, value: &R) -> bool
where
    K: std::hash::Hash + Eq + std::borrow::Borrow<Q>,
    V: std::hash::Hash + Eq + std::borrow::Borrow<R>,
    Q: std::hash::Hash + Eq + ?Sized,
    R: std::hash::Hash + Eq + ?Sized,
{
    let Some(set) = index.get_mut(key) else {
        return false;
    };
    let removed = set.remove(value);
    if set.is_empty() {
        index.remove(key);
    }
    removed
}
