//! Ticket store implementation
//!
//! The authoritative in-memory collections of tickets and their replies.
//! Every operation validates before it mutates, so a rejected request never
//! leaves partial state behind.

use std::collections::HashMap;

use super::clock::{self, Millis};
use super::config::BoardConfig;
use super::error::BoardError;
use super::filter::{check_session, clean_text};
use super::ticket::{Category, Reply, ReplyId, Ticket, TicketId, TicketView};

/// In-memory store of tickets and replies
pub struct TicketStore {
    /// Map of ticket id to ticket
    tickets: HashMap<TicketId, Ticket>,

    /// Replies per ticket, in posting order
    replies: HashMap<TicketId, Vec<Reply>>,

    /// Configuration
    config: BoardConfig,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

impl TicketStore {
    /// Create an empty store with default configuration
    pub fn new() -> Self {
        Self::with_config(BoardConfig::default())
    }

    /// Create an empty store with custom configuration
    pub fn with_config(config: BoardConfig) -> Self {
        Self {
            tickets: HashMap::new(),
            replies: HashMap::new(),
            config,
        }
    }

    /// Get the store configuration
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Create a new ticket
    pub fn create_ticket(
        &mut self,
        category: &str,
        title: &str,
        body: &str,
        author_session_id: &str,
        now: Millis,
    ) -> Result<Ticket, BoardError> {
        let category = Category::parse(category)?;
        let title = clean_text("Title", title, self.config.max_title_len)?;
        let body = clean_text("Body", body, self.config.max_body_len)?;
        check_session(author_session_id)?;

        let ticket = Ticket {
            id: new_id(),
            category,
            title,
            body,
            author_session_id: author_session_id.to_string(),
            created_at: now,
            expires_at: clock::expires_at(now, self.config.ticket_ttl),
            closed: false,
            closed_at: None,
            best_reply_id: None,
        };

        self.tickets.insert(ticket.id.clone(), ticket.clone());
        self.replies.insert(ticket.id.clone(), Vec::new());

        Ok(ticket)
    }

    /// Get a ticket by id
    pub fn get(&self, id: &str) -> Option<&Ticket> {
        self.tickets.get(id)
    }

    /// Replies of a ticket in posting order
    pub fn replies(&self, id: &str) -> &[Reply] {
        self.replies.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Public view of a ticket with its current reply count
    pub fn view(&self, id: &str) -> Option<TicketView> {
        self.tickets
            .get(id)
            .map(|t| TicketView::new(t, self.replies(id).len()))
    }

    /// Whether the ticket's TTL has elapsed
    pub fn is_expired(&self, id: &str, now: Millis) -> bool {
        self.tickets
            .get(id)
            .map(|t| clock::is_expired(t.expires_at, now))
            .unwrap_or(false)
    }

    /// All tickets whose TTL has not elapsed, newest first
    pub fn list_live(&self, now: Millis) -> Vec<TicketView> {
        let mut live: Vec<TicketView> = self
            .tickets
            .values()
            .filter(|t| !clock::is_expired(t.expires_at, now))
            .map(|t| TicketView::new(t, self.replies(&t.id).len()))
            .collect();

        live.sort_by(|a, b| {
            b.ticket
                .created_at
                .cmp(&a.ticket.created_at)
                .then_with(|| a.ticket.id.cmp(&b.ticket.id))
        });
        live
    }

    /// Close a ticket (author only)
    pub fn close_ticket(
        &mut self,
        id: &str,
        session_id: &str,
        now: Millis,
    ) -> Result<Ticket, BoardError> {
        let ticket = self.tickets.get_mut(id).ok_or(BoardError::TicketNotFound)?;

        if clock::is_expired(ticket.expires_at, now) {
            return Err(BoardError::Expired);
        }
        if !ticket.is_author(session_id) {
            return Err(BoardError::Unauthorized);
        }
        if ticket.closed {
            return Err(BoardError::Closed);
        }

        ticket.closed = true;
        ticket.closed_at = Some(now);
        Ok(ticket.clone())
    }

    /// Mark a reply as the best one (author only)
    ///
    /// The choice may be changed later to another reply of the same ticket.
    /// Closed tickets accept it; expired ones do not.
    pub fn mark_best_reply(
        &mut self,
        id: &str,
        reply_id: &str,
        session_id: &str,
        now: Millis,
    ) -> Result<Ticket, BoardError> {
        let ticket = self.tickets.get_mut(id).ok_or(BoardError::TicketNotFound)?;

        if clock::is_expired(ticket.expires_at, now) {
            return Err(BoardError::Expired);
        }
        if !ticket.is_author(session_id) {
            return Err(BoardError::Unauthorized);
        }

        let belongs = self
            .replies
            .get(id)
            .map(|replies| replies.iter().any(|r| r.id == reply_id))
            .unwrap_or(false);
        if !belongs {
            return Err(BoardError::ReplyNotFound);
        }

        ticket.best_reply_id = Some(ReplyId::from(reply_id));
        Ok(ticket.clone())
    }

    /// Append a reply to an open ticket
    pub fn add_reply(
        &mut self,
        ticket_id: &str,
        text: &str,
        session_id: &str,
        now: Millis,
    ) -> Result<Reply, BoardError> {
        let ticket = self.tickets.get(ticket_id).ok_or(BoardError::TicketNotFound)?;

        // Expired but not yet swept
        if clock::is_expired(ticket.expires_at, now) {
            return Err(BoardError::Expired);
        }
        if ticket.closed {
            return Err(BoardError::Closed);
        }

        let text = clean_text("Reply", text, self.config.max_reply_len)?;
        check_session(session_id)?;

        let reply = Reply {
            id: new_id(),
            ticket_id: ticket.id.clone(),
            text,
            session_id: session_id.to_string(),
            created_at: now,
        };

        self.replies
            .entry(reply.ticket_id.clone())
            .or_default()
            .push(reply.clone());

        Ok(reply)
    }

    /// Remove a ticket together with its replies
    ///
    /// Returns `None` if the ticket was already gone.
    pub fn remove_ticket(&mut self, id: &str) -> Option<(Ticket, Vec<Reply>)> {
        let ticket = self.tickets.remove(id)?;
        let replies = self.replies.remove(id).unwrap_or_default();
        Some((ticket, replies))
    }

    /// Ids of tickets due for removal at `now`
    ///
    /// A ticket is due when its TTL elapsed, or when it was closed at least
    /// `close_grace_period` ago.
    pub fn due_for_removal(&self, now: Millis) -> Vec<TicketId> {
        let grace = self.config.close_grace_period;

        self.tickets
            .values()
            .filter(|t| {
                clock::is_expired(t.expires_at, now)
                    || (t.closed
                        && t.closed_at
                            .map(|closed_at| clock::close_removal_due(closed_at, grace, now))
                            .unwrap_or(false))
            })
            .map(|t| t.id.clone())
            .collect()
    }

    /// Total number of stored tickets (including expired, not yet swept)
    pub fn ticket_count(&self) -> usize {
        self.tickets.len()
    }
}

impl Default for TicketStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const T0: Millis = 1_700_000_000_000;

    fn store_with_ticket() -> (TicketStore, Ticket) {
        let mut store = TicketStore::new();
        let ticket = store
            .create_ticket("help", "Need help", "Stuck on step 2", "author", T0)
            .unwrap();
        (store, ticket)
    }

    #[test]
    fn test_create_ticket_defaults() {
        let (store, ticket) = store_with_ticket();

        assert_eq!(ticket.expires_at, ticket.created_at + 6 * 3_600_000);
        assert!(!ticket.closed);
        assert!(ticket.closed_at.is_none());
        assert!(ticket.best_reply_id.is_none());
        assert_eq!(store.get(&ticket.id), Some(&ticket));
        assert!(store.replies(&ticket.id).is_empty());
    }

    #[test]
    fn test_create_ticket_validation() {
        let mut store = TicketStore::new();

        assert!(store.create_ticket("bug", "t", "b", "a", T0).is_err());
        assert!(store.create_ticket("help", "", "b", "a", T0).is_err());
        assert!(store.create_ticket("help", "t", "   ", "a", T0).is_err());
        assert!(store
            .create_ticket("help", &"x".repeat(81), "b", "a", T0)
            .is_err());
        assert!(store
            .create_ticket("help", "t", &"x".repeat(1001), "a", T0)
            .is_err());
        assert!(store.create_ticket("help", "t", "b", "", T0).is_err());
        assert!(store
            .create_ticket("feedback", "see t.me/chat", "b", "a", T0)
            .is_err());
        assert!(store
            .create_ticket("feedback", "t", "ask @admin", "a", T0)
            .is_err());

        assert_eq!(store.ticket_count(), 0);
    }

    #[test]
    fn test_list_live_newest_first() {
        let mut store = TicketStore::new();
        let old = store.create_ticket("help", "old", "b", "a", T0).unwrap();
        let new = store
            .create_ticket("feedback", "new", "b", "a", T0 + 10)
            .unwrap();

        let list = store.list_live(T0 + 20);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].ticket.id, new.id);
        assert_eq!(list[1].ticket.id, old.id);
    }

    #[test]
    fn test_list_live_hides_expired() {
        let (store, ticket) = store_with_ticket();

        assert_eq!(store.list_live(ticket.expires_at - 1).len(), 1);
        assert!(store.list_live(ticket.expires_at).is_empty());
    }

    #[test]
    fn test_replies_count_tracks_replies() {
        let (mut store, ticket) = store_with_ticket();

        store.add_reply(&ticket.id, "Try restarting", "helper", T0 + 1).unwrap();
        store.add_reply(&ticket.id, "Or reinstall", "other", T0 + 2).unwrap();

        assert_eq!(store.view(&ticket.id).unwrap().replies_count, 2);
        assert_eq!(store.list_live(T0 + 3)[0].replies_count, 2);
    }

    #[test]
    fn test_add_reply_errors() {
        let (mut store, ticket) = store_with_ticket();

        assert_eq!(
            store.add_reply("missing", "hi", "s", T0),
            Err(BoardError::TicketNotFound)
        );
        assert!(matches!(
            store.add_reply(&ticket.id, &"x".repeat(501), "s", T0),
            Err(BoardError::Validation(_))
        ));
        assert!(matches!(
            store.add_reply(&ticket.id, "http://spam", "s", T0),
            Err(BoardError::Validation(_))
        ));
        assert_eq!(
            store.add_reply(&ticket.id, "late", "s", ticket.expires_at),
            Err(BoardError::Expired)
        );

        store.close_ticket(&ticket.id, "author", T0 + 1).unwrap();
        assert_eq!(
            store.add_reply(&ticket.id, "hi", "s", T0 + 2),
            Err(BoardError::Closed)
        );
        assert!(store.replies(&ticket.id).is_empty());
    }

    #[test]
    fn test_close_ticket_author_only() {
        let (mut store, ticket) = store_with_ticket();

        assert_eq!(
            store.close_ticket(&ticket.id, "intruder", T0 + 5),
            Err(BoardError::Unauthorized)
        );
        assert!(!store.get(&ticket.id).unwrap().closed);

        let closed = store.close_ticket(&ticket.id, "author", T0 + 5).unwrap();
        assert!(closed.closed);
        assert_eq!(closed.closed_at, Some(T0 + 5));
    }

    #[test]
    fn test_close_ticket_twice_keeps_closed_at() {
        let (mut store, ticket) = store_with_ticket();

        store.close_ticket(&ticket.id, "author", T0 + 5).unwrap();
        assert_eq!(
            store.close_ticket(&ticket.id, "author", T0 + 50),
            Err(BoardError::Closed)
        );
        assert_eq!(store.get(&ticket.id).unwrap().closed_at, Some(T0 + 5));
    }

    #[test]
    fn test_mark_best_reply() {
        let (mut store, ticket) = store_with_ticket();
        let reply = store.add_reply(&ticket.id, "Try restarting", "helper", T0).unwrap();

        assert_eq!(
            store.mark_best_reply(&ticket.id, &reply.id, "helper", T0),
            Err(BoardError::Unauthorized)
        );
        assert!(store.get(&ticket.id).unwrap().best_reply_id.is_none());

        assert_eq!(
            store.mark_best_reply(&ticket.id, "nope", "author", T0),
            Err(BoardError::ReplyNotFound)
        );

        let updated = store.mark_best_reply(&ticket.id, &reply.id, "author", T0).unwrap();
        assert_eq!(updated.best_reply_id.as_deref(), Some(reply.id.as_str()));
    }

    #[test]
    fn test_mark_best_reply_rejects_foreign_reply() {
        let mut store = TicketStore::new();
        let a = store.create_ticket("help", "a", "a", "author", T0).unwrap();
        let b = store.create_ticket("help", "b", "b", "author", T0).unwrap();
        let reply_on_b = store.add_reply(&b.id, "hi", "s", T0).unwrap();

        assert_eq!(
            store.mark_best_reply(&a.id, &reply_on_b.id, "author", T0),
            Err(BoardError::ReplyNotFound)
        );
    }

    #[test]
    fn test_best_reply_is_reassignable() {
        // Product decision: the author may change their mind
        let (mut store, ticket) = store_with_ticket();
        let first = store.add_reply(&ticket.id, "first", "h1", T0).unwrap();
        let second = store.add_reply(&ticket.id, "second", "h2", T0).unwrap();

        store.mark_best_reply(&ticket.id, &first.id, "author", T0).unwrap();
        let updated = store.mark_best_reply(&ticket.id, &second.id, "author", T0).unwrap();

        assert_eq!(updated.best_reply_id, Some(second.id));
    }

    #[test]
    fn test_author_actions_rejected_after_expiry() {
        let (mut store, ticket) = store_with_ticket();
        let reply = store.add_reply(&ticket.id, "hi", "helper", T0).unwrap();

        // Past the TTL but not swept yet
        let late = ticket.expires_at;
        assert_eq!(
            store.close_ticket(&ticket.id, "author", late),
            Err(BoardError::Expired)
        );
        assert_eq!(
            store.mark_best_reply(&ticket.id, &reply.id, "author", late),
            Err(BoardError::Expired)
        );

        let stored = store.get(&ticket.id).unwrap();
        assert!(!stored.closed);
        assert!(stored.best_reply_id.is_none());

        // One millisecond earlier both still work
        assert!(store.mark_best_reply(&ticket.id, &reply.id, "author", late - 1).is_ok());
        assert!(store.close_ticket(&ticket.id, "author", late - 1).is_ok());
    }

    #[test]
    fn test_remove_ticket_cascades_and_is_idempotent() {
        let (mut store, ticket) = store_with_ticket();
        store.add_reply(&ticket.id, "one", "s", T0).unwrap();

        let (removed, replies) = store.remove_ticket(&ticket.id).unwrap();
        assert_eq!(removed.id, ticket.id);
        assert_eq!(replies.len(), 1);
        assert!(store.get(&ticket.id).is_none());
        assert!(store.replies(&ticket.id).is_empty());

        assert!(store.remove_ticket(&ticket.id).is_none());
    }

    #[test]
    fn test_due_for_removal() {
        let config = BoardConfig::default().close_grace_period(Duration::from_secs(60));
        let mut store = TicketStore::with_config(config);
        let open = store.create_ticket("help", "open", "b", "a", T0).unwrap();
        let closed = store.create_ticket("help", "closed", "b", "a", T0).unwrap();
        store.close_ticket(&closed.id, "a", T0 + 1_000).unwrap();

        assert!(store.due_for_removal(T0 + 60_999).is_empty());
        assert_eq!(store.due_for_removal(T0 + 61_000), vec![closed.id.clone()]);

        let mut due = store.due_for_removal(open.expires_at);
        due.sort();
        let mut expected = vec![open.id, closed.id];
        expected.sort();
        assert_eq!(due, expected);
    }
}
