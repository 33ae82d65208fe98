//! Event router
//!
//! Turns one decoded client request into store/registry mutations and the
//! outbound events they imply:
//!
//! | request           | sender          | ticket subscribers | feed           |
//! |-------------------|-----------------|--------------------|----------------|
//! | `list_tickets`    | `tickets`       |                    |                |
//! | `create_ticket`   |                 |                    | `tickets`      |
//! | `join_ticket`     | `ticket_state`  |                    |                |
//! | `leave_ticket`    |                 |                    |                |
//! | `post_reply`      |                 | `new_reply`        | `tickets`      |
//! | `close_ticket`    |                 | `ticket_updated`   | `tickets`      |
//! | `mark_best_reply` |                 | `ticket_updated`   | `tickets`      |
//!
//! Rejections go back to the sender only, as `warn` or `error`.

use super::board::{RemovalReason, TicketBoard};
use crate::board::{BoardError, Millis};
use crate::protocol::{decode, ClientRequest, ServerEvent};
use crate::session::ConnectionId;

impl TicketBoard {
    /// Decode and route one inbound text frame
    pub fn handle_frame(&mut self, conn: ConnectionId, text: &str, now: Millis) {
        match decode::<ClientRequest>(text) {
            Ok(request) => self.handle_request(conn, request, now),
            Err(e) => {
                tracing::debug!(conn = conn, error = %e, "Undecodable frame");
                self.peers.send(conn, &ServerEvent::error(e.to_string()));
            }
        }
    }

    /// Route one decoded request
    pub fn handle_request(&mut self, conn: ConnectionId, request: ClientRequest, now: Millis) {
        let kind = request.kind();

        // Gate before any validation; rejected attempts are not retried
        if request.is_mutating() && !self.limiter.try_acquire(conn, now) {
            self.stats.rate_limited += 1;
            tracing::debug!(conn = conn, request = kind, "Rate limited");
            self.peers
                .send(conn, &ServerEvent::rejected(&BoardError::RateLimited));
            return;
        }

        let result = match request {
            ClientRequest::ListTickets => {
                self.send_ticket_list(conn, now);
                Ok(())
            }
            ClientRequest::CreateTicket {
                category,
                title,
                body,
                author_session_id,
            } => self.create_ticket(&category, &title, &body, &author_session_id, now),
            ClientRequest::JoinTicket { ticket_id } => self.join_ticket(conn, &ticket_id, now),
            ClientRequest::LeaveTicket { ticket_id } => {
                self.subscriptions.unsubscribe(conn, &ticket_id);
                Ok(())
            }
            ClientRequest::PostReply {
                ticket_id,
                text,
                session_id,
            } => self.post_reply(&ticket_id, &text, &session_id, now),
            ClientRequest::CloseTicket {
                ticket_id,
                session_id,
            } => self.close_ticket(&ticket_id, &session_id, now),
            ClientRequest::MarkBestReply {
                ticket_id,
                reply_id,
                session_id,
            } => self.mark_best_reply(&ticket_id, &reply_id, &session_id, now),
        };

        if let Err(err) = result {
            tracing::debug!(conn = conn, request = kind, error = %err, "Request rejected");
            self.peers.send(conn, &ServerEvent::rejected(&err));
        }
    }

    fn create_ticket(
        &mut self,
        category: &str,
        title: &str,
        body: &str,
        author_session_id: &str,
        now: Millis,
    ) -> Result<(), BoardError> {
        let ticket = self
            .store
            .create_ticket(category, title, body, author_session_id, now)?;
        self.stats.tickets_created += 1;

        tracing::info!(ticket = %ticket.id, category = %ticket.category, "Ticket created");

        self.broadcast_ticket_list(now);
        Ok(())
    }

    fn join_ticket(&mut self, conn: ConnectionId, ticket_id: &str, now: Millis) -> Result<(), BoardError> {
        if self.store.get(ticket_id).is_none() {
            return Err(BoardError::TicketNotFound);
        }

        // The sweeper has not caught up with this one yet
        if self.store.is_expired(ticket_id, now) {
            self.remove_ticket(ticket_id, RemovalReason::Expired);
            self.broadcast_ticket_list(now);
            return Err(BoardError::Expired);
        }

        let ticket = self.store.view(ticket_id).ok_or(BoardError::TicketNotFound)?;
        let replies = self.store.replies(ticket_id).to_vec();

        self.subscriptions.subscribe(conn, ticket_id);
        self.peers
            .send(conn, &ServerEvent::TicketState { ticket, replies });
        Ok(())
    }

    fn post_reply(
        &mut self,
        ticket_id: &str,
        text: &str,
        session_id: &str,
        now: Millis,
    ) -> Result<(), BoardError> {
        let reply = self.store.add_reply(ticket_id, text, session_id, now)?;
        self.stats.replies_posted += 1;

        let event = ServerEvent::NewReply {
            ticket_id: ticket_id.to_string(),
            reply,
        };
        let notified = self.notify_subscribers(ticket_id, &event);
        tracing::debug!(ticket = %ticket_id, subscribers = notified, "Reply posted");

        // repliesCount changed
        self.broadcast_ticket_list(now);
        Ok(())
    }

    fn close_ticket(&mut self, ticket_id: &str, session_id: &str, now: Millis) -> Result<(), BoardError> {
        self.store.close_ticket(ticket_id, session_id, now)?;
        tracing::info!(ticket = %ticket_id, "Ticket closed");

        self.publish_ticket_update(ticket_id, now);
        Ok(())
    }

    fn mark_best_reply(
        &mut self,
        ticket_id: &str,
        reply_id: &str,
        session_id: &str,
        now: Millis,
    ) -> Result<(), BoardError> {
        self.store.mark_best_reply(ticket_id, reply_id, session_id, now)?;
        tracing::debug!(ticket = %ticket_id, reply = %reply_id, "Best reply marked");

        self.publish_ticket_update(ticket_id, now);
        Ok(())
    }

    fn publish_ticket_update(&self, ticket_id: &str, now: Millis) {
        if let Some(ticket) = self.store.view(ticket_id) {
            self.notify_subscribers(ticket_id, &ServerEvent::TicketUpdated { ticket });
        }
        self.broadcast_ticket_list(now);
    }
}
