//! Cleanup sweeper
//!
//! Runs on a fixed period, independent of client traffic. Removes tickets
//! whose TTL elapsed and closed tickets whose grace period elapsed, using
//! the same removal path as the router. Subscribers of each removed ticket
//! get `ticket_deleted`; the feed gets one refreshed list per sweep, and
//! only if something was removed.

use super::board::{RemovalReason, TicketBoard};
use crate::board::{Millis, TicketId};

/// Outcome of one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Tickets removed by this sweep
    pub removed: Vec<TicketId>,
    /// `ticket_deleted` events queued
    pub notified: usize,
}

impl SweepReport {
    /// Whether the sweep removed anything
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

impl TicketBoard {
    /// Run one sweep at `now`
    pub fn sweep(&mut self, now: Millis) -> SweepReport {
        let mut report = SweepReport::default();

        for ticket_id in self.store.due_for_removal(now) {
            let reason = if self.store.is_expired(&ticket_id, now) {
                RemovalReason::Expired
            } else {
                RemovalReason::Closed
            };

            if let Some(notified) = self.remove_ticket(&ticket_id, reason) {
                report.notified += notified;
                report.removed.push(ticket_id);
            }
        }

        self.stats.sweeps += 1;

        if report.is_empty() {
            tracing::trace!("Sweep removed nothing");
        } else {
            self.broadcast_ticket_list(now);
            tracing::info!(
                removed = report.removed.len(),
                notified = report.notified,
                remaining = self.store.ticket_count(),
                total_removed = self.stats.tickets_removed,
                "Sweep complete"
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::{json, Value};

    use super::*;
    use crate::board::BoardConfig;
    use crate::server::handler::ConnectionHandler;
    use crate::session::{channel, ConnectionId, FrameReceiver};

    const T0: Millis = 1_700_000_000_000;

    fn connect(board: &mut TicketBoard, conn: ConnectionId) -> FrameReceiver {
        let (tx, mut rx) = channel();
        board.on_open(conn, tx, T0);
        drain(&mut rx);
        rx
    }

    fn drain(rx: &mut FrameReceiver) -> Vec<Value> {
        let mut out = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            out.push(frame.to_value());
        }
        out
    }

    fn board() -> TicketBoard {
        TicketBoard::with_config(BoardConfig::default().rate_limit_interval(Duration::ZERO))
    }

    fn create(board: &mut TicketBoard, conn: ConnectionId, title: &str, now: Millis) -> String {
        let request = json!({"type": "create_ticket", "category": "help", "title": title,
                             "body": "body", "authorSessionId": "author"});
        board.handle_frame(conn, &request.to_string(), now);
        board
            .store()
            .list_live(now)
            .into_iter()
            .find(|t| t.ticket.title == title)
            .map(|t| t.ticket.id)
            .unwrap()
    }

    #[test]
    fn test_sweep_nothing_due_sends_nothing() {
        let mut board = board();
        let mut a = connect(&mut board, 1);
        create(&mut board, 1, "fresh", T0);
        drain(&mut a);

        let report = board.sweep(T0 + 60_000);

        assert!(report.is_empty());
        assert!(drain(&mut a).is_empty());
        assert_eq!(board.stats().sweeps, 1);
    }

    #[test]
    fn test_sweep_removes_closed_after_grace() {
        let mut board = board();
        let mut a = connect(&mut board, 1);
        let mut b = connect(&mut board, 2);
        let id = create(&mut board, 1, "closing", T0);
        board.handle_frame(2, &json!({"type": "join_ticket", "ticketId": id}).to_string(), T0);
        board.handle_frame(
            1,
            &json!({"type": "close_ticket", "ticketId": id, "sessionId": "author"}).to_string(),
            T0 + 1_000,
        );
        drain(&mut a);
        drain(&mut b);

        // Inside the grace period
        assert!(board.sweep(T0 + 60_999).is_empty());

        let report = board.sweep(T0 + 61_000);
        assert_eq!(report.removed, vec![id.clone()]);
        assert_eq!(report.notified, 1);

        let b_events = drain(&mut b);
        assert_eq!(b_events[0], json!({"type": "ticket_deleted", "ticketId": id}));
        assert_eq!(b_events[1], json!({"type": "tickets", "tickets": []}));

        let a_events = drain(&mut a);
        assert_eq!(a_events, vec![json!({"type": "tickets", "tickets": []})]);

        assert!(!board.subscriptions().is_subscribed(2, &id));
        assert!(board.subscriptions().is_consistent());
    }

    #[test]
    fn test_sweep_removes_expired() {
        let mut board = board();
        let mut a = connect(&mut board, 1);
        let id = create(&mut board, 1, "old", T0);
        let expires_at = board.store().get(&id).unwrap().expires_at;
        drain(&mut a);

        assert!(board.sweep(expires_at - 1).is_empty());
        let report = board.sweep(expires_at);

        assert_eq!(report.removed, vec![id]);
        assert_eq!(report.notified, 0);
        assert_eq!(drain(&mut a).len(), 1);
        assert_eq!(board.store().ticket_count(), 0);
    }

    #[test]
    fn test_sweep_broadcasts_once_for_many_removals() {
        let mut board = board();
        let mut a = connect(&mut board, 1);
        for i in 0..3 {
            create(&mut board, 1, &format!("ticket {i}"), T0 + i);
        }
        let keep = create(&mut board, 1, "keeper", T0 + 3_600_000);
        drain(&mut a);

        let report = board.sweep(T0 + 6 * 3_600_000 + 10);
        assert_eq!(report.removed.len(), 3);

        let events = drain(&mut a);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["tickets"][0]["id"], keep.as_str());
        assert_eq!(board.stats().tickets_removed, 3);
    }

    #[test]
    fn test_removal_is_idempotent() {
        let mut board = board();
        let mut a = connect(&mut board, 1);
        let id = create(&mut board, 1, "once", T0);
        board.handle_frame(1, &json!({"type": "join_ticket", "ticketId": id}).to_string(), T0);
        drain(&mut a);

        assert_eq!(board.remove_ticket(&id, RemovalReason::Closed), Some(1));
        assert_eq!(board.remove_ticket(&id, RemovalReason::Closed), None);

        let events = drain(&mut a);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["type"], "ticket_deleted");

        // A later sweep has nothing left to do
        assert!(board.sweep(T0 + 7 * 3_600_000).is_empty());
        assert!(drain(&mut a).is_empty());
    }
}
