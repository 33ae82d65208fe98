//! Ticket board wire messages
//!
//! Inbound requests and outbound events as closed tagged unions. Field
//! names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use super::decode::Request;
use crate::board::{BoardError, Reply, Severity, TicketView};

/// Request sent by a client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientRequest {
    /// Ask for the live ticket list
    ListTickets,

    /// Post a new ticket
    #[serde(rename_all = "camelCase")]
    CreateTicket {
        category: String,
        title: String,
        body: String,
        author_session_id: String,
    },

    /// Start watching a ticket
    #[serde(rename_all = "camelCase")]
    JoinTicket { ticket_id: String },

    /// Stop watching a ticket
    #[serde(rename_all = "camelCase")]
    LeaveTicket { ticket_id: String },

    /// Reply to a ticket
    #[serde(rename_all = "camelCase")]
    PostReply {
        ticket_id: String,
        text: String,
        session_id: String,
    },

    /// Close a ticket (author only)
    #[serde(rename_all = "camelCase")]
    CloseTicket {
        ticket_id: String,
        session_id: String,
    },

    /// Mark a reply as the best one (author only)
    #[serde(rename_all = "camelCase")]
    MarkBestReply {
        ticket_id: String,
        reply_id: String,
        session_id: String,
    },
}

impl Request for ClientRequest {
    const TYPES: &'static [&'static str] = &[
        "list_tickets",
        "create_ticket",
        "join_ticket",
        "leave_ticket",
        "post_reply",
        "close_ticket",
        "mark_best_reply",
    ];
}

impl ClientRequest {
    /// Whether this request mutates the board and is subject to rate limiting
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            ClientRequest::CreateTicket { .. }
                | ClientRequest::PostReply { .. }
                | ClientRequest::CloseTicket { .. }
                | ClientRequest::MarkBestReply { .. }
        )
    }

    /// Wire name of the request
    pub fn kind(&self) -> &'static str {
        match self {
            ClientRequest::ListTickets => "list_tickets",
            ClientRequest::CreateTicket { .. } => "create_ticket",
            ClientRequest::JoinTicket { .. } => "join_ticket",
            ClientRequest::LeaveTicket { .. } => "leave_ticket",
            ClientRequest::PostReply { .. } => "post_reply",
            ClientRequest::CloseTicket { .. } => "close_ticket",
            ClientRequest::MarkBestReply { .. } => "mark_best_reply",
        }
    }
}

/// Event sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Full live ticket list, newest first
    Tickets { tickets: Vec<TicketView> },

    /// Full state of a joined ticket
    TicketState {
        ticket: TicketView,
        replies: Vec<Reply>,
    },

    /// A reply was posted to a watched ticket
    #[serde(rename_all = "camelCase")]
    NewReply { ticket_id: String, reply: Reply },

    /// A watched ticket was closed or got a best reply
    TicketUpdated { ticket: TicketView },

    /// A watched ticket was removed
    #[serde(rename_all = "camelCase")]
    TicketDeleted { ticket_id: String },

    /// Transient rejection
    Warn { message: String },

    /// Bad request
    Error { message: String },
}

impl ServerEvent {
    /// Create a `warn` event
    pub fn warn(message: impl Into<String>) -> Self {
        ServerEvent::Warn {
            message: message.into(),
        }
    }

    /// Create an `error` event
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }

    /// Report a rejected request with the severity of its error
    pub fn rejected(err: &BoardError) -> Self {
        match err.severity() {
            Severity::Warn => Self::warn(err.to_string()),
            Severity::Error => Self::error(err.to_string()),
        }
    }
}
