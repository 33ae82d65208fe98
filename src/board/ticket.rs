//! Ticket and reply types
//!
//! These are both the stored entities and their wire representation
//! (camelCase JSON). `TicketView` adds the derived `repliesCount`.

use serde::Serialize;

use super::clock::Millis;
use super::error::BoardError;

/// Unique ticket identifier
pub type TicketId = String;

/// Unique reply identifier
pub type ReplyId = String;

/// Ticket category, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Request for help
    Help,
    /// Feedback
    Feedback,
}

impl Category {
    /// Parse a category from its wire name
    pub fn parse(s: &str) -> Result<Self, BoardError> {
        match s {
            "help" => Ok(Category::Help),
            "feedback" => Ok(Category::Feedback),
            _ => Err(BoardError::validation("Unknown category")),
        }
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Help => "help",
            Category::Feedback => "feedback",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ticket on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub category: Category,
    pub title: String,
    pub body: String,
    /// Sole credential for closing and best-reply marking
    pub author_session_id: String,
    pub created_at: Millis,
    /// `created_at + TTL`, never renewed
    pub expires_at: Millis,
    pub closed: bool,
    /// Set together with `closed`, never reset
    pub closed_at: Option<Millis>,
    /// Always references a reply currently stored for this ticket
    pub best_reply_id: Option<ReplyId>,
}

impl Ticket {
    /// Whether `session_id` is the author's token
    pub fn is_author(&self, session_id: &str) -> bool {
        self.author_session_id == session_id
    }
}

/// A reply to a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: ReplyId,
    pub ticket_id: TicketId,
    pub text: String,
    pub session_id: String,
    pub created_at: Millis,
}

/// Public view of a ticket with its derived reply count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    #[serde(flatten)]
    pub ticket: Ticket,
    /// Live reply count at view construction time
    pub replies_count: usize,
}

impl TicketView {
    /// Build a view from a ticket and its current reply count
    pub fn new(ticket: &Ticket, replies_count: usize) -> Self {
        Self {
            ticket: ticket.clone(),
            replies_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> Ticket {
        Ticket {
            id: "t1".into(),
            category: Category::Help,
            title: "Need help".into(),
            body: "Stuck on step 2".into(),
            author_session_id: "sess_a".into(),
            created_at: 1_000,
            expires_at: 2_000,
            closed: false,
            closed_at: None,
            best_reply_id: None,
        }
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("help"), Ok(Category::Help));
        assert_eq!(Category::parse("feedback"), Ok(Category::Feedback));
        assert!(Category::parse("HELP").is_err());
        assert!(Category::parse("").is_err());
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let view = TicketView::new(&ticket(), 3);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["id"], "t1");
        assert_eq!(json["category"], "help");
        assert_eq!(json["authorSessionId"], "sess_a");
        assert_eq!(json["createdAt"], 1_000);
        assert_eq!(json["expiresAt"], 2_000);
        assert_eq!(json["closed"], false);
        assert!(json["closedAt"].is_null());
        assert!(json["bestReplyId"].is_null());
        assert_eq!(json["repliesCount"], 3);
    }

    #[test]
    fn test_is_author() {
        let t = ticket();
        assert!(t.is_author("sess_a"));
        assert!(!t.is_author("sess_b"));
    }
}
