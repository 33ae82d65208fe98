//! Board error types
//!
//! Every variant is scoped to a single request. The severity decides
//! whether the sender sees a `warn` or an `error` event.

/// How a rejected request is reported back to its sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Transient or expected rejection, reported as `warn`
    Warn,
    /// Bad request, reported as `error`
    Error,
}

/// Error type for board operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Bad shape, length or content
    #[error("{0}")]
    Validation(String),

    /// Session token does not match the ticket author
    #[error("Only the ticket author can do this")]
    Unauthorized,

    /// Unknown ticket id
    #[error("Ticket not found")]
    TicketNotFound,

    /// Ticket outlived its TTL before the sweeper got to it
    #[error("Ticket has expired")]
    Expired,

    /// Reply id does not belong to the ticket
    #[error("Reply not found")]
    ReplyNotFound,

    /// Ticket is already closed
    #[error("Ticket is closed")]
    Closed,

    /// Mutating request arrived too soon after the previous one
    #[error("Too many actions, slow down")]
    RateLimited,
}

impl BoardError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        BoardError::Validation(message.into())
    }

    /// Severity used when reporting this error to the sender
    pub fn severity(&self) -> Severity {
        match self {
            BoardError::Validation(_)
            | BoardError::TicketNotFound
            | BoardError::Expired
            | BoardError::ReplyNotFound => Severity::Error,
            BoardError::Unauthorized | BoardError::Closed | BoardError::RateLimited => {
                Severity::Warn
            }
        }
    }
}
