//! Ticket entity store
//!
//! Tickets and replies live here and nowhere else. The store knows nothing
//! about connections: fan-out is decided by the router using the
//! subscription registry.
//!
//! # Lifecycle
//!
//! ```text
//!   create_ticket ──► open ──close_ticket──► closed
//!                      │                       │
//!                      │ now >= expiresAt      │ now - closedAt >= grace
//!                      ▼                       ▼
//!                   remove_ticket (cascades replies)
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod store;
pub mod ticket;

pub use clock::{now_ms, Millis};
pub use config::BoardConfig;
pub use error::{BoardError, Severity};
pub use store::TicketStore;
pub use ticket::{Category, Reply, ReplyId, Ticket, TicketId, TicketView};
