//! Ephemeral real-time ticket board
//!
//! Anonymous users post short-lived help/feedback tickets, watch them and
//! reply over a single WebSocket connection. Nothing is persisted: tickets
//! live in memory for a fixed TTL and a periodic sweep removes expired and
//! closed ones, notifying everyone who was watching.
//!
//! # Example
//!
//! ```no_run
//! use ticket_board::{Server, ServerConfig, TicketBoard};
//!
//! #[tokio::main]
//! async fn main() -> ticket_board::Result<()> {
//!     let server = Server::new(ServerConfig::default(), TicketBoard::new());
//!     server.run().await
//! }
//! ```
//!
//! The same transport also serves an anonymous one-to-one chat
//! [`matchmaking`] mode.

pub mod board;
pub mod error;
pub mod matchmaking;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod stats;

pub use board::{BoardConfig, BoardError, Category, Reply, Ticket, TicketStore, TicketView};
pub use error::{Error, Result};
pub use matchmaking::{MatchConfig, Matchmaker};
pub use protocol::{ClientRequest, ServerEvent};
pub use registry::SubscriptionRegistry;
pub use server::{ConnectionHandler, RemovalReason, Server, ServerConfig, SweepReport, TicketBoard};
pub use stats::BoardStats;
