//! WebSocket server
//!
//! ```text
//!                ┌──────────────┐
//!  axum Router → │    Server    │ ── tick ──────────────┐
//!                └──────┬───────┘                       │
//!                       │ upgrade                       ▼
//!                ┌──────▼───────┐   on_frame   ┌─────────────────┐
//!                │  Connection  │ ───────────► │ Mutex<Handler>  │
//!                │ reader/writer│ ◄─── Frame ─ │ (TicketBoard or │
//!                └──────────────┘   mpsc       │   Matchmaker)   │
//!                                              └─────────────────┘
//! ```
//!
//! Requests that are not WebSocket upgrades are answered by the health
//! endpoint on the same port.

pub mod board;
pub mod config;
pub mod connection;
pub mod handler;
pub mod health;
pub mod lifecycle;
pub mod listener;
pub mod router;
pub mod sweeper;

pub use board::{RemovalReason, TicketBoard};
pub use config::ServerConfig;
pub use handler::ConnectionHandler;
pub use listener::Server;
pub use sweeper::SweepReport;
