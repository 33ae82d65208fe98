//! Anonymous one-to-one matchmaking
//!
//! A companion mode served by the same transport as the ticket board.
//! Connections queue up with `find`, get paired first come first served,
//! and relay chat lines to their partner until either side leaves.
//!
//! ```text
//!          find (queue empty)          find (someone waiting)
//!   Idle ─────────────────────► Searching ─────────────────► Paired
//!    ▲         cancel_find          │                          │
//!    └──────────────────────────────┘                          │
//!    └──────────── disconnect / report / partner left ─────────┘
//! ```

pub mod config;
pub mod message;
pub mod queue;

pub use config::MatchConfig;
pub use message::{DisconnectReason, MatchEvent, MatchRequest, MatchStatus};
pub use queue::{MatchState, Matchmaker};
