//! Subscription registry for ticket fan-out
//!
//! The registry tracks which live connections watch which ticket, and which
//! connections receive the global ticket list (the feed).
//!
//! # Architecture
//!
//! ```text
//!              SubscriptionRegistry
//!     ┌──────────────────────────────────────┐
//!     │ by_connection: conn → {ticket ids}   │◄── unsubscribe_all (teardown)
//!     │ by_ticket:     ticket → {conns}      │◄── subscribers_of (fan-out)
//!     │ feed:          {conns}               │◄── feed_members (list refresh)
//!     └──────────────────────────────────────┘
//! ```
//!
//! The two ticket indices always mirror each other. The feed is a separate
//! topic so that list refreshes and per-ticket updates can be scoped
//! independently.

pub mod store;

pub use store::SubscriptionRegistry;
