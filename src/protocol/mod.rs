//! Wire protocol
//!
//! JSON objects over WebSocket text frames, one event per frame, tagged by
//! a string `type` field.

pub mod decode;
pub mod frame;
pub mod message;

pub use decode::{decode, DecodeError, Request};
pub use frame::Frame;
pub use message::{ClientRequest, ServerEvent};
