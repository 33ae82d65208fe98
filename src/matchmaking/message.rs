//! Matchmaking wire messages

use serde::{Deserialize, Serialize};

use crate::protocol::Request;

/// Request sent by a matchmaking client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchRequest {
    /// Look for a partner
    Find,
    /// Stop looking
    CancelFind,
    /// Relay a chat line to the partner
    Message { text: String },
    /// Leave the current pair
    Disconnect,
    /// Leave the current pair and flag the partner
    Report,
}

impl Request for MatchRequest {
    const TYPES: &'static [&'static str] = &["find", "cancel_find", "message", "disconnect", "report"];
}

/// Searching state reported to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Idle,
    Searching,
}

/// Why a pair was broken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectReason {
    Disconnected,
    Reported,
}

/// Event sent to a matchmaking client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    Status { status: MatchStatus },
    Matched,
    Message { text: String },
    Disconnected { reason: DisconnectReason },
    Error { message: String },
}
