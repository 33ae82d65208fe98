//! Inbound frame decoding
//!
//! Frames are JSON objects tagged by a string `type`. Decoding happens in
//! two steps so that an unknown tag and a known tag with a bad payload can
//! be told apart: the tag is checked against the request's closed set of
//! names first, then the whole object is deserialized.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// A closed set of tagged inbound requests
pub trait Request: DeserializeOwned {
    /// Every accepted value of the `type` tag
    const TYPES: &'static [&'static str];
}

/// Why an inbound frame was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Frame is not JSON
    #[error("Invalid JSON payload")]
    InvalidJson,

    /// Frame is JSON but not an object with a string `type`
    #[error("Missing event type")]
    MissingType,

    /// `type` is not one of the known requests
    #[error("Unknown event type")]
    UnknownType(String),

    /// Known `type` but fields are missing or have the wrong shape
    #[error("Invalid payload for {0}")]
    InvalidPayload(String),
}

/// Decode an inbound text frame into a request
pub fn decode<R: Request>(text: &str) -> Result<R, DecodeError> {
    let value: Value = serde_json::from_str(text).map_err(|_| DecodeError::InvalidJson)?;

    let tag = value
        .as_object()
        .and_then(|obj| obj.get("type"))
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingType)?
        .to_string();

    if !R::TYPES.contains(&tag.as_str()) {
        return Err(DecodeError::UnknownType(tag));
    }

    serde_json::from_value(value).map_err(|e| {
        tracing::debug!(kind = %tag, error = %e, "Rejected payload");
        DecodeError::InvalidPayload(tag)
    })
}
