//! Outbound frames
//!
//! An event is serialized once into a `Frame`; fan-out clones the frame,
//! which only bumps the reference count of the underlying `Bytes`.

use bytes::Bytes;
use serde::Serialize;

/// A serialized outbound JSON event
///
/// This is designed to be cheap to clone due to `Bytes` reference counting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: Bytes,
}

impl Frame {
    /// Serialize an event into a frame
    pub fn encode<T: Serialize>(event: &T) -> Result<Self, serde_json::Error> {
        let data = serde_json::to_vec(event)?;
        Ok(Self {
            data: Bytes::from(data),
        })
    }

    #[cfg(test)]
    pub(crate) fn bytes(&self) -> &Bytes {
        &self.data
    }

    /// JSON text of the frame
    pub fn as_str(&self) -> &str {
        // serde_json only ever produces UTF-8
        std::str::from_utf8(&self.data).unwrap_or_default()
    }

    /// Parse the frame back into a JSON value
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::from_slice(&self.data).unwrap_or(serde_json::Value::Null)
    }
}
