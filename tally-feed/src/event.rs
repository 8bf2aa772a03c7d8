//! Named-event envelope codec.
//!
//! The feed speaks named, loosely-typed events: each frame is a JSON
//! envelope `{ "event": <name>, "data": <payload> }`. There is no protocol
//! beyond the event names; payload typing is the subscriber's concern.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tally_core::error::DataError;

/// Event names forming the wire contract with the feed server.
pub mod events {
    /// Outbound request for a fresh global summary.
    pub const GET_GLOBAL_SUMMARY: &str = "get-global-summary";
    /// Inbound global vote summary.
    pub const GLOBAL_VOTE_SUMMARY: &str = "global vote summary";
    /// Outbound partial tally update from the editable counter.
    pub const VOTE_UPDATE: &str = "vote update";
    /// Bidirectional incident broadcast.
    pub const INCIDENT_UPDATE: &str = "incident update";
    /// Outbound region selection from the map.
    pub const DEPARTMENT_CLICK: &str = "departmentClick";
    /// Inbound per-region tally.
    pub const LOCATION: &str = "location";
}

/// A single named event on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Event name.
    pub event: String,
    /// Loosely-typed payload; `null` for bare requests.
    #[serde(default)]
    pub data: Value,
}

impl EventEnvelope {
    /// Creates an envelope with a payload.
    #[must_use]
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Creates a payload-less request envelope.
    #[must_use]
    pub fn request(event: impl Into<String>) -> Self {
        Self::new(event, Value::Null)
    }

    /// Encodes the envelope as a JSON text frame.
    pub fn encode(&self) -> Result<String, DataError> {
        serde_json::to_string(self).map_err(|e| DataError::DecodeFailed {
            context: "envelope encode".to_string(),
            reason: e.to_string(),
        })
    }

    /// Decodes a JSON text frame into an envelope.
    pub fn decode(text: &str) -> Result<Self, DataError> {
        serde_json::from_str(text).map_err(|e| DataError::DecodeFailed {
            context: "envelope".to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roundtrip() {
        let envelope = EventEnvelope::new(
            events::GLOBAL_VOTE_SUMMARY,
            json!({"totalVotes": 2847593, "partyBreakdown": []}),
        );
        let text = envelope.encode().unwrap();
        let parsed = EventEnvelope::decode(&text).unwrap();
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn test_request_has_null_data() {
        let envelope = EventEnvelope::request(events::GET_GLOBAL_SUMMARY);
        let text = envelope.encode().unwrap();
        assert!(text.contains("get-global-summary"));

        let parsed = EventEnvelope::decode(&text).unwrap();
        assert!(parsed.data.is_null());
    }

    #[test]
    fn test_missing_data_defaults_to_null() {
        let parsed = EventEnvelope::decode(r#"{"event":"location"}"#).unwrap();
        assert_eq!(parsed.event, "location");
        assert!(parsed.data.is_null());
    }

    #[test]
    fn test_decode_error() {
        assert!(EventEnvelope::decode("not json").is_err());
        assert!(EventEnvelope::decode(r#"{"data": 1}"#).is_err());
    }
}
