//! Inbound events as they arrive from the barnacles event bus.
//!
//! An event is a name plus an untyped JSON payload. Only a handful of names
//! mean anything to this adapter; see [`EventType`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// An event published by barnacles, e.g. a `dynamb` sensor reading.
///
/// On the JSON-lines wire each event is one object:
/// `{"name": "dynamb", "data": {"deviceId": "...", ...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InboundEvent {
    /// The event name, e.g. `"dynamb"` or `"raddec"`.
    pub name: String,
    /// The raw payload. Missing payloads deserialize as JSON `null`.
    #[serde(default)]
    pub data: Value,
}

impl InboundEvent {
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// The known event type for this name, if any.
    pub fn event_type(&self) -> Option<EventType> {
        EventType::from_name(&self.name)
    }
}

/// Event types this adapter knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    /// Radio decoding. Reserved, never forwarded.
    Raddec,
    /// Dynamic ambient sensor data.
    Dynamb,
}

impl EventType {
    /// Event types that may be registered for forwarding.
    pub const SUPPORTED: [EventType; 1] = [EventType::Dynamb];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "raddec" => Some(Self::Raddec),
            "dynamb" => Some(Self::Dynamb),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raddec => "raddec",
            Self::Dynamb => "dynamb",
        }
    }

    pub fn is_supported(self) -> bool {
        Self::SUPPORTED.contains(&self)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inbound_event_from_json_line() {
        let line = r#"{"name":"dynamb","data":{"deviceId":"aa:bb","deviceIdType":2,"temperature":21.5}}"#;
        let event: InboundEvent = serde_json::from_str(line).expect("Deserialization failed");

        assert_eq!(event.name, "dynamb");
        assert_eq!(event.event_type(), Some(EventType::Dynamb));
        assert_eq!(event.data["temperature"], json!(21.5));
    }

    #[test]
    fn inbound_event_without_data_is_null() {
        let event: InboundEvent =
            serde_json::from_str(r#"{"name":"raddec"}"#).expect("Deserialization failed");
        assert_eq!(event.data, Value::Null);
        assert_eq!(event.event_type(), Some(EventType::Raddec));
    }

    #[test]
    fn only_dynamb_is_supported() {
        assert!(EventType::Dynamb.is_supported());
        assert!(!EventType::Raddec.is_supported());
        assert_eq!(EventType::from_name("spatem"), None);
        assert_eq!(EventType::Dynamb.to_string(), "dynamb");
    }
}
