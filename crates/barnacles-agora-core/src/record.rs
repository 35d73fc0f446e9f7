//! Outbound Agora sensor records.

use crate::attributes::{mapping_for, wire_number};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Class name Agora files every forwarded record under.
pub const SENSOR_CLASS: &str = "sensor";

/// Separator between device identifier and identifier type in a source name.
pub const SIGNATURE_SEPARATOR: char = '/';

/// One record of the Agora sensor API. The API accepts a batch; we always
/// send a batch of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceData {
    /// `<deviceId>/<deviceIdType>`.
    pub source_name: String,
    pub class_name: String,
    /// Attribute key to converted value, in the order the properties appeared.
    pub attributes: Map<String, Value>,
}

impl SourceData {
    /// Builds the record for a dynamb payload.
    ///
    /// Payloads that are not JSON objects are treated as dynambs without any
    /// properties. The record is built either way.
    pub fn from_dynamb(dynamb: &Value) -> Self {
        let empty = Map::new();
        let properties = dynamb.as_object().unwrap_or(&empty);

        let attributes = properties
            .iter()
            .filter_map(|(property, raw)| {
                mapping_for(property).map(|m| (m.attribute.to_string(), m.apply(raw)))
            })
            .collect();

        Self {
            source_name: source_name(properties),
            class_name: SENSOR_CLASS.to_string(),
            attributes,
        }
    }
}

/// Joins `deviceId` and `deviceIdType` with [`SIGNATURE_SEPARATOR`].
///
/// Neither field is validated: absent fields render as `undefined` and JSON
/// null as `null`, so a malformed dynamb yields e.g. `undefined/undefined`.
pub fn source_name(dynamb: &Map<String, Value>) -> String {
    format!(
        "{}{}{}",
        concat_text(dynamb.get("deviceId")),
        SIGNATURE_SEPARATOR,
        concat_text(dynamb.get("deviceIdType"))
    )
}

fn concat_text(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if n.is_f64() => number_text(f),
            _ => n.to_string(),
        },
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => concat_text(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

fn number_text(f: f64) -> String {
    match wire_number(f) {
        Value::Null if f.is_nan() => "NaN".to_string(),
        Value::Null if f.is_sign_negative() => "-Infinity".to_string(),
        Value::Null => "Infinity".to_string(),
        n => n.to_string(),
    }
}
