//! Forwarding configuration and the registry of events to store.
//!
//! [`AgoraOptions`] is the loose, JSON-shaped input (the same shape a config
//! file uses). [`Config`] is the validated, immutable result: a parsed target,
//! the derived HTTPS endpoint, the error-printing flag and the event registry.

use crate::error::{AgoraError, Result};
use barnacles_agora_core::EventType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use url::Url;

/// Options as supplied by the caller or a config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgoraOptions {
    /// Webhook URL. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Print delivery errors instead of discarding them. Defaults to `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_errors: Option<bool>,
    /// Event type name to sub-options. Absent means `{ "dynamb": {} }`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_to_store: Option<Map<String, Value>>,
}

impl AgoraOptions {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn print_errors(mut self, print_errors: bool) -> Self {
        self.print_errors = Some(print_errors);
        self
    }

    pub fn events_to_store(mut self, events: Map<String, Value>) -> Self {
        self.events_to_store = Some(events);
        self
    }
}

/// Sub-options of a registered event type.
///
/// Nothing reads these yet. Whatever object the caller supplied is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventOptions {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventOptions {
    pub fn default_for(_event: EventType) -> Self {
        Self::default()
    }

    /// Supplied options, or the defaults when the supplied value is not a
    /// non-empty object (`null`, `false`, `0`, `""`, `{}`, ...).
    fn from_supplied(event: EventType, supplied: &Value) -> Self {
        match supplied {
            Value::Object(extra) if !extra.is_empty() => Self {
                extra: extra.clone(),
            },
            _ => Self::default_for(event),
        }
    }
}

/// Registry used when the options do not name any events.
pub fn default_events_to_store() -> BTreeMap<EventType, EventOptions> {
    BTreeMap::from([(EventType::Dynamb, EventOptions::default_for(EventType::Dynamb))])
}

/// Validated forwarding configuration.
#[derive(Debug, Clone)]
pub struct Config {
    target: Url,
    endpoint: Url,
    print_errors: bool,
    events_to_store: BTreeMap<EventType, EventOptions>,
}

impl Config {
    /// Validates `options`. Fails when the target is missing, unparseable or
    /// has no host. Unsupported event names are dropped silently.
    pub fn from_options(options: AgoraOptions) -> Result<Self> {
        let target = options.target.as_deref().ok_or(AgoraError::MissingTarget)?;
        let target = Url::parse(target)?;
        let endpoint = delivery_endpoint(&target)?;

        let events_to_store = match options.events_to_store {
            None => default_events_to_store(),
            Some(supplied) => supplied
                .iter()
                .filter_map(|(name, value)| {
                    EventType::from_name(name)
                        .filter(|event| event.is_supported())
                        .map(|event| (event, EventOptions::from_supplied(event, value)))
                })
                .collect(),
        };

        Ok(Self {
            target,
            endpoint,
            print_errors: options.print_errors.unwrap_or(false),
            events_to_store,
        })
    }

    /// The target exactly as configured.
    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Where requests actually go: HTTPS to the target's host, port and path.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn print_errors(&self) -> bool {
        self.print_errors
    }

    pub fn events_to_store(&self) -> &BTreeMap<EventType, EventOptions> {
        &self.events_to_store
    }

    /// Whether events called `name` are acted upon.
    pub fn is_event_to_store(&self, name: &str) -> bool {
        EventType::from_name(name).is_some_and(|event| self.events_to_store.contains_key(&event))
    }

    pub fn event_options(&self, event: EventType) -> Option<&EventOptions> {
        self.events_to_store.get(&event)
    }
}

impl TryFrom<AgoraOptions> for Config {
    type Error = AgoraError;

    fn try_from(options: AgoraOptions) -> Result<Self> {
        Self::from_options(options)
    }
}

/// Requests always go over HTTPS, whatever scheme the target names. The
/// query string and fragment are not part of the endpoint.
fn delivery_endpoint(target: &Url) -> Result<Url> {
    let host = target
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| AgoraError::TargetWithoutHost(target.to_string()))?;
    let port = target.port().map(|p| format!(":{p}")).unwrap_or_default();
    let path = match target.path() {
        "" => "/",
        path => path,
    };

    Ok(Url::parse(&format!("https://{host}{port}{path}"))?)
}
