#![warn(clippy::unwrap_used, clippy::expect_used)]

//! Forwards barnacles events to an Agora webhook.
//!
//! [`BarnaclesAgora`] is handed every event barnacles publishes. Registered
//! `dynamb` events are converted into an Agora sensor record and POSTed to the
//! configured target in the background; everything else is ignored.
//!
//! ```no_run
//! use barnacles_agora_webhook::{AgoraOptions, BarnaclesAgora};
//! use serde_json::json;
//!
//! # async fn run() -> barnacles_agora_webhook::Result<()> {
//! let agora = BarnaclesAgora::new(AgoraOptions::new("https://agora.example.com/api/sensors"))?;
//! agora.handle_event("dynamb", &json!({"deviceId": "aa:bb", "deviceIdType": 2, "temperature": 21.5}));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod delivery;
mod error;
mod forwarder;

pub use config::{default_events_to_store, AgoraOptions, Config, EventOptions};
pub use delivery::WebhookClient;
pub use error::{AgoraError, Result};
pub use forwarder::BarnaclesAgora;
