use crate::config::{AgoraOptions, Config};
use crate::delivery::WebhookClient;
use crate::error::Result;
use barnacles_agora_core::{EventType, SourceData};
use serde_json::Value;
use tokio::task::JoinHandle;

/// Forwards barnacles events to Agora.
///
/// Construction is the only fallible step. Handling an event never fails:
/// it either does nothing or starts one background POST.
#[derive(Debug, Clone)]
pub struct BarnaclesAgora {
    config: Config,
    webhook: WebhookClient,
}

impl BarnaclesAgora {
    pub fn new(options: AgoraOptions) -> Result<Self> {
        Self::with_config(Config::from_options(options)?)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let webhook = WebhookClient::new(config.endpoint().clone(), config.print_errors())?;
        Ok(Self { config, webhook })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handles an event published by barnacles.
    ///
    /// Only registered events are acted upon, and of those only `dynamb`
    /// results in a request. Returns the delivery task when one was started.
    pub fn handle_event(&self, name: &str, data: &Value) -> Option<JoinHandle<()>> {
        if !self.config.is_event_to_store(name) {
            #[cfg(feature = "telemetry")]
            tracing::debug!(event = name, "ignoring event");
            return None;
        }

        match EventType::from_name(name)? {
            EventType::Raddec => None,
            EventType::Dynamb => self.handle_dynamb(data),
        }
    }

    /// Raddecs are not forwarded. Kept so older publishers still link.
    #[deprecated(note = "raddecs are never forwarded; publish through `handle_event`")]
    pub fn handle_raddec(&self, _raddec: &Value) {}

    fn handle_dynamb(&self, dynamb: &Value) -> Option<JoinHandle<()>> {
        let record = SourceData::from_dynamb(dynamb);

        #[cfg(feature = "telemetry")]
        tracing::debug!(
            source = %record.source_name,
            attributes = record.attributes.len(),
            "forwarding dynamb"
        );

        self.webhook.post(&[record])
    }
}
