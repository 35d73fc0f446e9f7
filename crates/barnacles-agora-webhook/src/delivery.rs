//! HTTPS delivery of Agora records.
//!
//! Requests are fire-and-forget: they run as spawned tokio tasks, the
//! response is never read, and failures are either printed or dropped.

use crate::error::{AgoraError, Result};
use barnacles_agora_core::SourceData;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Request};
use std::io::{self, Write};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use url::Url;

/// Posts record batches to one Agora endpoint.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    endpoint: Url,
    print_errors: bool,
}

impl WebhookClient {
    pub fn new(endpoint: Url, print_errors: bool) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint,
            print_errors,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Builds the POST request for `records` without sending it.
    pub fn build_request(&self, records: &[SourceData]) -> Result<Request> {
        let body = serde_json::to_string(records)?;
        let request = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, body.len())
            .body(body)
            .build()?;
        Ok(request)
    }

    /// Starts delivering `records` in the background.
    ///
    /// Returns `None` when no request could be started. The returned task
    /// never fails; dropping its handle leaves the request running.
    pub fn post(&self, records: &[SourceData]) -> Option<JoinHandle<()>> {
        let request = match self.build_request(records) {
            Ok(request) => request,
            Err(err) => {
                report(self.print_errors, &self.endpoint, &err);
                return None;
            }
        };

        let Ok(runtime) = Handle::try_current() else {
            report(self.print_errors, &self.endpoint, &AgoraError::NoRuntime);
            return None;
        };

        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let print_errors = self.print_errors;

        Some(runtime.spawn(async move {
            if let Err(err) = client.execute(request).await {
                report(print_errors, &endpoint, &AgoraError::from(err));
            }
        }))
    }
}

fn report(print_errors: bool, endpoint: &Url, err: &AgoraError) {
    report_to(&mut io::stderr().lock(), print_errors, endpoint, err);
}

/// Surfaces a delivery error when printing is on. With `telemetry` and an
/// installed subscriber it becomes a `warn!` event; otherwise it is written
/// to `out`.
fn report_to<W: Write>(out: &mut W, print_errors: bool, endpoint: &Url, err: &AgoraError) {
    if !print_errors {
        return;
    }

    #[cfg(feature = "telemetry")]
    {
        if tracing::dispatcher::has_been_set() {
            tracing::warn!(endpoint = %endpoint, error = %err, "agora delivery failed");
            return;
        }
    }

    let _ = writeln!(out, "agora delivery to {endpoint} failed: {err}");
}
