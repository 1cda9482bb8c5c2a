//! Remote decision delegate
//!
//! When a remote endpoint is configured, the engine first offers the
//! collected signals to it. The endpoint must return a complete decision;
//! anything less and the local engine takes over.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::persona::Persona;
use crate::signal::Signal;

use super::decision::Decision;

// ─────────────────────────────────────────────────────────────────
// Remote Delegate
// ─────────────────────────────────────────────────────────────────

/// Request body sent to the remote endpoint.
#[derive(Debug, Serialize)]
struct RemoteRequest<'a> {
    signals: &'a [Signal],
    templates: Vec<&'static str>,
}

/// HTTP client for a remote decision endpoint.
pub struct RemoteDelegate {
    endpoint: String,
    client: Client,
}

impl RemoteDelegate {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        let endpoint = endpoint.into();
        info!(endpoint = %endpoint, "Remote decision delegate configured");

        Self { endpoint, client }
    }

    /// POST the signals and ask for a decision. Any transport, status, or
    /// shape failure is an error; the caller falls back to local scoring.
    pub async fn decide(&self, signals: &[Signal]) -> Result<Decision> {
        let body = RemoteRequest {
            signals,
            templates: Persona::all().iter().map(|p| p.slug()).collect(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::RemoteRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::RemoteStatus(status.as_u16()));
        }

        let decision: Decision = response
            .json()
            .await
            .map_err(|e| Error::RemoteMalformed(e.to_string()))?;

        debug!(
            persona = %decision.persona,
            confidence = decision.confidence,
            "Remote endpoint returned a decision"
        );
        Ok(decision)
    }
}
