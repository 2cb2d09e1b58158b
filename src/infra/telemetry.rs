//! Outbound telemetry client implementing the `TelemetrySink` port.
//!
//! HTTP+JSON transport with a per-request timeout taken from configuration.
//! The collector's wire schema beyond "batch plus auth" is out of scope.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;

use crate::application::ports::TelemetrySink;
use crate::domain::config::ServerConfig;
use crate::domain::telemetry::{AuthContext, CommandRecord, ProcessRecord};

/// HTTP client for the collector service.
pub struct HttpTelemetryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTelemetryClient {
    /// Build a client with the configured endpoint and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(cfg: &ServerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building telemetry HTTP client")?;
        Ok(Self {
            http,
            base_url: cfg.address.trim_end_matches('/').to_string(),
        })
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<()> {
        let url = format!("{}{path}", self.base_url);
        self.http
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("sending request to {url}"))?
            .error_for_status()
            .with_context(|| format!("collector rejected request to {url}"))?;
        Ok(())
    }
}

impl TelemetrySink for HttpTelemetryClient {
    async fn send_commands(&self, commands: &[CommandRecord], auth: &AuthContext) -> Result<()> {
        tracing::debug!(count = commands.len(), "sending commands");
        self.post(
            "/api/v1/commands",
            json!({ "commands": commands, "auth": auth }),
        )
        .await
    }

    async fn send_processes(&self, processes: &[ProcessRecord], auth: &AuthContext) -> Result<()> {
        tracing::debug!(count = processes.len(), "sending processes");
        self.post(
            "/api/v1/processes",
            json!({ "processes": processes, "auth": auth }),
        )
        .await
    }
}
