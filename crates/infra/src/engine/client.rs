//! HTTP client for the external simulation engine.
//!
//! The engine owns all simulation, optimization, and financial modelling
//! math; this client forwards JSON payloads and relays the responses as
//! opaque `serde_json::Value`s. Transient failures (connect errors, 5xx)
//! are retried with exponential backoff.

use std::time::Duration;

use reqwest::Client as ReqwestClient;
use serde::Serialize;
use sunquote_domain::types::{FinancialModelRequest, SimulationRequest};
use sunquote_domain::{EngineConfig, Result, SunquoteError};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// Client for the external simulation engine.
#[derive(Clone)]
pub struct EngineClient {
    client: ReqwestClient,
    base_url: Option<String>,
    max_attempts: usize,
    base_backoff: Duration,
}

impl EngineClient {
    /// Build a client from the engine section of the application config.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        EngineClientBuilder::default()
            .base_url(config.base_url.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
    }

    /// Start building a client with explicit settings.
    pub fn builder() -> EngineClientBuilder {
        EngineClientBuilder::default()
    }

    /// Whether an engine URL is configured.
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Run a full simulation against a demand series.
    pub async fn simulate(&self, request: &SimulationRequest) -> Result<serde_json::Value> {
        self.post_json("/simulate", request).await
    }

    /// Ask the engine for an optimized system for a demand series.
    pub async fn optimize(&self, request: &SimulationRequest) -> Result<serde_json::Value> {
        self.post_json("/optimize", request).await
    }

    /// Run the financial model for a system.
    pub async fn financial_model(
        &self,
        request: &FinancialModelRequest,
    ) -> Result<serde_json::Value> {
        self.post_json("/financial_model", request).await
    }

    /// Check engine reachability; used by the API health endpoint.
    pub async fn ping(&self) -> Result<()> {
        let base = self.require_base_url()?;
        let url = format!("{base}/health");
        self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| SunquoteError::from(InfraError::from(e)))?
            .error_for_status()
            .map_err(|e| SunquoteError::from(InfraError::from(e)))?;
        Ok(())
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<serde_json::Value> {
        let base = self.require_base_url()?;
        let url = format!("{base}{path}");
        let attempts = self.max_attempts.max(1);

        for attempt in 1..=attempts {
            debug!(%url, attempt, "engine request");
            match self.client.post(&url).json(body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_server_error() && attempt < attempts {
                        warn!(%url, %status, attempt, "engine returned server error, retrying");
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }
                    let response = response
                        .error_for_status()
                        .map_err(|e| SunquoteError::from(InfraError::from(e)))?;
                    return response
                        .json::<serde_json::Value>()
                        .await
                        .map_err(|e| SunquoteError::from(InfraError::from(e)));
                }
                Err(err) => {
                    if attempt < attempts && (err.is_connect() || err.is_timeout()) {
                        warn!(%url, error = %err, attempt, "engine request failed, retrying");
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }
                    return Err(SunquoteError::from(InfraError::from(err)));
                }
            }
        }

        Err(SunquoteError::Internal(
            "engine client exhausted retries without producing a result".into(),
        ))
    }

    fn require_base_url(&self) -> Result<&str> {
        self.base_url.as_deref().ok_or_else(|| {
            SunquoteError::EngineUnavailable("no simulation engine URL configured".into())
        })
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let shift = u32::try_from(retry_number.saturating_sub(1).min(8)).unwrap_or(8);
        let delay = self.base_backoff.saturating_mul(1 << shift);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`EngineClient`].
#[derive(Debug)]
pub struct EngineClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
}

impl Default for EngineClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
        }
    }
}

impl EngineClientBuilder {
    pub fn base_url(mut self, base_url: Option<String>) -> Self {
        // Trailing slash would double up when paths are appended.
        self.base_url = base_url.map(|url| url.trim_end_matches('/').to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn build(self) -> Result<EngineClient> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .no_proxy()
            .build()
            .map_err(|e| SunquoteError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(EngineClient {
            client,
            base_url: self.base_url,
            max_attempts: self.max_attempts,
            base_backoff: self.base_backoff,
        })
    }
}
