//! HTTP transform client with synthetic fallback

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use fiterior_config::{
    Config, DEFAULT_ENDPOINT, DEFAULT_FALLBACK_DELAY_MS, DEFAULT_TIMEOUT_MS,
};
use fiterior_utils::error::TransformError;

use crate::http_client::{Exchange, HttpClient, redact_error_message};
use crate::job_id::next_job_id;
use crate::types::{
    FallbackReason, TransformBackend, TransformOutcome, TransformRequest, TransformResponse,
};

/// Where and how patiently the client talks to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub endpoint: String,
    /// Hard limit on the whole HTTP exchange
    pub timeout: Duration,
    /// Extra latency before a fallback response resolves
    pub fallback_delay: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            fallback_delay: Duration::from_millis(DEFAULT_FALLBACK_DELAY_MS),
        }
    }
}

impl ClientSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            endpoint: config.endpoint().to_string(),
            timeout: config.request_timeout(),
            fallback_delay: config.fallback_delay(),
        }
    }

    /// Worst-case time for one call to resolve.
    #[must_use]
    pub fn max_resolution_time(&self) -> Duration {
        self.timeout + self.fallback_delay
    }
}

/// Submits transform requests over HTTP.
///
/// One POST per call, no internal retries. A non-2xx status, a transport
/// failure or a timeout resolves, after `fallback_delay`, to a synthetic
/// response whose result is the original photo. Only a 2xx body that does not
/// parse as a [`TransformResponse`] is reported as an error.
#[derive(Clone)]
pub struct TransformClient {
    http: HttpClient,
    settings: ClientSettings,
}

impl TransformClient {
    /// # Errors
    ///
    /// Returns `TransformError::ClientBuild` if the HTTP client cannot be constructed
    pub fn new(settings: ClientSettings) -> Result<Self, TransformError> {
        Ok(Self {
            http: HttpClient::new()?,
            settings,
        })
    }

    /// # Errors
    ///
    /// Returns `TransformError::ClientBuild` if the HTTP client cannot be constructed
    pub fn from_config(config: &Config) -> Result<Self, TransformError> {
        Self::new(ClientSettings::from_config(config))
    }

    #[must_use]
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    async fn fallback(&self, request: &TransformRequest, reason: FallbackReason) -> TransformOutcome {
        tokio::time::sleep(self.settings.fallback_delay).await;
        TransformOutcome::Fallback {
            response: TransformResponse::fallback_for(request, next_job_id()),
            reason,
        }
    }

    fn malformed(&self, reason: String) -> TransformError {
        TransformError::MalformedResponse {
            endpoint: redact_error_message(&self.settings.endpoint),
            reason,
        }
    }
}

#[async_trait]
impl TransformBackend for TransformClient {
    async fn transform(
        &self,
        request: &TransformRequest,
    ) -> Result<TransformOutcome, TransformError> {
        let started = Instant::now();
        let exchange = self
            .http
            .post_json(&self.settings.endpoint, request, self.settings.timeout)
            .await;

        match exchange {
            Ok(Exchange::Unreadable(reason)) => Err(self.malformed(reason)),
            Ok(Exchange::Body(body)) => {
                let response: TransformResponse = serde_json::from_slice(&body)
                    .map_err(|e| self.malformed(e.to_string()))?;
                debug!(
                    job_id = %response.job_id,
                    elapsed_ms = %started.elapsed().as_millis(),
                    "Transform request succeeded"
                );
                Ok(TransformOutcome::Delivered(response))
            }
            Err(reason) => {
                warn!(
                    reason = %reason,
                    elapsed_ms = %started.elapsed().as_millis(),
                    fallback_delay_ms = %self.settings.fallback_delay.as_millis(),
                    "Transform request failed, answering with fallback"
                );
                Ok(self.fallback(request, reason).await)
            }
        }
    }
}
