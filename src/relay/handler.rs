use super::types::{InboundInvocation, RelayResponse, TEXT_PLAIN};
use crate::{
    Error, Result,
    config::Config,
    inference::{InferenceEndpoint, InferenceOutcome},
};
use std::{sync::Arc, time::Duration};
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

pub const MISSING_REVIEW_MESSAGE: &str = "Review text is required";
pub const INVALID_ENCODING_MESSAGE: &str = "Review text must be valid UTF-8";
pub const TOO_LARGE_MESSAGE: &str = "Review text is too large";
pub const BACKEND_ERROR_MESSAGE: &str = "Inference endpoint returned an error";
pub const BACKEND_UNAVAILABLE_MESSAGE: &str = "Inference endpoint unavailable";
pub const BACKEND_TIMEOUT_MESSAGE: &str = "Inference endpoint timed out";

#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub timeout: Duration,
    pub content_type: String,
    pub max_body_bytes: usize,
}

impl RelaySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: config.endpoint.timeout(),
            content_type: config.endpoint.content_type.clone(),
            max_body_bytes: config.server.max_body_bytes,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(25),
            content_type: TEXT_PLAIN.to_string(),
            max_body_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Forwards one review per invocation to the inference endpoint and shapes
/// the reply for a cross-origin browser caller.
///
/// Holds no per-request state, so clones can serve concurrent requests.
#[derive(Clone)]
pub struct RelayHandler {
    endpoint: Arc<dyn InferenceEndpoint>,
    settings: RelaySettings,
}

impl RelayHandler {
    pub fn new(endpoint: Arc<dyn InferenceEndpoint>, settings: RelaySettings) -> Self {
        Self { endpoint, settings }
    }

    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }

    /// Never fails: every outcome, including backend faults, becomes a
    /// response with the plain-text and CORS headers attached.
    pub async fn handle(&self, invocation: InboundInvocation) -> RelayResponse {
        let invocation_id = Uuid::new_v4();
        let span = info_span!("relay", %invocation_id);
        self.relay(invocation).instrument(span).await
    }

    async fn relay(&self, invocation: InboundInvocation) -> RelayResponse {
        debug!(
            "Invocation method: {:?}, content type: {:?}",
            invocation.metadata.get("method"),
            invocation.content_type
        );

        let review = match self.extract_review(&invocation) {
            Ok(review) => review,
            Err(response) => return response,
        };

        info!("Forwarding review of {} bytes", review.len());

        match self.invoke(review).await {
            Ok(outcome) if outcome.is_success() => {
                info!("Inference succeeded");
                RelayResponse::ok(outcome.body)
            }
            Ok(outcome) => {
                warn!("Inference endpoint replied with status {}", outcome.status);
                RelayResponse::bad_gateway(BACKEND_ERROR_MESSAGE)
            }
            Err(e) if e.is_timeout() => {
                warn!("{}", e);
                RelayResponse::gateway_timeout(BACKEND_TIMEOUT_MESSAGE)
            }
            Err(e) => {
                error!("Inference call failed: {}", e);
                RelayResponse::bad_gateway(BACKEND_UNAVAILABLE_MESSAGE)
            }
        }
    }

    fn extract_review<'a>(
        &self,
        invocation: &'a InboundInvocation,
    ) -> std::result::Result<&'a str, RelayResponse> {
        let bytes = match invocation.body.as_deref() {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => {
                info!("Rejected invocation without review text");
                return Err(RelayResponse::bad_request(MISSING_REVIEW_MESSAGE));
            }
        };

        if bytes.len() > self.settings.max_body_bytes {
            info!(
                "Rejected review of {} bytes (limit {})",
                bytes.len(),
                self.settings.max_body_bytes
            );
            return Err(RelayResponse::payload_too_large(TOO_LARGE_MESSAGE));
        }

        let review = std::str::from_utf8(bytes).map_err(|_| {
            info!("Rejected review that is not valid UTF-8");
            RelayResponse::bad_request(INVALID_ENCODING_MESSAGE)
        })?;

        if review.trim().is_empty() {
            info!("Rejected blank review");
            return Err(RelayResponse::bad_request(MISSING_REVIEW_MESSAGE));
        }

        Ok(review)
    }

    async fn invoke(&self, review: &str) -> Result<InferenceOutcome> {
        let call = self.endpoint.invoke(review, &self.settings.content_type);

        match tokio::time::timeout(self.settings.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                timeout_ms: self.settings.timeout.as_millis() as u64,
            }),
        }
    }
}
