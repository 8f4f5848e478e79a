use super::types::InferenceOutcome;
use crate::{Error, Result, config::EndpointConfig};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::collections::HashMap;
use tracing::debug;

/// Something that turns review text into a sentiment score.
#[async_trait]
pub trait InferenceEndpoint: Send + Sync {
    /// Sends `payload` with the given content type and returns whatever the
    /// endpoint replied. A reply with an error status is still `Ok`; only
    /// transport failures and timeouts are `Err`.
    async fn invoke(&self, payload: &str, content_type: &str) -> Result<InferenceOutcome>;
}

pub struct HttpInferenceClient {
    client: reqwest::Client,
    url: String,
    headers: HashMap<String, String>,
    timeout_ms: u64,
}

impl HttpInferenceClient {
    pub fn new(config: EndpointConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(Error::config("Inference endpoint requires a URL"));
        }
        reqwest::Url::parse(&config.url)
            .map_err(|e| Error::config(format!("Invalid inference endpoint URL: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        debug!(
            "Created inference client for {} with {}ms timeout",
            config.url, config.timeout_ms
        );

        Ok(Self {
            client,
            url: config.url,
            headers: config.headers,
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn map_transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            Error::Network(err)
        }
    }
}

#[async_trait]
impl InferenceEndpoint for HttpInferenceClient {
    async fn invoke(&self, payload: &str, content_type: &str) -> Result<InferenceOutcome> {
        debug!("Invoking inference endpoint with {} bytes", payload.len());

        let mut req_builder = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, content_type)
            .body(payload.to_owned());

        for (key, value) in &self.headers {
            req_builder = req_builder.header(key, value);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        debug!("Inference endpoint replied with status {}", status);
        Ok(InferenceOutcome { body, status })
    }
}
