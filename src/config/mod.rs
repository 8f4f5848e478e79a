mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use std::path::Path;
use tracing::debug;

pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
pub const ENDPOINT_URL_ENV: &str = "SENTIMENT_ENDPOINT_URL";

pub async fn load() -> Result<Config> {
    let config_path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.yaml".to_string());
    load_from(config_path).await
}

pub async fn load_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    let mut config = parse(&config_str)?;

    if let Ok(url) = env::var(ENDPOINT_URL_ENV) {
        debug!("Endpoint URL overridden by {}", ENDPOINT_URL_ENV);
        config.endpoint.url = url;
    }

    validate(&config)?;
    Ok(config)
}

pub fn parse(yaml: &str) -> Result<Config> {
    Ok(serde_yaml::from_str(yaml)?)
}

pub fn validate(config: &Config) -> Result<()> {
    if config.endpoint.url.trim().is_empty() {
        return Err(Error::config("endpoint.url must not be empty"));
    }
    let url = reqwest::Url::parse(&config.endpoint.url).map_err(|e| {
        Error::config(format!(
            "endpoint.url is not a valid URL ({}): {}",
            e, config.endpoint.url
        ))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::config(format!(
            "endpoint.url must use http or https: {}",
            config.endpoint.url
        )));
    }
    if !is_plain_text(&config.endpoint.content_type) {
        return Err(Error::config(format!(
            "endpoint.content_type must be text/plain: {}",
            config.endpoint.content_type
        )));
    }
    if config.endpoint.timeout_ms == 0 {
        return Err(Error::config("endpoint.timeout_ms must be greater than zero"));
    }
    if config.server.max_body_bytes == 0 {
        return Err(Error::config("server.max_body_bytes must be greater than zero"));
    }
    if !config.server.path.starts_with('/') {
        return Err(Error::config(format!(
            "server.path must start with '/': {}",
            config.server.path
        )));
    }
    Ok(())
}

/// Accepts `text/plain` with optional parameters such as a charset.
fn is_plain_text(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("text/plain"))
}
