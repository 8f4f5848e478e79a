use super::mocks::MockInferenceEndpoint;
use sentiment_relay::{
    config::{Config, EndpointConfig, LogsConfig, ServerConfig},
    relay::{RelayHandler, RelaySettings},
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Create a test configuration pointing at the given endpoint URL
pub fn create_test_config(url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            path: "/".to_string(),
            max_body_bytes: 1024,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
        endpoint: EndpointConfig {
            url: url.to_string(),
            timeout_ms: 500,
            content_type: "text/plain".to_string(),
            headers: HashMap::new(),
        },
    }
}

/// Wrap a mock endpoint in a relay handler with a short timeout
pub fn create_test_handler(endpoint: &MockInferenceEndpoint, timeout: Duration) -> RelayHandler {
    let settings = RelaySettings {
        max_body_bytes: 1024,
        ..RelaySettings::default()
    }
    .with_timeout(timeout);

    RelayHandler::new(Arc::new(endpoint.clone()), settings)
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 9090
  path: "/predict"
  max_body_bytes: 2048
  logs:
    level: "debug"

endpoint:
  url: "http://inference.internal:8081/invocations"
  timeout_ms: 3000
  headers:
    X-Api-Key: "secret"
"#;
