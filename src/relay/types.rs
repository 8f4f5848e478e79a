use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const ALLOW_ORIGIN_HEADER: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS_HEADER: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS_HEADER: &str = "Access-Control-Allow-Headers";

pub const TEXT_PLAIN: &str = "text/plain";
pub const ANY_ORIGIN: &str = "*";

/// One review submission as handed over by whatever hosts the relay.
///
/// The body is the review itself, never an envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundInvocation {
    pub body: Option<Vec<u8>>,
    pub content_type: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl InboundInvocation {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: Some(body.into()),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// HTTP-shaped result of one invocation.
///
/// Serializes as `{"statusCode", "headers", "body"}` so a pass-through
/// router can emit it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl RelayResponse {
    /// Builds a response that already carries the plain-text and CORS headers.
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE_HEADER.to_string(), TEXT_PLAIN.to_string());
        headers.insert(ALLOW_ORIGIN_HEADER.to_string(), ANY_ORIGIN.to_string());

        Self {
            status_code,
            headers,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn no_content() -> Self {
        Self::new(204, "")
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(400, msg)
    }

    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        Self::new(413, msg)
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self::new(502, msg)
    }

    pub fn gateway_timeout(msg: impl Into<String>) -> Self {
        Self::new(504, msg)
    }

    /// Sets a header, replacing any previous value under the same name.
    /// Header names compare case-insensitively.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
