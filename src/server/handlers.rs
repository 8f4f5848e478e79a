use crate::relay::{
    ALLOW_HEADERS_HEADER, ALLOW_METHODS_HEADER, InboundInvocation, RelayHandler, RelayResponse,
    TOO_LARGE_MESSAGE,
};
use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::{HeaderName, HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use tracing::{error, warn};

#[derive(Clone)]
pub struct AppState {
    pub relay: RelayHandler,
}

pub async fn relay(State(state): State<AppState>, request: Request) -> Response {
    let limit = state.relay.settings().max_body_bytes;

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) => return body_read_failure(&e).into_response(),
    };

    let mut invocation = InboundInvocation::new(bytes.to_vec())
        .with_metadata("method", parts.method.as_str())
        .with_metadata("uri", parts.uri.to_string());

    if let Some(content_type) = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        invocation = invocation.with_content_type(content_type);
    }

    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            invocation = invocation.with_metadata(format!("header.{}", name.as_str()), value);
        }
    }

    state.relay.handle(invocation).await.into_response()
}

pub const UNREADABLE_BODY_MESSAGE: &str = "Could not read review text";

fn body_read_failure(err: &axum::Error) -> RelayResponse {
    if exceeds_length_limit(err) {
        warn!("Request body exceeded the size limit");
        RelayResponse::payload_too_large(TOO_LARGE_MESSAGE)
    } else {
        warn!("Failed to read request body: {}", err);
        RelayResponse::bad_request(UNREADABLE_BODY_MESSAGE)
    }
}

fn exceeds_length_limit(err: &axum::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

pub async fn preflight() -> Response {
    RelayResponse::no_content()
        .with_header(ALLOW_METHODS_HEADER, "POST, OPTIONS")
        .with_header(ALLOW_HEADERS_HEADER, "Content-Type")
        .into_response()
}

pub async fn health() -> Response {
    RelayResponse::ok("ok").into_response()
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or_else(|_| {
            error!("Invalid relay status code: {}", self.status_code);
            StatusCode::INTERNAL_SERVER_ERROR
        });

        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("Dropping invalid response header: {}", name),
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_relay_response_into_response() {
        let response = RelayResponse::gateway_timeout("slow").into_response();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["content-type"], "text/plain");
    }

    #[tokio::test]
    async fn test_length_limit_error_is_payload_too_large() {
        let err = to_bytes(Body::from("a review longer than the limit"), 4)
            .await
            .unwrap_err();

        let response = body_read_failure(&err);
        assert_eq!(response.status_code, 413);
        assert_eq!(response.body, TOO_LARGE_MESSAGE);
    }

    #[test]
    fn test_other_read_errors_are_bad_request() {
        let err = axum::Error::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ));

        let response = body_read_failure(&err);
        assert_eq!(response.status_code, 400);
        assert_eq!(response.body, UNREADABLE_BODY_MESSAGE);
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
    }

    #[test]
    fn test_invalid_status_falls_back_to_internal_error() {
        let mut relay_response = RelayResponse::ok("1");
        relay_response.status_code = 42;

        let response = relay_response.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
