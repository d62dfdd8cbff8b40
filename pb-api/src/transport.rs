//! HTTP transport for the PushBullet REST API.
//!
//! One request in, classified JSON or error out. The classification table is
//! fixed: 401/403 mean the token is bad, 404 means the object is gone, any
//! other status >= 400 is a connection error carrying the server's error
//! type and message, and anything below 400 is decoded as JSON.

use async_trait::async_trait;
use pb_core::error::{PbError, PbResult};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

/// Request body variants.
#[derive(Debug, Clone)]
pub enum Body {
    Empty,
    /// JSON object sent with `Content-Type: application/json`.
    Json(Value),
    /// Multipart form for the file-upload leg: opaque host fields plus one
    /// file part.
    Multipart {
        fields: Vec<(String, String)>,
        file_name: String,
        file_type: String,
        content: Vec<u8>,
    },
}

/// One fully-described API request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL; the endpoints are fixed constants in `pb_core`.
    pub url: String,
    /// Query pairs appended to the URL (GET requests).
    pub query: Option<Vec<(String, String)>>,
    pub body: Body,
    /// Access token, sent as HTTP Basic auth username with an empty
    /// password. The upload leg is the one unauthenticated call.
    pub token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: None,
            body: Body::Empty,
            token: None,
        }
    }

    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        if !query.is_empty() {
            self.query = Some(query);
        }
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Body::Json(body);
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Executes one HTTP request against the API.
///
/// A trait so tests can substitute a scripted stub and assert which calls
/// were (or were not) made.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> PbResult<Value>;
}

/// Production transport backed by reqwest.
///
/// No retry, no backoff, and no library-level timeout: a transient network
/// failure surfaces immediately as `PbError::Connection`.
pub struct HttpTransport {
    inner: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> PbResult<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(format!("pb-api/{}", pb_core::constants::CLIENT_VERSION))
            .build()
            .map_err(|e| PbError::connection(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> PbResult<Value> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self.inner.request(request.method, &request.url);

        if let Some(ref query) = request.query {
            builder = builder.query(query);
        }

        builder = match request.body {
            Body::Empty => builder,
            Body::Json(ref value) => builder.json(value),
            Body::Multipart {
                fields,
                file_name,
                file_type,
                content,
            } => {
                let part = reqwest::multipart::Part::bytes(content)
                    .file_name(file_name)
                    .mime_str(&file_type)
                    .map_err(|e| PbError::FilePush(format!("invalid mime type: {e}")))?;
                let mut form = reqwest::multipart::Form::new();
                for (key, value) in fields {
                    form = form.text(key, value);
                }
                builder.multipart(form.part("file", part))
            }
        };

        if let Some(ref token) = request.token {
            builder = builder.basic_auth(token, None::<&str>);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PbError::connection(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| PbError::connection(format!("failed to read response body: {e}")))?;

        if status >= 400 {
            let err = classify_failure(status, &body);
            warn!("request failed: {err}");
            return Err(err);
        }

        Ok(decode_body(&body))
    }
}

/// Map an HTTP error status plus response body to a `PbError`.
pub(crate) fn classify_failure(status: u16, body: &str) -> PbError {
    let (error_type, message) = parse_error_body(body);
    match status {
        401 | 403 => PbError::InvalidToken(message),
        404 => PbError::NotFound(message),
        _ => PbError::Connection {
            status: Some(status),
            message: format!("HTTP error {status} ({error_type}): {message}"),
        },
    }
}

/// Extract `error.type` / `error.message` from the service's error envelope.
fn parse_error_body(body: &str) -> (String, String) {
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return ("unknown".into(), fallback_message(body)),
    };
    let error = &value["error"];
    let error_type = error["type"].as_str().unwrap_or("unknown").to_string();
    let message = error["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| fallback_message(body));
    (error_type, message)
}

fn fallback_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error detail".into()
    } else {
        trimmed.to_string()
    }
}

/// Decode a success body. The service replies with JSON everywhere, but the
/// upload host answers with an empty body; both decode to `Value::Null`.
fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pb_core::constants::endpoints;

    const ERROR_BODY: &str =
        r#"{"error":{"type":"invalid_request","message":"The resource could not be found."}}"#;

    #[test]
    fn test_classify_unauthorized() {
        for status in [401, 403] {
            let err = classify_failure(status, r#"{"error":{"message":"Access token is invalid."}}"#);
            match err {
                PbError::InvalidToken(msg) => assert_eq!(msg, "Access token is invalid."),
                other => panic!("expected InvalidToken, got {other}"),
            }
        }
    }

    #[test]
    fn test_classify_not_found() {
        assert!(matches!(
            classify_failure(404, ERROR_BODY),
            PbError::NotFound(_)
        ));
    }

    #[test]
    fn test_classify_other_carries_status_and_type() {
        let err = classify_failure(400, ERROR_BODY);
        assert_eq!(err.status(), Some(400));
        let rendered = err.to_string();
        assert!(rendered.contains("invalid_request"));
        assert!(rendered.contains("could not be found"));
    }

    #[test]
    fn test_classify_non_json_body() {
        let err = classify_failure(502, "Bad Gateway");
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn test_decode_empty_body_is_null() {
        assert_eq!(decode_body(""), Value::Null);
        assert_eq!(decode_body("  \n"), Value::Null);
    }

    #[test]
    fn test_request_builder() {
        let req = ApiRequest::new(Method::GET, endpoints::DEVICES)
            .query(vec![("limit".into(), "10".into())])
            .token("secret");
        assert_eq!(req.url, endpoints::DEVICES);
        assert!(req.query.is_some());
        assert!(matches!(req.body, Body::Empty));
    }

    #[test]
    fn test_empty_query_is_dropped() {
        let req = ApiRequest::new(Method::GET, endpoints::DEVICES).query(vec![]);
        assert!(req.query.is_none());
    }

    // Wire-level tests against a local mock server.

    #[tokio::test]
    async fn test_success_body_passes_through_unchanged() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/users/me")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"iden":"u1","name":"Me","nested":{"deep":[1,2,3]}}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let value = transport
            .execute(ApiRequest::new(Method::GET, format!("{}/users/me", server.url())).token("t"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            value,
            serde_json::json!({"iden":"u1","name":"Me","nested":{"deep":[1,2,3]}})
        );
    }

    #[tokio::test]
    async fn test_basic_auth_header_is_token_with_empty_password() {
        let mut server = mockito::Server::new_async().await;
        // base64("secret:")
        let mock = server
            .mock("GET", "/users/me")
            .match_header("authorization", "Basic c2VjcmV0Og==")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        transport
            .execute(
                ApiRequest::new(Method::GET, format!("{}/users/me", server.url())).token("secret"),
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_query_is_appended() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/devices")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("modified_after".into(), "0".into()),
                mockito::Matcher::UrlEncoded("limit".into(), "5".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"devices":[]}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        transport
            .execute(
                ApiRequest::new(Method::GET, format!("{}/devices", server.url()))
                    .query(vec![
                        ("modified_after".into(), "0".into()),
                        ("limit".into(), "5".into()),
                    ])
                    .token("t"),
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_invalid_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/me")
            .with_status(401)
            .with_body(r#"{"error":{"type":"invalid_access_token","message":"Access token is invalid."}}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let err = transport
            .execute(ApiRequest::new(Method::GET, format!("{}/users/me", server.url())).token("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, PbError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_connection_with_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/pushes")
            .with_status(500)
            .with_body(r#"{"error":{"type":"server","message":"boom"}}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let err = transport
            .execute(
                ApiRequest::new(Method::POST, format!("{}/pushes", server.url()))
                    .json(serde_json::json!({"type": "note"}))
                    .token("t"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
