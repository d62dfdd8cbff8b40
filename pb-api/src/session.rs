//! Authenticated session: a transport handle plus the access token.
//!
//! Every entity wrapper keeps a clone of the session as its credential
//! back-reference, so mutation methods can reach the API without going
//! through the facade.

use std::fmt;
use std::sync::Arc;

use pb_core::error::PbResult;
use reqwest::Method;
use serde_json::Value;

use crate::transport::{ApiRequest, Body, HttpTransport, Transport};

/// Cheaply cloneable handle for issuing authenticated API calls.
#[derive(Clone)]
pub struct Session {
    transport: Arc<dyn Transport>,
    token: String,
}

impl Session {
    /// Create a session over the production HTTP transport.
    pub fn new(token: impl Into<String>) -> PbResult<Self> {
        Ok(Self {
            transport: Arc::new(HttpTransport::new()?),
            token: token.into(),
        })
    }

    /// Create a session over a caller-supplied transport.
    pub fn with_transport(token: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            token: token.into(),
        }
    }

    /// The access token this session authenticates with.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Authenticated GET; `query` pairs are appended to the URL.
    pub async fn get(&self, url: &str, query: Vec<(String, String)>) -> PbResult<Value> {
        self.transport
            .execute(
                ApiRequest::new(Method::GET, url)
                    .query(query)
                    .token(&self.token),
            )
            .await
    }

    /// Authenticated POST with a JSON body.
    pub async fn post(&self, url: &str, body: Value) -> PbResult<Value> {
        self.transport
            .execute(ApiRequest::new(Method::POST, url).json(body).token(&self.token))
            .await
    }

    /// Authenticated DELETE.
    pub async fn delete(&self, url: &str) -> PbResult<Value> {
        self.transport
            .execute(ApiRequest::new(Method::DELETE, url).token(&self.token))
            .await
    }

    /// Unauthenticated multipart POST: the file-upload leg. The upload host
    /// authorizes via the opaque `fields`, not the account token.
    pub async fn upload(
        &self,
        url: &str,
        fields: Vec<(String, String)>,
        file_name: String,
        file_type: String,
        content: Vec<u8>,
    ) -> PbResult<Value> {
        let mut request = ApiRequest::new(Method::POST, url);
        request.body = Body::Multipart {
            fields,
            file_name,
            file_type,
            content,
        };
        self.transport.execute(request).await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the token.
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubTransport;
    use pb_core::constants::endpoints;

    #[tokio::test]
    async fn test_get_carries_token() {
        let stub = StubTransport::new();
        let session = Session::with_transport("tok", stub.clone());
        session.get(endpoints::DEVICES, vec![]).await.unwrap();

        let req = stub.request(0);
        assert_eq!(req.token.as_deref(), Some("tok"));
        assert_eq!(req.method, Method::GET);
    }

    #[tokio::test]
    async fn test_upload_is_unauthenticated() {
        let stub = StubTransport::new();
        let session = Session::with_transport("tok", stub.clone());
        session
            .upload(
                "https://upload.example.com/abc",
                vec![("acl".into(), "public-read".into())],
                "cat.jpg".into(),
                "image/jpeg".into(),
                vec![1, 2, 3],
            )
            .await
            .unwrap();

        let req = stub.request(0);
        assert!(req.token.is_none());
        assert!(matches!(req.body, Body::Multipart { .. }));
    }

    #[test]
    fn test_debug_hides_token() {
        let stub = StubTransport::new();
        let session = Session::with_transport("super-secret", stub);
        assert!(!format!("{session:?}").contains("super-secret"));
    }
}
