//! Push notification entity.

use pb_core::constants::endpoints;
use pb_core::error::PbResult;
use pb_models::PushData;
use serde_json::Value;

use crate::session::Session;

/// A push notification on the account.
#[derive(Debug, Clone)]
pub struct Push {
    pub info: PushData,
    session: Session,
}

impl Push {
    /// Decode a push from server JSON and bind it to a session.
    pub fn from_json(value: Value, session: Session) -> PbResult<Self> {
        Ok(Self {
            info: PushData::from_json(value)?,
            session,
        })
    }

    pub fn iden(&self) -> &str {
        &self.info.iden
    }

    /// Dismiss the push. Returns the same push as the server now sees it.
    pub async fn dismiss(&self) -> PbResult<Push> {
        let url = format!("{}/{}", endpoints::PUSHES, self.info.iden);
        let response = self
            .session
            .post(&url, serde_json::json!({"dismissed": true}))
            .await?;
        Push::from_json(response, self.session.clone())
    }

    /// Delete the push.
    pub async fn delete(self) -> PbResult<()> {
        let url = format!("{}/{}", endpoints::PUSHES, self.info.iden);
        self.session.delete(&url).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubTransport;
    use reqwest::Method;

    fn push(stub: std::sync::Arc<StubTransport>) -> Push {
        Push::from_json(
            serde_json::json!({"iden": "p1", "type": "note", "active": true}),
            Session::with_transport("tok", stub),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_dismiss_returns_fresh_value() {
        let stub = StubTransport::new();
        stub.respond(Ok(serde_json::json!({
            "iden": "p1",
            "type": "note",
            "dismissed": true,
            "active": true
        })));

        let dismissed = push(stub.clone()).dismiss().await.unwrap();
        assert!(dismissed.info.dismissed);

        let req = stub.request(0);
        assert!(req.url.ends_with("/pushes/p1"));
        assert_eq!(stub.json_body(0), serde_json::json!({"dismissed": true}));
    }

    #[tokio::test]
    async fn test_delete() {
        let stub = StubTransport::new();
        push(stub.clone()).delete().await.unwrap();

        let req = stub.request(0);
        assert_eq!(req.method, Method::DELETE);
        assert!(req.url.ends_with("/pushes/p1"));
    }
}
