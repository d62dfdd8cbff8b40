//! Device entity.

use std::path::Path;

use pb_core::constants::{endpoints, sms};
use pb_core::error::{PbError, PbResult};
use pb_models::{DeviceInfo, User};
use serde_json::Value;

use crate::client::array_field;
use crate::entities::{PhonebookEntry, Push};
use crate::pushable::{FilePushOptions, PushTarget, Recipient};
use crate::session::Session;

/// A device on the account.
#[derive(Debug, Clone)]
pub struct Device {
    pub info: DeviceInfo,
    target: PushTarget,
    session: Session,
}

impl Device {
    /// Decode a device from server JSON and bind it to a session.
    pub fn from_json(value: Value, session: Session) -> PbResult<Self> {
        Ok(Self::from_info(DeviceInfo::from_json(value)?, session))
    }

    /// Wrap an already-decoded device. The recipient key is derived here,
    /// once: a device the server marks unpushable gets no recipient and
    /// fails every push locally.
    pub fn from_info(info: DeviceInfo, session: Session) -> Self {
        let recipient = info
            .pushable
            .then(|| Recipient::Device(info.iden.clone()));
        let target = PushTarget::new(recipient, session.clone());
        Self {
            info,
            target,
            session,
        }
    }

    /// Pseudo-device that targets every device on the account. Supports
    /// pushing only: no SMS, no phonebook, nothing to delete.
    pub(crate) fn broadcast(session: Session) -> Self {
        let info = DeviceInfo {
            pushable: true,
            ..DeviceInfo::default()
        };
        let target = PushTarget::new(Some(Recipient::Broadcast), session.clone());
        Self {
            info,
            target,
            session,
        }
    }

    pub fn iden(&self) -> &str {
        &self.info.iden
    }

    pub fn nickname(&self) -> Option<&str> {
        self.info.nickname.as_deref()
    }

    pub fn target(&self) -> &PushTarget {
        &self.target
    }

    // -- Pushing --

    pub async fn push_note(&self, title: &str, body: &str) -> PbResult<Push> {
        self.target.push_note(title, body).await
    }

    pub async fn push_link(&self, title: &str, url: &str, body: Option<&str>) -> PbResult<Push> {
        self.target.push_link(title, url, body).await
    }

    pub async fn push_file(&self, path: &Path, options: FilePushOptions) -> PbResult<Push> {
        self.target.push_file(path, options).await
    }

    pub fn push_address(&self, name: &str, address: &str) -> PbResult<Push> {
        self.target.push_address(name, address)
    }

    pub fn push_list(&self, title: &str, items: &[String]) -> PbResult<Push> {
        self.target.push_list(title, items)
    }

    // -- SMS --

    /// Send an SMS from this device. Looks up the current user's iden and
    /// posts a `messaging_extension_reply` ephemeral addressed by device
    /// iden and conversation id (the phone number). The ephemerals endpoint
    /// returns an empty object, handed back verbatim.
    pub async fn send_sms(&self, to_number: &str, message: &str) -> PbResult<Value> {
        if !self.info.has_sms {
            return Err(PbError::NoSms("device cannot send SMS messages".into()));
        }

        let user = User::from_json(self.session.get(endpoints::USERS_ME, vec![]).await?)?;

        let envelope = serde_json::json!({
            "type": sms::EPHEMERAL_TYPE,
            "push": {
                "type": sms::PUSH_TYPE,
                "package_name": sms::PACKAGE_NAME,
                "source_user_iden": user.iden,
                "target_device_iden": self.info.iden,
                "conversation_iden": to_number,
                "message": message,
            }
        });

        self.session.post(endpoints::EPHEMERALS, envelope).await
    }

    /// Fetch this device's synced phonebook; each entry keeps a
    /// back-reference to the device so it can send SMS directly.
    pub async fn phonebook(&self) -> PbResult<Vec<PhonebookEntry>> {
        let url = format!("{}_{}", endpoints::PHONEBOOK, self.info.iden);
        let response = self.session.get(&url, vec![]).await?;

        array_field(&response, "phonebook")
            .into_iter()
            .map(|entry| {
                Ok(PhonebookEntry::new(
                    pb_models::PhonebookEntryInfo::from_json(entry)?,
                    self.clone(),
                ))
            })
            .collect()
    }

    /// Delete the device. A device that is already inactive has no server
    /// representation left, so this is a no-op.
    pub async fn delete(self) -> PbResult<()> {
        if !self.info.active {
            return Ok(());
        }
        let url = format!("{}/{}", endpoints::DEVICES, self.info.iden);
        self.session.delete(&url).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubTransport;
    use reqwest::Method;

    fn device(stub: std::sync::Arc<StubTransport>, json: Value) -> Device {
        Device::from_json(json, Session::with_transport("tok", stub)).unwrap()
    }

    fn sms_device(stub: std::sync::Arc<StubTransport>) -> Device {
        device(
            stub,
            serde_json::json!({
                "iden": "d1",
                "nickname": "Phone",
                "has_sms": true,
                "active": true,
                "pushable": true
            }),
        )
    }

    #[tokio::test]
    async fn test_send_sms_requires_capability() {
        let stub = StubTransport::new();
        let dev = device(
            stub.clone(),
            serde_json::json!({"iden": "d2", "active": true, "pushable": true}),
        );

        let err = dev.send_sms("+15551234567", "hi").await.unwrap_err();
        assert!(matches!(err, PbError::NoSms(_)));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_send_sms_envelope() {
        let stub = StubTransport::new();
        stub.respond(Ok(serde_json::json!({"iden": "u1"})));
        stub.respond(Ok(serde_json::json!({})));

        sms_device(stub.clone())
            .send_sms("+15551234567", "hello")
            .await
            .unwrap();

        // User lookup first, then the ephemeral.
        assert_eq!(stub.calls(), 2);
        assert!(stub.request(0).url.ends_with("/users/me"));

        let envelope = stub.json_body(1);
        assert_eq!(envelope["type"], "push");
        assert_eq!(envelope["push"]["type"], "messaging_extension_reply");
        assert_eq!(envelope["push"]["source_user_iden"], "u1");
        assert_eq!(envelope["push"]["target_device_iden"], "d1");
        assert_eq!(envelope["push"]["conversation_iden"], "+15551234567");
        assert_eq!(envelope["push"]["message"], "hello");
    }

    #[tokio::test]
    async fn test_delete_inactive_is_noop() {
        let stub = StubTransport::new();
        let dev = device(stub.clone(), serde_json::json!({"iden": "d3", "active": false}));

        dev.delete().await.unwrap();
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_active() {
        let stub = StubTransport::new();
        let dev = device(stub.clone(), serde_json::json!({"iden": "d3", "active": true}));

        dev.delete().await.unwrap();
        let req = stub.request(0);
        assert_eq!(req.method, Method::DELETE);
        assert!(req.url.ends_with("/devices/d3"));
    }

    #[tokio::test]
    async fn test_phonebook_scoped_to_device() {
        let stub = StubTransport::new();
        stub.respond(Ok(serde_json::json!({
            "phonebook": [
                {"name": "Carol", "phone": "+15550001111", "phone_type": "mobile"},
                {"name": "Dave"}
            ]
        })));

        let entries = sms_device(stub.clone()).phonebook().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].device().iden(), "d1");
        assert!(stub.request(0).url.ends_with("/phonebook_d1"));
    }

    #[tokio::test]
    async fn test_unpushable_device_fails_locally() {
        let stub = StubTransport::new();
        let dev = device(
            stub.clone(),
            serde_json::json!({"iden": "d4", "active": true, "pushable": false}),
        );

        let err = dev.push_note("Hi", "there").await.unwrap_err();
        assert!(matches!(err, PbError::NotPushable(_)));
        assert_eq!(stub.calls(), 0);
    }
}
