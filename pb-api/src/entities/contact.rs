//! Contact entity.

use std::path::Path;

use pb_core::constants::endpoints;
use pb_core::error::PbResult;
use pb_models::ContactInfo;
use serde_json::Value;

use crate::entities::Push;
use crate::pushable::{FilePushOptions, PushTarget, Recipient};
use crate::session::Session;

/// A contact on the account. Pushable only when it has a well-formed email
/// address; the address is validated once, at construction.
#[derive(Debug, Clone)]
pub struct Contact {
    pub info: ContactInfo,
    target: PushTarget,
    session: Session,
}

impl Contact {
    /// Decode a contact from server JSON and bind it to a session. A
    /// malformed email is rejected here with `InvalidRecipient`.
    pub fn from_json(value: Value, session: Session) -> PbResult<Self> {
        let info = ContactInfo::from_json(value)?;
        let recipient = match info.email.as_deref() {
            Some(email) if !email.is_empty() => Some(Recipient::email(email)?),
            _ => None,
        };
        let target = PushTarget::new(recipient, session.clone());
        Ok(Self {
            info,
            target,
            session,
        })
    }

    pub fn iden(&self) -> &str {
        &self.info.iden
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

    // -- Mutations --

    /// Rename the contact. Returns the contact as the server now sees it.
    pub async fn change_name(&self, name: &str) -> PbResult<Contact> {
        let url = format!("{}/{}", endpoints::CONTACTS, self.info.iden);
        let response = self
            .session
            .post(&url, serde_json::json!({"name": name}))
            .await?;
        Contact::from_json(response, self.session.clone())
    }

    /// Delete the contact.
    pub async fn delete(self) -> PbResult<()> {
        let url = format!("{}/{}", endpoints::CONTACTS, self.info.iden);
        self.session.delete(&url).await?;
        Ok(())
    }
}
