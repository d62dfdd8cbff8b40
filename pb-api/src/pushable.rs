//! Push targeting and payload shaping.
//!
//! Every entity that can receive pushes (device, contact, channel) composes
//! a [`PushTarget`]: the recipient key derived once at construction plus the
//! session to send with. An entity that cannot receive pushes carries no
//! recipient, and every push operation on it fails fast with `NotPushable`
//! before anything touches the network.

use std::path::Path;

use lazy_static::lazy_static;
use pb_core::constants::{endpoints, DEFAULT_MIME_TYPE, MAX_FILE_SIZE};
use pb_core::error::{PbError, PbResult};
use regex::Regex;
use serde_json::{Map, Value};

use crate::entities::Push;
use crate::session::Session;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Whether `address` is a well-formed email address.
pub fn is_valid_email(address: &str) -> bool {
    EMAIL_RE.is_match(address)
}

/// The recipient key of a push, derived from the owning entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// `device_iden` key.
    Device(String),
    /// `channel_tag` key.
    Channel(String),
    /// `email` key; only constructible from a well-formed address.
    Email(String),
    /// No key: the service pushes to every device on the account.
    Broadcast,
}

impl Recipient {
    /// Validate and build an email recipient. A malformed address is a local
    /// failure and never reaches the server.
    pub fn email(address: &str) -> PbResult<Self> {
        if is_valid_email(address) {
            Ok(Recipient::Email(address.to_string()))
        } else {
            Err(PbError::InvalidRecipient(format!(
                "invalid email address: {address:?}"
            )))
        }
    }

    fn apply(&self, payload: &mut Map<String, Value>) {
        match self {
            Recipient::Device(iden) => {
                payload.insert("device_iden".into(), Value::String(iden.clone()));
            }
            Recipient::Channel(tag) => {
                payload.insert("channel_tag".into(), Value::String(tag.clone()));
            }
            Recipient::Email(address) => {
                payload.insert("email".into(), Value::String(address.clone()));
            }
            Recipient::Broadcast => {}
        }
    }
}

/// Options for a file push.
#[derive(Debug, Clone, Default)]
pub struct FilePushOptions {
    /// Explicit MIME type; sniffed from the file extension when `None`.
    pub mime_type: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    /// Name to push the file under instead of its basename.
    pub alt_file_name: Option<String>,
}

/// Recipient-plus-session strategy composed into each pushable entity.
#[derive(Debug, Clone)]
pub struct PushTarget {
    recipient: Option<Recipient>,
    session: Session,
}

impl PushTarget {
    /// `recipient: None` marks a target that can never be pushed to.
    pub fn new(recipient: Option<Recipient>, session: Session) -> Self {
        Self { recipient, session }
    }

    /// Target a device directly by iden.
    pub fn device(iden: impl Into<String>, session: Session) -> Self {
        Self::new(Some(Recipient::Device(iden.into())), session)
    }

    pub fn is_pushable(&self) -> bool {
        self.recipient.is_some()
    }

    fn recipient(&self) -> PbResult<&Recipient> {
        self.recipient
            .as_ref()
            .ok_or_else(|| PbError::NotPushable("cannot push to this target".into()))
    }

    /// Push a note.
    pub async fn push_note(&self, title: &str, body: &str) -> PbResult<Push> {
        let recipient = self.recipient()?;
        let mut payload = Map::new();
        payload.insert("type".into(), Value::String("note".into()));
        payload.insert("title".into(), Value::String(title.into()));
        payload.insert("body".into(), Value::String(body.into()));
        self.send(recipient, payload).await
    }

    /// Push a link; `body` is an optional message shown with it.
    pub async fn push_link(&self, title: &str, url: &str, body: Option<&str>) -> PbResult<Push> {
        let recipient = self.recipient()?;
        let mut payload = Map::new();
        payload.insert("type".into(), Value::String("link".into()));
        payload.insert("title".into(), Value::String(title.into()));
        payload.insert("url".into(), Value::String(url.into()));
        if let Some(body) = body {
            payload.insert("body".into(), Value::String(body.into()));
        }
        self.send(recipient, payload).await
    }

    /// Address pushes were retired by the service; this always fails locally.
    pub fn push_address(&self, _name: &str, _address: &str) -> PbResult<Push> {
        Err(PbError::Deprecated(
            "pushing addresses has been retired by the service".into(),
        ))
    }

    /// List pushes were retired by the service; this always fails locally.
    pub fn push_list(&self, _title: &str, _items: &[String]) -> PbResult<Push> {
        Err(PbError::Deprecated(
            "pushing lists has been retired by the service".into(),
        ))
    }

    /// Push a file. Three requests: authorize the upload, upload the bytes
    /// to the storage host (unauthenticated multipart), then push a `file`
    /// notification referencing the uploaded URL.
    pub async fn push_file(&self, path: &Path, options: FilePushOptions) -> PbResult<Push> {
        let recipient = self.recipient()?;

        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            PbError::FilePush(format!("file does not exist or is unreadable: {e}"))
        })?;
        if !metadata.is_file() {
            return Err(PbError::FilePush(format!(
                "not a regular file: {}",
                path.display()
            )));
        }
        if metadata.len() > MAX_FILE_SIZE {
            return Err(PbError::FilePush("file size exceeds 25 MiB".into()));
        }

        let file_name = match options.alt_file_name {
            Some(name) => name,
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    PbError::FilePush(format!("path has no file name: {}", path.display()))
                })?,
        };
        let file_type = options.mime_type.unwrap_or_else(|| {
            mime_guess::from_path(path)
                .first_raw()
                .unwrap_or(DEFAULT_MIME_TYPE)
                .to_string()
        });

        let authorization = self
            .session
            .get(
                endpoints::UPLOAD_REQUEST,
                vec![
                    ("file_name".into(), file_name.clone()),
                    ("file_type".into(), file_type.clone()),
                ],
            )
            .await?;
        let authorization = pb_models::UploadAuthorization::from_json(authorization)?;

        let content = tokio::fs::read(path)
            .await
            .map_err(|e| PbError::FilePush(format!("failed to read file: {e}")))?;
        self.session
            .upload(
                &authorization.upload_url,
                authorization.form_fields(),
                file_name.clone(),
                file_type.clone(),
                content,
            )
            .await?;

        let mut payload = Map::new();
        payload.insert("type".into(), Value::String("file".into()));
        payload.insert("file_name".into(), Value::String(file_name));
        payload.insert("file_type".into(), Value::String(file_type));
        payload.insert("file_url".into(), Value::String(authorization.file_url));
        if let Some(title) = options.title {
            payload.insert("title".into(), Value::String(title));
        }
        if let Some(body) = options.body {
            payload.insert("body".into(), Value::String(body));
        }
        self.send(recipient, payload).await
    }

    async fn send(&self, recipient: &Recipient, mut payload: Map<String, Value>) -> PbResult<Push> {
        recipient.apply(&mut payload);
        let response = self
            .session
            .post(endpoints::PUSHES, Value::Object(payload))
            .await?;
        Push::from_json(response, self.session.clone())
    }
}
