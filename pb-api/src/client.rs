//! Account facade: the library entry point.
//!
//! Lists and looks up devices, contacts, channels, and pushes. Each listing
//! call fetches exactly one page and refreshes the corresponding in-memory
//! cache; lookups search the cache, fetching one page first when it is
//! empty. The caches are plain fields on the client, invalidated only by
//! calling the matching `get_*` method again.

use std::sync::Arc;

use pb_core::constants::endpoints;
use pb_core::error::{PbError, PbResult, PushFailure};
use pb_models::User;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::entities::{Channel, Contact, Device, Push};
use crate::pushable::{is_valid_email, PushTarget};
use crate::session::Session;
use crate::transport::Transport;

/// Parameters for a single listing page. The facade never auto-paginates:
/// pass the cursor from the previous page to get the next one.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Only return records modified after this UNIX timestamp. Always sent;
    /// defaults to 0.
    pub modified_after: Option<f64>,
    /// Opaque cursor from the previous page.
    pub cursor: Option<String>,
    /// Maximum number of records on the page.
    pub limit: Option<u32>,
}

impl ListOptions {
    fn to_query(&self) -> Vec<(String, String)> {
        let modified_after = self.modified_after.unwrap_or(0.0);
        let rendered = if modified_after.fract() == 0.0 {
            format!("{}", modified_after as i64)
        } else {
            modified_after.to_string()
        };
        let mut query = vec![("modified_after".to_string(), rendered)];
        if let Some(ref cursor) = self.cursor {
            query.push(("cursor".into(), cursor.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".into(), limit.to_string()));
        }
        query
    }
}

/// What a batch push sends to each device.
enum BatchPayload<'a> {
    Note {
        title: &'a str,
        body: &'a str,
    },
    Link {
        title: &'a str,
        url: &'a str,
        body: Option<&'a str>,
    },
}

/// PushBullet account client.
pub struct Pushbullet {
    session: Session,
    devices: RwLock<Option<Vec<Device>>>,
    contacts: RwLock<Option<Vec<Contact>>>,
    subscriptions: RwLock<Option<Vec<Channel>>>,
    my_channels: RwLock<Option<Vec<Channel>>>,
}

impl Pushbullet {
    /// Create a client over the production HTTP transport.
    pub fn new(token: impl Into<String>) -> PbResult<Self> {
        Ok(Self::from_session(Session::new(token)?))
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(token: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self::from_session(Session::with_transport(token, transport))
    }

    fn from_session(session: Session) -> Self {
        Self {
            session,
            devices: RwLock::new(None),
            contacts: RwLock::new(None),
            subscriptions: RwLock::new(None),
            my_channels: RwLock::new(None),
        }
    }

    /// The session the client authenticates with.
    pub fn session(&self) -> &Session {
        &self.session
    }

    // -- Pushes --

    /// Fetch one page of push history. Only active pushes are kept.
    pub async fn get_pushes(&self, options: &ListOptions) -> PbResult<Vec<Push>> {
        let response = self
            .session
            .get(endpoints::PUSHES, options.to_query())
            .await?;
        array_field(&response, "pushes")
            .into_iter()
            .filter(is_active)
            .map(|p| Push::from_json(p, self.session.clone()))
            .collect()
    }

    /// Fetch a single push by iden.
    pub async fn push(&self, iden: &str) -> PbResult<Push> {
        let url = format!("{}/{}", endpoints::PUSHES, iden);
        let response = self.session.get(&url, vec![]).await?;
        Push::from_json(response, self.session.clone())
    }

    // -- Devices --

    /// Fetch one page of devices and refresh the device cache. Only active
    /// devices are kept.
    pub async fn get_devices(&self, options: &ListOptions) -> PbResult<Vec<Device>> {
        let response = self
            .session
            .get(endpoints::DEVICES, options.to_query())
            .await?;
        let devices: Vec<Device> = array_field(&response, "devices")
            .into_iter()
            .filter(is_active)
            .map(|d| Device::from_json(d, self.session.clone()))
            .collect::<PbResult<_>>()?;

        debug!("cached {} devices", devices.len());
        *self.devices.write().await = Some(devices.clone());
        Ok(devices)
    }

    /// Target a device by iden or nickname. Fetches one page when the cache
    /// is empty; `NotFound` when no device matches.
    pub async fn device(&self, iden_or_nickname: &str) -> PbResult<Device> {
        let cached = self.devices.read().await.clone();
        let devices = match cached {
            Some(devices) => devices,
            None => self.get_devices(&ListOptions::default()).await?,
        };

        devices
            .into_iter()
            .find(|d| {
                d.info.iden == iden_or_nickname
                    || d.info.nickname.as_deref() == Some(iden_or_nickname)
            })
            .ok_or_else(|| PbError::NotFound(format!("device not found: {iden_or_nickname}")))
    }

    /// Pseudo-device that pushes to every device on the account.
    pub fn all_devices(&self) -> Device {
        Device::broadcast(self.session.clone())
    }

    // -- Contacts --

    /// Create a contact. The email address is validated locally first; a
    /// malformed one never reaches the server.
    pub async fn create_contact(&self, name: &str, email: &str) -> PbResult<Contact> {
        if !is_valid_email(email) {
            return Err(PbError::InvalidRecipient(format!(
                "invalid email address: {email:?}"
            )));
        }
        let response = self
            .session
            .post(
                endpoints::CONTACTS,
                serde_json::json!({"name": name, "email": email}),
            )
            .await?;
        Contact::from_json(response, self.session.clone())
    }

    /// Fetch one page of contacts and refresh the contact cache. Only
    /// active contacts are kept.
    pub async fn get_contacts(&self, options: &ListOptions) -> PbResult<Vec<Contact>> {
        let response = self
            .session
            .get(endpoints::CONTACTS, options.to_query())
            .await?;
        let contacts: Vec<Contact> = array_field(&response, "contacts")
            .into_iter()
            .filter(is_active)
            .map(|c| Contact::from_json(c, self.session.clone()))
            .collect::<PbResult<_>>()?;

        *self.contacts.write().await = Some(contacts.clone());
        Ok(contacts)
    }

    /// Target a contact by name or email.
    pub async fn contact(&self, name_or_email: &str) -> PbResult<Contact> {
        let cached = self.contacts.read().await.clone();
        let contacts = match cached {
            Some(contacts) => contacts,
            None => self.get_contacts(&ListOptions::default()).await?,
        };

        contacts
            .into_iter()
            .find(|c| {
                c.info.name.as_deref() == Some(name_or_email)
                    || c.info.email.as_deref() == Some(name_or_email)
            })
            .ok_or_else(|| PbError::NotFound(format!("contact not found: {name_or_email}")))
    }

    // -- Users --

    /// Information about the current user.
    pub async fn get_user_information(&self) -> PbResult<User> {
        let response = self.session.get(endpoints::USERS_ME, vec![]).await?;
        User::from_json(response)
    }

    /// Update the current user's preference map.
    pub async fn update_user_preferences(&self, preferences: Value) -> PbResult<User> {
        let response = self
            .session
            .post(
                endpoints::USERS_ME,
                serde_json::json!({"preferences": preferences}),
            )
            .await?;
        User::from_json(response)
    }

    // -- Channels --

    /// Fetch one page of the user's channel subscriptions and refresh the
    /// subscription cache.
    pub async fn get_channel_subscriptions(&self, options: &ListOptions) -> PbResult<Vec<Channel>> {
        let response = self
            .session
            .get(endpoints::SUBSCRIPTIONS, options.to_query())
            .await?;
        let channels: Vec<Channel> = array_field(&response, "subscriptions")
            .into_iter()
            .filter(is_active)
            .map(|s| Channel::from_json(s, self.session.clone(), false))
            .collect::<PbResult<_>>()?;

        *self.subscriptions.write().await = Some(channels.clone());
        Ok(channels)
    }

    /// Fetch one page of channels created by the current user and refresh
    /// the owned-channel cache.
    pub async fn get_my_channels(&self, options: &ListOptions) -> PbResult<Vec<Channel>> {
        let response = self
            .session
            .get(endpoints::CHANNELS, options.to_query())
            .await?;
        let channels: Vec<Channel> = array_field(&response, "channels")
            .into_iter()
            .filter(is_active)
            .map(|c| Channel::from_json(c, self.session.clone(), true))
            .collect::<PbResult<_>>()?;

        *self.my_channels.write().await = Some(channels.clone());
        Ok(channels)
    }

    /// Target a channel by tag: the user's own channels first, then
    /// subscriptions, else a client-side placeholder whose flags are not
    /// authoritative until `channel_information()` is called on it.
    pub async fn channel(&self, tag: &str) -> PbResult<Channel> {
        let owned = self.my_channels.read().await.clone();
        let owned = match owned {
            Some(channels) => channels,
            None => self.get_my_channels(&ListOptions::default()).await?,
        };
        if let Some(channel) = owned.into_iter().find(|c| c.tag() == tag) {
            return Ok(channel);
        }

        let subscribed = self.subscriptions.read().await.clone();
        let subscribed = match subscribed {
            Some(channels) => channels,
            None => self.get_channel_subscriptions(&ListOptions::default()).await?,
        };
        if let Some(channel) = subscribed.into_iter().find(|c| c.tag() == tag) {
            return Ok(channel);
        }

        Ok(Channel::bare(tag, self.session.clone()))
    }

    // -- Batch pushes --

    /// Push a note to several devices by iden. Best-effort: every send is
    /// attempted; failures are aggregated into `PbError::PushBatch`.
    pub async fn push_note_to_devices(
        &self,
        idens: &[&str],
        title: &str,
        body: &str,
    ) -> PbResult<Vec<Push>> {
        self.push_batch(idens, BatchPayload::Note { title, body })
            .await
    }

    /// Push a link to several devices by iden, with the same best-effort
    /// semantics as `push_note_to_devices`.
    pub async fn push_link_to_devices(
        &self,
        idens: &[&str],
        title: &str,
        url: &str,
        body: Option<&str>,
    ) -> PbResult<Vec<Push>> {
        self.push_batch(idens, BatchPayload::Link { title, url, body })
            .await
    }

    async fn push_batch(&self, idens: &[&str], payload: BatchPayload<'_>) -> PbResult<Vec<Push>> {
        let mut sent = Vec::new();
        let mut failures = Vec::new();

        for iden in idens {
            let target = PushTarget::device(*iden, self.session.clone());
            let result = match payload {
                BatchPayload::Note { title, body } => target.push_note(title, body).await,
                BatchPayload::Link { title, url, body } => {
                    target.push_link(title, url, body).await
                }
            };
            match result {
                Ok(push) => sent.push(push),
                Err(e) => failures.push(PushFailure {
                    target: iden.to_string(),
                    reason: e.to_string(),
                }),
            }
        }

        if failures.is_empty() {
            Ok(sent)
        } else {
            Err(PbError::PushBatch { failures })
        }
    }
}

/// The named array inside a listing response, or empty when absent.
pub(crate) fn array_field(value: &Value, key: &str) -> Vec<Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Whether a listed record is still active (non-deleted).
fn is_active(value: &Value) -> bool {
    value
        .get("active")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
