//! Channel entity.
//!
//! One wrapper covers three origins: a bare channel (not subscribed, not
//! owned; synthesized locally or fetched from `/channel-info`), a
//! subscription (returned by `/subscriptions`, carries the subscription
//! iden), and an owned channel (returned by `/channels`). Which operations
//! are valid depends on the origin.

use std::path::Path;

use pb_core::constants::endpoints;
use pb_core::error::{PbError, PbResult};
use pb_models::ChannelInfo;
use serde_json::Value;

use crate::entities::Push;
use crate::pushable::{FilePushOptions, PushTarget, Recipient};
use crate::session::Session;

/// How this channel object came to exist, which fixes its valid operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Not subscribed, not owned. `subscribe()` is the only transition.
    Bare,
    /// The current user's subscription; `unsubscribe()` is valid.
    Subscription,
    /// Created by the current user; the only pushable kind.
    Owned,
}

/// A channel, in one of the three states above.
#[derive(Debug, Clone)]
pub struct Channel {
    pub info: ChannelInfo,
    kind: ChannelKind,
    tag: String,
    target: PushTarget,
    session: Session,
}

impl Channel {
    /// Decode a channel or subscription from server JSON. `owned` marks
    /// objects coming from the `/channels` listing; the server does not
    /// flag ownership itself.
    pub fn from_json(value: Value, session: Session, owned: bool) -> PbResult<Self> {
        let info = ChannelInfo::from_json(value)?;
        let kind = if info.is_subscription() {
            ChannelKind::Subscription
        } else if owned {
            ChannelKind::Owned
        } else {
            ChannelKind::Bare
        };
        let tag = info
            .channel_tag()
            .ok_or_else(|| PbError::Decode("channel object has no tag".into()))?
            .to_string();
        Ok(Self::build(info, kind, tag, session))
    }

    /// Client-side placeholder for a tag nothing is known about. Its flags
    /// are guesses until `channel_information()` is called.
    pub(crate) fn bare(tag: &str, session: Session) -> Self {
        let info = ChannelInfo {
            tag: Some(tag.to_string()),
            ..ChannelInfo::default()
        };
        Self::build(info, ChannelKind::Bare, tag.to_string(), session)
    }

    fn build(info: ChannelInfo, kind: ChannelKind, tag: String, session: Session) -> Self {
        // Only the owner may push to a channel.
        let recipient =
            (kind == ChannelKind::Owned).then(|| Recipient::Channel(tag.clone()));
        let target = PushTarget::new(recipient, session.clone());
        Self {
            info,
            kind,
            tag,
            target,
            session,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn is_owned(&self) -> bool {
        self.kind == ChannelKind::Owned
    }

    pub fn is_subscription(&self) -> bool {
        self.kind == ChannelKind::Subscription
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

    // -- State transitions --

    /// Subscribe to the channel. Valid only for a bare channel; the server
    /// answers 400 for a tag that does not exist, which surfaces as
    /// `NotFound`. Returns the new subscription.
    pub async fn subscribe(&self) -> PbResult<Channel> {
        match self.kind {
            ChannelKind::Subscription => {
                return Err(PbError::Channel("already subscribed to this channel".into()))
            }
            ChannelKind::Owned => {
                return Err(PbError::Channel("cannot subscribe to own channel".into()))
            }
            ChannelKind::Bare => {}
        }

        let result = self
            .session
            .post(
                endpoints::SUBSCRIPTIONS,
                serde_json::json!({"channel_tag": self.tag}),
            )
            .await;
        match result {
            Ok(response) => Channel::from_json(response, self.session.clone(), false),
            Err(e) if e.status() == Some(400) => {
                Err(PbError::NotFound("channel does not exist".into()))
            }
            Err(e) => Err(e),
        }
    }

    /// Unsubscribe from the channel. Valid only for a subscription.
    pub async fn unsubscribe(self) -> PbResult<()> {
        if self.kind != ChannelKind::Subscription {
            return Err(PbError::Channel(
                "the current user is not subscribed to this channel".into(),
            ));
        }
        let iden = self
            .info
            .iden
            .as_deref()
            .ok_or_else(|| PbError::Decode("subscription has no iden".into()))?;
        let url = format!("{}/{}", endpoints::SUBSCRIPTIONS, iden);
        self.session.delete(&url).await?;
        Ok(())
    }

    /// Fetch authoritative information about the channel, whether or not
    /// the user is subscribed. The result is always a bare channel.
    pub async fn channel_information(&self) -> PbResult<Channel> {
        let result = self
            .session
            .get(
                endpoints::CHANNEL_INFO,
                vec![("tag".into(), self.tag.clone())],
            )
            .await;
        match result {
            Ok(response) => Channel::from_json(response, self.session.clone(), false),
            Err(e) if e.status() == Some(400) => {
                Err(PbError::NotFound("channel does not exist".into()))
            }
            Err(e) => Err(e),
        }
    }

    /// Channel creation was retired from the API; this always fails locally.
    pub fn create(&self, _title: &str, _description: &str) -> PbResult<Channel> {
        Err(PbError::Deprecated(
            "channels can only be created from the service's website".into(),
        ))
    }

    /// Channel deletion was retired from the API; this always fails locally.
    pub fn delete(&self) -> PbResult<()> {
        Err(PbError::Deprecated(
            "channels can only be deleted from the service's website".into(),
        ))
    }
}
