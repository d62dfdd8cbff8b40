//! Channel and subscription models.
//!
//! The API returns two shapes: a channel object (`tag` at the top level,
//! from `/channels` or `/channel-info`) and a subscription object (the
//! channel nested under a `channel` key, with the subscription's own `iden`
//! at the top level). `ChannelInfo` covers both; `channel_tag()` resolves
//! the tag regardless of shape.

use pb_core::error::{PbError, PbResult};
use serde::{Deserialize, Serialize};

/// Channel description nested inside a subscription object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub iden: Option<String>,
    pub tag: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// A channel, a subscription to one, or a client-side placeholder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Channel iden, or the subscription iden for subscription objects.
    pub iden: Option<String>,
    /// Channel tag (top-level shape only).
    pub tag: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub website_url: Option<String>,
    #[serde(default)]
    pub active: bool,
    /// Nested channel (subscription shape only).
    pub channel: Option<ChannelSummary>,
    pub created: Option<f64>,
    pub modified: Option<f64>,
}

impl ChannelInfo {
    /// Decode a channel or subscription from server JSON.
    pub fn from_json(value: serde_json::Value) -> PbResult<Self> {
        serde_json::from_value(value).map_err(PbError::from)
    }

    /// The stable channel tag, whichever shape this object has.
    pub fn channel_tag(&self) -> Option<&str> {
        self.channel
            .as_ref()
            .map(|c| c.tag.as_str())
            .or(self.tag.as_deref())
    }

    /// Whether this object is a subscription (nested channel shape).
    pub fn is_subscription(&self) -> bool {
        self.channel.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_shape() {
        let json = serde_json::json!({
            "iden": "ch1",
            "tag": "weather",
            "name": "Weather",
            "active": true
        });
        let info = ChannelInfo::from_json(json).unwrap();
        assert_eq!(info.channel_tag(), Some("weather"));
        assert!(!info.is_subscription());
    }

    #[test]
    fn test_subscription_shape() {
        let json = serde_json::json!({
            "iden": "sub1",
            "active": true,
            "channel": {"iden": "ch1", "tag": "weather", "name": "Weather"}
        });
        let info = ChannelInfo::from_json(json).unwrap();
        assert!(info.is_subscription());
        assert_eq!(info.channel_tag(), Some("weather"));
        assert_eq!(info.iden.as_deref(), Some("sub1"));
    }
}
