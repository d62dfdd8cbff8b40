//! Push notification model.

use pb_core::error::{PbError, PbResult};
use serde::{Deserialize, Serialize};

/// The kind of a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushType {
    Note,
    Link,
    File,
    /// Retired by the service; still appears in old push history.
    Address,
    /// Retired by the service; still appears in old push history.
    List,
    /// Any type string this library does not know. Keeps a single exotic
    /// history item from failing a whole listing decode.
    #[serde(other)]
    Unknown,
}

/// A single push notification.
///
/// Which optional fields are set depends on `push_type`: notes carry
/// `title`/`body`, links add `url`, files carry `file_name`/`file_type`/
/// `file_url`, retired list pushes carry `items`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushData {
    /// Server-assigned unique identifier.
    pub iden: String,
    #[serde(rename = "type")]
    pub push_type: Option<PushType>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub url: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub file_url: Option<String>,
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
    #[serde(default)]
    pub dismissed: bool,
    #[serde(default)]
    pub active: bool,
    pub sender_iden: Option<String>,
    pub sender_email: Option<String>,
    pub receiver_iden: Option<String>,
    pub receiver_email: Option<String>,
    pub created: Option<f64>,
    pub modified: Option<f64>,
}

impl PushData {
    /// Decode a push from server JSON.
    pub fn from_json(value: serde_json::Value) -> PbResult<Self> {
        serde_json::from_value(value).map_err(PbError::from)
    }
}
