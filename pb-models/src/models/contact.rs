//! Contact model.

use pb_core::error::{PbError, PbResult};
use serde::{Deserialize, Serialize};

/// A contact on the account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Server-assigned unique identifier.
    pub iden: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_normalized: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub active: bool,
    pub created: Option<f64>,
    pub modified: Option<f64>,
}

impl ContactInfo {
    /// Decode a contact from server JSON.
    pub fn from_json(value: serde_json::Value) -> PbResult<Self> {
        serde_json::from_value(value).map_err(PbError::from)
    }

    /// A contact is pushable only when it has an email address.
    pub fn is_pushable(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.is_empty())
    }
}
