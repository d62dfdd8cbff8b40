//! Phonebook entry model.

use pb_core::error::{PbError, PbResult};
use serde::{Deserialize, Serialize};

/// One entry of a device's synced phonebook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhonebookEntryInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub phone_type: Option<String>,
}

impl PhonebookEntryInfo {
    /// Decode a phonebook entry from server JSON.
    pub fn from_json(value: serde_json::Value) -> PbResult<Self> {
        serde_json::from_value(value).map_err(PbError::from)
    }
}
