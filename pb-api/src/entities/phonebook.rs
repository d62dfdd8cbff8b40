//! Phonebook entry entity.

use pb_core::error::{PbError, PbResult};
use pb_models::PhonebookEntryInfo;
use serde_json::Value;

use crate::entities::Device;

/// One entry of a device's phonebook, holding a non-owning back-reference
/// to the device it came from.
#[derive(Debug, Clone)]
pub struct PhonebookEntry {
    pub info: PhonebookEntryInfo,
    device: Device,
}

impl PhonebookEntry {
    pub(crate) fn new(info: PhonebookEntryInfo, device: Device) -> Self {
        Self { info, device }
    }

    /// The device this entry belongs to.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Send an SMS to this entry through the owning device. Fails with
    /// `InvalidRecipient` when the entry has no phone number.
    pub async fn send_sms(&self, message: &str) -> PbResult<Value> {
        let phone = self
            .info
            .phone
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                PbError::InvalidRecipient("phonebook entry has no phone number".into())
            })?;
        self.device.send_sms(phone, message).await
    }
}
