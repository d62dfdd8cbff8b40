//! Device model.

use pb_core::error::{PbError, PbResult};
use serde::{Deserialize, Serialize};

/// A device registered to the account.
///
/// Devices are fetched fresh on each listing call; nothing is persisted
/// locally beyond the facade's in-memory page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Server-assigned unique identifier.
    pub iden: String,
    pub nickname: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub icon: Option<String>,
    /// Whether the device can relay SMS messages.
    #[serde(default)]
    pub has_sms: bool,
    /// False once the device has been deleted server-side.
    #[serde(default)]
    pub active: bool,
    /// Whether the device can receive pushes.
    #[serde(default)]
    pub pushable: bool,
    pub created: Option<f64>,
    pub modified: Option<f64>,
}

impl DeviceInfo {
    /// Decode a device from server JSON. Fails with `PbError::Decode` when
    /// the required `iden` field is missing.
    pub fn from_json(value: serde_json::Value) -> PbResult<Self> {
        serde_json::from_value(value).map_err(PbError::from)
    }

    /// Display name: nickname when set, otherwise the iden.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.iden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_roundtrip() {
        let json = serde_json::json!({
            "iden": "d1",
            "nickname": "Phone",
            "has_sms": true,
            "active": true
        });
        let device = DeviceInfo::from_json(json).unwrap();
        assert_eq!(device.iden, "d1");
        assert_eq!(device.nickname.as_deref(), Some("Phone"));
        assert!(device.has_sms);
        assert!(device.active);
        assert!(!device.pushable);
    }

    #[test]
    fn test_device_missing_iden_fails() {
        let json = serde_json::json!({"nickname": "Phone"});
        assert!(matches!(
            DeviceInfo::from_json(json),
            Err(PbError::Decode(_))
        ));
    }

    #[test]
    fn test_device_ignores_unknown_fields() {
        let json = serde_json::json!({
            "iden": "d1",
            "active": true,
            "app_version": 256,
            "fingerprint": "{}"
        });
        let device = DeviceInfo::from_json(json).unwrap();
        assert_eq!(device.display_name(), "d1");
    }
}
