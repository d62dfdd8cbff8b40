//! Current-user model.

use pb_core::error::{PbError, PbResult};
use serde::{Deserialize, Serialize};

/// The authenticated account, as returned by `/users/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned unique identifier.
    pub iden: String,
    pub email: Option<String>,
    pub email_normalized: Option<String>,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub max_upload_size: Option<u64>,
    /// Opaque preference map; the server defines the keys.
    #[serde(default)]
    pub preferences: serde_json::Map<String, serde_json::Value>,
    pub created: Option<f64>,
    pub modified: Option<f64>,
}

impl User {
    /// Decode a user from server JSON.
    pub fn from_json(value: serde_json::Value) -> PbResult<Self> {
        serde_json::from_value(value).map_err(PbError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_decode() {
        let json = serde_json::json!({
            "iden": "u1",
            "email": "me@example.com",
            "name": "Me",
            "max_upload_size": 26214400,
            "preferences": {"onboarding": {"app": false}}
        });
        let user = User::from_json(json).unwrap();
        assert_eq!(user.iden, "u1");
        assert_eq!(user.max_upload_size, Some(26_214_400));
        assert!(user.preferences.contains_key("onboarding"));
    }
}
