//! File upload authorization model.

use pb_core::error::{PbError, PbResult};
use serde::{Deserialize, Serialize};

/// Response of the `/upload-request` endpoint: where to upload the file and
/// which form fields the storage host requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadAuthorization {
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    /// Public URL the file will be served from once uploaded.
    pub file_url: String,
    /// Where to POST the multipart upload.
    pub upload_url: String,
    /// Opaque form fields the upload host requires, forwarded verbatim.
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl UploadAuthorization {
    /// Decode an upload authorization from server JSON.
    pub fn from_json(value: serde_json::Value) -> PbResult<Self> {
        serde_json::from_value(value).map_err(PbError::from)
    }

    /// The opaque fields as string pairs, ready for a multipart form.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        self.data
            .iter()
            .map(|(k, v)| {
                let rendered = match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), rendered)
            })
            .collect()
    }
}
