//! Global error types for the PushBullet client.
//!
//! Every failure the library can produce is a variant of `PbError`. The
//! mapping from HTTP outcomes is fixed: 401/403 become `InvalidToken`, 404
//! becomes `NotFound`, any other status >= 400 becomes `Connection` with the
//! status attached, and a request that never got a response becomes
//! `Connection` without one. The remaining variants are local precondition
//! failures raised before any network call.

use thiserror::Error;

/// Convenience type alias for Results using PbError.
pub type PbResult<T> = Result<T, PbError>;

/// A single failed target inside a batch push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushFailure {
    /// Device iden the push was addressed to.
    pub target: String,
    /// Rendered error for that target.
    pub reason: String,
}

/// Unified error type for the PushBullet client.
#[derive(Error, Debug)]
pub enum PbError {
    // -- Transport / API errors --
    /// Network failure (no response) or an unclassified HTTP error status.
    #[error("connection error{}: {message}", status_suffix(.status))]
    Connection {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Transport error or server-supplied error detail.
        message: String,
    },

    /// The access token was rejected (HTTP 401 or 403).
    #[error("invalid access token: {0}")]
    InvalidToken(String),

    /// The requested object does not exist (HTTP 404 or a local lookup miss).
    #[error("not found: {0}")]
    NotFound(String),

    // -- Local precondition errors --
    /// The recipient is malformed or missing (e.g. an invalid email address).
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    /// The target cannot receive pushes.
    #[error("not pushable: {0}")]
    NotPushable(String),

    /// The device has no SMS capability.
    #[error("no sms support: {0}")]
    NoSms(String),

    /// The local file cannot be pushed (unreadable or over the size limit).
    #[error("file push error: {0}")]
    FilePush(String),

    /// The operation has been retired by the service.
    #[error("deprecated: {0}")]
    Deprecated(String),

    /// A channel operation that is invalid for the channel's current state.
    #[error("channel error: {0}")]
    Channel(String),

    // -- Data errors --
    /// Server JSON did not match the expected schema.
    #[error("decode error: {0}")]
    Decode(String),

    /// Local file system access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    // -- Aggregates --
    /// One or more targets of a batch push failed; successful pushes in the
    /// same batch stay sent.
    #[error("batch push failed for {} target(s): {}", .failures.len(), failure_list(.failures))]
    PushBatch {
        /// The failed targets, in send order.
        failures: Vec<PushFailure>,
    },
}

impl PbError {
    /// Shorthand for a transport-level connection failure.
    pub fn connection(message: impl Into<String>) -> Self {
        PbError::Connection {
            status: None,
            message: message.into(),
        }
    }

    /// The HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            PbError::Connection { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PbError {
    fn from(e: serde_json::Error) -> Self {
        PbError::Decode(e.to_string())
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}

fn failure_list(failures: &[PushFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.target, f.reason))
        .collect::<Vec<_>>()
        .join("; ")
}
