//! PushBullet Core - Foundation types shared by the client crates.
//!
//! This crate provides the pieces every other crate depends on:
//! - The unified error type covering transport, API, and local failures
//! - API endpoint URLs and protocol constants

pub mod constants;
pub mod error;

// Re-export commonly used items at the crate root
pub use error::{PbError, PbResult, PushFailure};
