//! Data models organized by API object type.

pub mod channel;
pub mod contact;
pub mod device;
pub mod phonebook;
pub mod push;
pub mod upload;
pub mod user;
