//! PushBullet Models - Typed structs for every object the API returns.
//!
//! Each model is an explicit schema: unknown fields are ignored, required
//! fields (the server-assigned `iden`, mostly) fail decoding with
//! `PbError::Decode` when absent. Models carry no credential and perform no
//! I/O; the entity wrappers in `pb-api` pair them with a session.

pub mod models;

pub use models::channel::{ChannelInfo, ChannelSummary};
pub use models::contact::ContactInfo;
pub use models::device::DeviceInfo;
pub use models::phonebook::PhonebookEntryInfo;
pub use models::push::{PushData, PushType};
pub use models::upload::UploadAuthorization;
pub use models::user::User;
