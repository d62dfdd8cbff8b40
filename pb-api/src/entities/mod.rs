//! Entity wrappers: server objects paired with the session that fetched
//! them, exposing their mutation operations.
//!
//! Mutations never update a wrapper in place: they return a fresh value
//! decoded from the server's response, or nothing once the server has no
//! representation left (post-delete).

pub mod channel;
pub mod contact;
pub mod device;
pub mod phonebook;
pub mod push;

pub use channel::{Channel, ChannelKind};
pub use contact::Contact;
pub use device::Device;
pub use phonebook::PhonebookEntry;
pub use push::Push;
