//! PushBullet API - HTTP client for the PushBullet v2 REST API.
//!
//! The crate is layered the way requests flow: a [`transport::Transport`]
//! executes one classified HTTP request, a [`session::Session`] binds the
//! transport to an access token, [`pushable::PushTarget`] shapes push
//! payloads for any recipient, the [`entities`] wrap server objects with
//! their mutation operations, and [`client::Pushbullet`] is the account
//! entry point with memoized device/contact/channel lookups.

pub mod client;
pub mod entities;
pub mod pushable;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export key types
pub use client::{ListOptions, Pushbullet};
pub use entities::{Channel, ChannelKind, Contact, Device, PhonebookEntry, Push};
pub use pushable::{FilePushOptions, PushTarget, Recipient};
pub use session::Session;
pub use transport::{ApiRequest, Body, HttpTransport, Transport};
