//! Protocol constants for the PushBullet v2 API.

/// Client version (reported in the User-Agent header).
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum size of a pushed file, in bytes (25 MiB).
pub const MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

/// Fallback MIME type when sniffing fails and no explicit type is given.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Fixed REST endpoints of the hosted service.
pub mod endpoints {
    pub const PUSHES: &str = "https://api.pushbullet.com/v2/pushes";
    pub const DEVICES: &str = "https://api.pushbullet.com/v2/devices";
    pub const CONTACTS: &str = "https://api.pushbullet.com/v2/contacts";
    pub const UPLOAD_REQUEST: &str = "https://api.pushbullet.com/v2/upload-request";
    pub const USERS_ME: &str = "https://api.pushbullet.com/v2/users/me";
    pub const CHANNELS: &str = "https://api.pushbullet.com/v2/channels";
    pub const SUBSCRIPTIONS: &str = "https://api.pushbullet.com/v2/subscriptions";
    pub const CHANNEL_INFO: &str = "https://api.pushbullet.com/v2/channel-info";
    pub const EPHEMERALS: &str = "https://api.pushbullet.com/v2/ephemerals";
    /// Phonebook endpoint prefix; the device iden is appended after an
    /// underscore, e.g. `.../phonebook_udx234`.
    pub const PHONEBOOK: &str = "https://api.pushbullet.com/v2/permanents/phonebook";
}

/// Constants for the SMS ephemeral envelope.
pub mod sms {
    /// Ephemeral type discriminator.
    pub const EPHEMERAL_TYPE: &str = "push";
    /// Push type for a messaging extension reply.
    pub const PUSH_TYPE: &str = "messaging_extension_reply";
    /// Android package that handles the reply on the device.
    pub const PACKAGE_NAME: &str = "com.pushbullet.android";
}
