//! Message model representing a retrieved Zulip message

use chrono::{DateTime, Utc};

/// A single message retrieved from a Zulip server
///
/// Built once per raw API item by [`crate::api::normalize_message`] and never
/// mutated. The `id` is kept for display only; it is never used as a sort or
/// dedup key across fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Server-assigned message ID
    pub id: u64,
    /// When the message was sent
    pub timestamp: DateTime<Utc>,
    /// Display name of the stream (channel) the message was posted to
    pub channel: String,
    /// Topic within the channel
    pub topic: String,
    /// Author's full display name
    pub sender: String,
    /// Zulip-rendered HTML content, treated as untrusted raw text
    pub content: String,
}
