//! Zulip REST API integration
//!
//! This module provides:
//! - The `MessageSource` trait, the seam between fetch strategies and the server
//! - `ZulipClient`, the blocking HTTP implementation
//! - Response normalization to domain models

mod client;
mod normalize;

pub use client::{AuthFailedError, ZulipClient};
pub use normalize::normalize_message;

use anyhow::Result;

use crate::fetch::GetMessagesRequest;

/// Wire types for the GET /api/v1/messages endpoint
pub mod wire {
    use serde::Deserialize;

    /// Response from fetching messages
    #[derive(Debug, Clone, Deserialize)]
    pub struct GetMessagesResponse {
        pub messages: Vec<RawMessage>,
        /// Whether the newest matching message was inside the fetch window
        pub found_newest: Option<bool>,
        /// Whether the oldest matching message was inside the fetch window
        pub found_oldest: Option<bool>,
    }

    /// A single raw message item from the server
    ///
    /// All six fields are required; an item missing any of them fails parsing
    /// for the whole response rather than being skipped.
    #[derive(Debug, Clone, Deserialize)]
    pub struct RawMessage {
        pub id: u64,
        /// Epoch seconds
        pub timestamp: i64,
        /// Stream display name
        pub display_recipient: String,
        /// Topic name
        pub subject: String,
        pub sender_full_name: String,
        /// Zulip-rendered HTML
        pub content: String,
    }
}

/// Abstraction over the remote message API
///
/// `ZulipClient` is the production implementation; tests substitute an
/// in-memory fake. Authentication, retries and rate limiting are the
/// implementation's concern, not the callers'.
pub trait MessageSource {
    fn get_messages(&self, request: &GetMessagesRequest) -> Result<wire::GetMessagesResponse>;
}
