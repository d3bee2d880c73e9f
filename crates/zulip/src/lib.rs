//! Zulip crate - Business logic for exporting Zulip messages
//!
//! This crate provides everything the CLI binary needs:
//! - Domain model for retrieved messages
//! - Zulip REST API client and response normalization
//! - Fetch strategies (unread-only, channel+topic) and their configuration
//! - Persistence strategies (plain text, CSV)
//! - Export orchestration wiring a fetch strategy to a saver
//!
//! This crate has zero CLI dependencies; argument parsing and process exit
//! behavior live in the `quill` binary.

pub mod api;
pub mod config;
pub mod export;
pub mod fetch;
pub mod models;
pub mod storage;

pub use api::{AuthFailedError, MessageSource, ZulipClient, normalize_message};
pub use config::ZulipCredentials;
pub use export::{ExportStats, export_messages, run_export};
pub use fetch::{
    Anchor, FetchConfig, FetchMode, GetMessagesRequest, MAX_FETCH_MESSAGES, MessageFetcher,
    NarrowClause,
};
pub use models::Message;
pub use storage::{CsvSaver, MessageSaver, SaveFormat, TextSaver, save_to_file};
