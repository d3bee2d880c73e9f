//! Export orchestration
//!
//! Wires a fetch strategy to a persistence strategy: fetch raw items,
//! normalize them to domain models, write the file. One network call and one
//! file write per run, everything blocking, no retries.

use std::path::Path;

use anyhow::Result;
use log::{info, warn};

use crate::api::{MessageSource, ZulipClient, normalize_message};
use crate::config::ZulipCredentials;
use crate::fetch::{FetchMode, MAX_FETCH_MESSAGES, MessageFetcher};
use crate::models::Message;
use crate::storage::{SaveFormat, save_to_file};

/// Statistics from an export run
#[derive(Debug, Default, Clone)]
pub struct ExportStats {
    /// Number of messages written to the output file
    pub messages_written: usize,
    /// Duration of the export
    pub duration_ms: u64,
}

/// Fetch messages per `mode` from `source` and write them to `output`
///
/// Normalization aborts on the first malformed item; nothing is written in
/// that case.
pub fn export_messages(
    source: &dyn MessageSource,
    mode: &FetchMode,
    output: &Path,
    format: SaveFormat,
) -> Result<ExportStats> {
    let start = std::time::Instant::now();

    let fetcher = MessageFetcher::new(source, mode);
    let response = fetcher.fetch_messages()?;
    info!("Fetched {} messages", response.messages.len());

    if response.found_oldest == Some(false) {
        warn!(
            "More than {} matching messages; older ones were not retrieved",
            MAX_FETCH_MESSAGES
        );
    }

    let messages: Vec<Message> = response
        .messages
        .into_iter()
        .map(normalize_message)
        .collect::<Result<_>>()?;

    let messages_written = save_to_file(output, format, &messages)?;
    info!("Wrote {} messages to {}", messages_written, output.display());

    Ok(ExportStats {
        messages_written,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Boundary entry point for the CLI: build the API client and export
pub fn run_export(
    credentials: &ZulipCredentials,
    mode: &FetchMode,
    output: &Path,
    format: SaveFormat,
) -> Result<ExportStats> {
    let client = ZulipClient::new(credentials)?;
    export_messages(&client, mode, output, format)
}
