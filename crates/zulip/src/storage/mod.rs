//! Message persistence
//!
//! Format-specific savers behind one trait. The whole record set is
//! materialized before any write begins; the text format needs a global sort
//! first.

mod csv;
mod text;

pub use csv::CsvSaver;
pub use text::TextSaver;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::models::Message;

/// A format-specific message writer
pub trait MessageSaver {
    fn write_messages<W: Write>(&self, writer: &mut W, messages: &[Message]) -> Result<()>;
}

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    /// Human-readable text blocks, oldest first
    Txt,
    /// One CSV row per message, fetch order
    Csv,
}

impl SaveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Txt => "txt",
            SaveFormat::Csv => "csv",
        }
    }
}

impl FromStr for SaveFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "txt" => Ok(SaveFormat::Txt),
            "csv" => Ok(SaveFormat::Csv),
            other => anyhow::bail!("Unknown output format: {}", other),
        }
    }
}

/// Write `messages` to a file at `path` in `format`
///
/// Overwrites an existing file. Returns the number of records written; a
/// failed write propagates with the path in its context and leaves whatever
/// the file handle got out.
pub fn save_to_file(path: &Path, format: SaveFormat, messages: &[Message]) -> Result<usize> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        SaveFormat::Txt => TextSaver::new().write_messages(&mut writer, messages)?,
        SaveFormat::Csv => CsvSaver::new().write_messages(&mut writer, messages)?,
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    Ok(messages.len())
}
