//! quill - export Zulip messages to a file
//!
//! This is the command-line entry point. It resolves credentials, picks the
//! fetch mode and output format, and hands off to the zulip crate.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::warn;
use zulip::{FetchMode, SaveFormat, ZulipCredentials, run_export};

/// Export Zulip messages to a text or CSV file.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Zulip account email. Overrides the credentials file and environment.
    #[arg(long)]
    email: Option<String>,

    /// Zulip API key.
    #[arg(long)]
    api_key: Option<String>,

    /// Zulip server address, e.g. "https://chat.example.com".
    #[arg(long)]
    site: Option<String>,

    /// Path to a credentials JSON file (keys: email, api_key, site).
    #[arg(long, value_name = "PATH")]
    credentials: Option<PathBuf>,

    /// Fetch all unread messages. Takes priority over --stream/--topic.
    #[arg(long)]
    unread: bool,

    /// Stream (channel) to fetch from. Requires --topic.
    #[arg(long, requires = "topic")]
    stream: Option<String>,

    /// Topic to fetch within the stream. Requires --stream.
    #[arg(long, requires = "stream")]
    topic: Option<String>,

    /// Output file path.
    #[arg(short, long, default_value = "messages.txt")]
    output: PathBuf,

    /// Output file format.
    #[arg(short, long, value_enum, default_value_t = Format::Txt)]
    format: Format,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Human-readable text blocks, oldest first
    Txt,
    /// One row per message, fetch order
    Csv,
}

impl From<Format> for SaveFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Txt => SaveFormat::Txt,
            Format::Csv => SaveFormat::Csv,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let mode = resolve_mode(&cli)?;
    let credentials = resolve_credentials(&cli)?;

    let stats = run_export(&credentials, &mode, &cli.output, cli.format.into())?;

    println!(
        "Saved {} messages to {}",
        stats.messages_written,
        cli.output.display()
    );
    Ok(())
}

/// Apply the mode precedence: --unread wins; otherwise a complete
/// --stream/--topic pair; neither is a usage error.
fn resolve_mode(cli: &Cli) -> Result<FetchMode> {
    if cli.unread {
        return Ok(FetchMode::Unread);
    }

    match (&cli.stream, &cli.topic) {
        (Some(stream), Some(topic)) => {
            if stream.is_empty() || topic.is_empty() {
                bail!("--stream and --topic must be non-empty");
            }
            Ok(FetchMode::Topic {
                stream: stream.clone(),
                topic: topic.clone(),
            })
        }
        _ => bail!("Select messages with either --unread or --stream plus --topic"),
    }
}

/// Resolve credentials: flags override file/env values per field
fn resolve_credentials(cli: &Cli) -> Result<ZulipCredentials> {
    let loaded = if let Some(path) = &cli.credentials {
        Some(ZulipCredentials::from_file(path)?)
    } else if cli.email.is_some() && cli.api_key.is_some() && cli.site.is_some() {
        None
    } else {
        match ZulipCredentials::load() {
            Ok(creds) => Some(creds),
            Err(e) => {
                warn!("No stored Zulip credentials: {}", e);
                if let Some(path) = ZulipCredentials::default_credentials_path() {
                    warn!(
                        "To configure access, either:\n\
                         1. Place a credentials JSON (email, api_key, site) at: {}\n\
                         2. Or set ZULIP_EMAIL, ZULIP_API_KEY and ZULIP_SITE\n\
                         3. Or pass --email, --api-key and --site",
                        path.display()
                    );
                }
                None
            }
        }
    };

    let field = |flag: &Option<String>, stored: fn(&ZulipCredentials) -> &String| {
        flag.clone()
            .or_else(|| loaded.as_ref().map(|c| stored(c).clone()))
    };

    Ok(ZulipCredentials {
        email: field(&cli.email, |c| &c.email).context("Missing Zulip account email (--email)")?,
        api_key: field(&cli.api_key, |c| &c.api_key).context("Missing Zulip API key (--api-key)")?,
        site: field(&cli.site, |c| &c.site).context("Missing Zulip server address (--site)")?,
    })
}
