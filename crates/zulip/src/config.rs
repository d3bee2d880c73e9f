//! Credential loading for Zulip API access
//!
//! Supports loading credentials from (in order of priority):
//! 1. JSON file (~/.config/quill/credentials.json)
//! 2. Runtime environment variables

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Directory name under the OS config dir
const CONFIG_DIR: &str = "quill";
/// Credentials filename in the quill config directory
const CREDENTIALS_FILE: &str = "credentials.json";

/// Credentials for Zulip API access
#[derive(Debug, Clone)]
pub struct ZulipCredentials {
    /// Account email, e.g. "exporter-bot@example.com"
    pub email: String,
    /// API key from the Zulip personal settings page
    pub api_key: String,
    /// Server address, e.g. "https://chat.example.com"
    pub site: String,
}

/// Flat credential file format
#[derive(Deserialize)]
struct CredentialFile {
    email: String,
    api_key: String,
    site: String,
}

impl ZulipCredentials {
    /// Load credentials using the following priority:
    /// 1. JSON file (~/.config/quill/credentials.json)
    /// 2. Runtime environment variables
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_credentials_path()
            && path.exists()
        {
            return Self::from_file(&path);
        }

        Self::from_env()
    }

    /// Load credentials from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials file: {}", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("Failed to parse credentials file: {}", path.display()))
    }

    /// Parse credentials from a JSON string (keys: email, api_key, site)
    pub fn from_json(json: &str) -> Result<Self> {
        let creds: CredentialFile =
            serde_json::from_str(json).context("Failed to parse credentials JSON")?;

        Ok(Self {
            email: creds.email,
            api_key: creds.api_key,
            site: creds.site,
        })
    }

    /// Load credentials from environment variables
    pub fn from_env() -> Result<Self> {
        let email =
            std::env::var("ZULIP_EMAIL").context("ZULIP_EMAIL environment variable not set")?;
        let api_key =
            std::env::var("ZULIP_API_KEY").context("ZULIP_API_KEY environment variable not set")?;
        let site =
            std::env::var("ZULIP_SITE").context("ZULIP_SITE environment variable not set")?;

        Ok(Self {
            email,
            api_key,
            site,
        })
    }

    /// Get the default credentials file path (~/.config/quill/credentials.json)
    pub fn default_credentials_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CREDENTIALS_FILE))
    }
}
