//! Zulip API HTTP client
//!
//! Uses synchronous HTTP (ureq) with Basic auth (`email:api_key`), one
//! request per export run. No retries and no timeout layer here.

use anyhow::{Context, Result};
use base64::prelude::*;
use url::Url;

use super::MessageSource;
use super::wire::GetMessagesResponse;
use crate::config::ZulipCredentials;
use crate::fetch::GetMessagesRequest;

/// Error indicating the server rejected the supplied credentials
#[derive(Debug, thiserror::Error)]
#[error("Zulip server rejected the credentials (HTTP 401)")]
pub struct AuthFailedError;

/// Zulip REST API client for fetching messages
pub struct ZulipClient {
    /// Server base URL without a trailing slash, e.g. "https://chat.example.com"
    site: String,
    /// Precomputed `Basic <base64(email:api_key)>` header value
    auth_header: String,
}

impl ZulipClient {
    /// Create a client from credentials, normalizing the site address
    pub fn new(credentials: &ZulipCredentials) -> Result<Self> {
        let site = normalize_site(&credentials.site)?;
        let token =
            BASE64_STANDARD.encode(format!("{}:{}", credentials.email, credentials.api_key));

        Ok(Self {
            site,
            auth_header: format!("Basic {}", token),
        })
    }

    /// Build the messages endpoint URL with the request as query parameters
    ///
    /// The narrow clauses travel as URL-encoded JSON, preserving their
    /// construction order.
    fn messages_url(&self, request: &GetMessagesRequest) -> Result<String> {
        let narrow_json =
            serde_json::to_string(&request.narrow).context("Failed to serialize narrow filter")?;

        Ok(format!(
            "{}/api/v1/messages?anchor={}&num_before={}&num_after={}&narrow={}",
            self.site,
            request.anchor,
            request.num_before,
            request.num_after,
            urlencoding::encode(&narrow_json),
        ))
    }
}

impl MessageSource for ZulipClient {
    fn get_messages(&self, request: &GetMessagesRequest) -> Result<GetMessagesResponse> {
        let url = self.messages_url(request)?;

        let response = ureq::get(&url)
            .header("Authorization", &self.auth_header)
            .call();

        match response {
            Ok(mut resp) => {
                let messages: GetMessagesResponse = resp
                    .body_mut()
                    .read_json()
                    .context("Failed to parse get messages response")?;
                Ok(messages)
            }
            Err(ureq::Error::StatusCode(401)) => Err(AuthFailedError.into()),
            Err(e) => Err(anyhow::anyhow!("Failed to fetch messages: {}", e)),
        }
    }
}

/// Normalize a user-supplied server address to `scheme://host[:port]`
///
/// A bare host like "chat.example.com" gets an https:// scheme; non-http(s)
/// schemes are rejected.
fn normalize_site(site: &str) -> Result<String> {
    let site = site.trim();
    let with_scheme = if site.contains("://") {
        site.to_string()
    } else {
        format!("https://{}", site)
    };

    let url = Url::parse(&with_scheme)
        .with_context(|| format!("Invalid Zulip server address: {}", site))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        anyhow::bail!("Unsupported Zulip server scheme: {}", url.scheme());
    }

    Ok(with_scheme.trim_end_matches('/').to_string())
}
