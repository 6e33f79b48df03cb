use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use super::RemoteSource;
use crate::constants;
use crate::core::BfupError;

/// [`RemoteSource`] backed by a shared `reqwest` client.
///
/// Every request identifies itself with `User-Agent: Betterfox-Updater` and
/// accepts both plain text and JSON. Any status >= 400 is reported as
/// [`BfupError::HttpStatus`]; connection and body failures as
/// [`BfupError::Network`]. No timeout is configured: a request that never
/// completes blocks its caller.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Build the client with the identifying headers installed.
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(constants::USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(constants::ACCEPT));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
        })
    }
}

impl RemoteSource for HttpSource {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| BfupError::Network {
            operation: format!("GET {url}"),
            reason: e.to_string(),
        })?;

        let status = response.status();
        debug!("GET {} -> {}", url, status);
        if status.as_u16() >= 400 {
            return Err(BfupError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        let body = response.text().await.map_err(|e| BfupError::Network {
            operation: format!("read body of {url}"),
            reason: e.to_string(),
        })?;
        Ok(body)
    }
}
