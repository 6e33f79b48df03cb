//! Upstream access: the transport seam and the metadata fetcher built on it.
//!
//! # Architecture
//!
//! - [`RemoteSource`]: the two transport capabilities the core needs,
//!   `fetch_text` and `fetch_json`. [`HttpSource`] implements them over
//!   `reqwest`; tests substitute an in-memory source.
//! - [`RemoteMetadataFetcher`]: issues the raw `user.js` download and the
//!   last-commit lookup concurrently and folds both into one [`RemoteSnapshot`].
//!
//! # Failure Model
//!
//! Snapshots are all-or-nothing. Both requests are always awaited; if either
//! failed, the snapshot is `{ version: "n/d", commit_date: "n/d", content: "" }`
//! and the failure is only logged. A commit list that parses as JSON but lacks
//! the expected shape is not a failure: only `commit_date` becomes `"n/d"`.

mod http;

pub use http::HttpSource;

use anyhow::{Context, Result};
use serde_json::Value;
use std::future::Future;
use tracing::{debug, warn};

use crate::constants::{self, NOT_DETERMINED};
use crate::version::{VersionString, parse_version};

/// Transport capability used by the core.
///
/// Implementations fail on connection errors and on HTTP status >= 400.
pub trait RemoteSource: Send + Sync {
    /// GET `url` and return the body as text.
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String>> + Send;

    /// GET `url` and decode the body as JSON.
    fn fetch_json(&self, url: &str) -> impl Future<Output = Result<Value>> + Send {
        async move {
            let text = self.fetch_text(url).await?;
            serde_json::from_str(&text).with_context(|| format!("Malformed JSON from {url}"))
        }
    }
}

/// Upstream locations for the raw file and its commit history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoints {
    /// Raw `user.js` download URL.
    pub raw_url: String,
    /// Commits API URL returning at most one commit for `user.js`.
    pub commits_url: String,
}

impl Default for RemoteEndpoints {
    fn default() -> Self {
        Self {
            raw_url: constants::USERJS_URL.to_string(),
            commits_url: constants::COMMITS_URL.to_string(),
        }
    }
}

/// One fetch attempt's combined result. Never cached or persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSnapshot {
    /// Version parsed from `content`.
    pub version: VersionString,
    /// Last commit timestamp as `YYYY-MM-DD HH:MM:SS`, or `"n/d"`.
    pub commit_date: String,
    /// Raw `user.js` text; empty when the fetch failed.
    pub content: String,
}

impl RemoteSnapshot {
    /// The snapshot reported when either request failed.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            version: VersionString::NotDetermined,
            commit_date: NOT_DETERMINED.to_string(),
            content: String::new(),
        }
    }

    /// Whether content was downloaded.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !self.content.is_empty()
    }
}

/// Combines the raw download and the commit lookup into a [`RemoteSnapshot`].
#[derive(Debug, Clone)]
pub struct RemoteMetadataFetcher<S> {
    source: S,
    endpoints: RemoteEndpoints,
}

impl<S: RemoteSource> RemoteMetadataFetcher<S> {
    /// Fetcher over `source` using the given endpoints.
    pub const fn new(source: S, endpoints: RemoteEndpoints) -> Self {
        Self {
            source,
            endpoints,
        }
    }

    /// Transport in use.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Endpoints in use.
    pub const fn endpoints(&self) -> &RemoteEndpoints {
        &self.endpoints
    }

    /// Fetch both resources concurrently and assemble a snapshot.
    ///
    /// Never fails; see the [module docs](self) for the failure model.
    pub async fn get_remote_meta(&self) -> RemoteSnapshot {
        let (raw, commits) = tokio::join!(
            self.source.fetch_text(&self.endpoints.raw_url),
            self.source.fetch_json(&self.endpoints.commits_url),
        );

        let (raw, commits) = match (raw, commits) {
            (Ok(raw), Ok(commits)) => (raw, commits),
            (raw, commits) => {
                if let Err(e) = raw {
                    warn!("remote fetch {}: {:#}", self.endpoints.raw_url, e);
                }
                if let Err(e) = commits {
                    warn!("last commit {}: {:#}", self.endpoints.commits_url, e);
                }
                return RemoteSnapshot::unavailable();
            }
        };

        let version = parse_version(&raw);
        let commit_date = last_commit_date(&commits).unwrap_or_else(|| NOT_DETERMINED.to_string());
        debug!("Remote snapshot: version={}, commit_date={}", version, commit_date);

        RemoteSnapshot {
            version,
            commit_date,
            content: raw,
        }
    }
}

/// Timestamp of the first commit in a GitHub commit list, normalised to
/// `YYYY-MM-DD HH:MM:SS`.
///
/// Reads `commit.committer.date`, falling back to `commit.author.date`.
/// Returns `None` for anything that is not a non-empty array of commits
/// carrying such a string.
#[must_use]
pub fn last_commit_date(commits: &Value) -> Option<String> {
    let commit = commits.as_array()?.first()?.get("commit")?;
    let date = ["committer", "author"]
        .iter()
        .find_map(|who| commit.get(*who)?.get("date")?.as_str())?;
    Some(normalize_timestamp(date))
}

/// `2024-11-02T10:20:30Z` becomes `2024-11-02 10:20:30`.
fn normalize_timestamp(iso: &str) -> String {
    let spaced = iso.replacen('T', " ", 1);
    match spaced.strip_suffix('Z') {
        Some(trimmed) => trimmed.to_string(),
        None => spaced,
    }
}
