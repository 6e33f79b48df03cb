//! Test utilities for BFUP
//!
//! Shared helpers for unit tests and the integration suite:
//!
//! - [`init_test_logging`] - one-time tracing setup that writes through the test harness
//! - [`FakeSource`] - in-memory [`RemoteSource`] that records every URL it is asked for
//! - [`write_profile`] - builds a small profile tree on disk

use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::remote::RemoteSource;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses the provided level, or `RUST_LOG` when set; otherwise stays silent.
///
/// ```bash
/// RUST_LOG=bfup_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// In-memory [`RemoteSource`].
///
/// URLs registered with [`with_text`](Self::with_text) answer with their body;
/// any other URL fails like a connection error would.
#[derive(Debug, Default)]
pub struct FakeSource {
    responses: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FakeSource {
    /// Source with no registered URLs; every request fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `body`.
    #[must_use]
    pub fn with_text(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), body.to_string());
        self
    }

    /// Every URL requested so far, sorted.
    pub fn requests(&self) -> Vec<String> {
        let mut requests = self.requests.lock().map(|r| r.clone()).unwrap_or_default();
        requests.sort();
        requests
    }
}

impl RemoteSource for FakeSource {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.responses.get(url).cloned().ok_or_else(|| anyhow!("connection refused: {url}"))
    }
}

/// Create a profile directory with a `prefs.js`, a nested storage file and,
/// when given, a `user.js`.
pub fn write_profile(dir: &Path, user_js: Option<&str>) -> Result<()> {
    std::fs::create_dir_all(dir.join("storage").join("default"))?;
    std::fs::write(dir.join("prefs.js"), "user_pref(\"browser.startup.page\", 3);\n")?;
    std::fs::write(dir.join("storage").join("default").join("ls.sqlite"), [1u8, 2, 3, 4])?;
    if let Some(content) = user_js {
        std::fs::write(dir.join(crate::constants::USER_JS), content)?;
    }
    Ok(())
}
