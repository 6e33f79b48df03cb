//! Firefox profile discovery from `profiles.ini`.
//!
//! The registry is a line-oriented INI file kept in the browser's base
//! directory (see [`crate::utils::platform::firefox_base_dir`]):
//!
//! ```ini
//! [Install4F96D1932A9F858E]
//! Default=Profiles/abcd.default-release
//!
//! [Profile0]
//! Name=default-release
//! IsRelative=1
//! Path=Profiles/abcd.default-release
//! ```
//!
//! # Scanning Rules
//!
//! The scanner is a single-state machine (`Collecting`) over an accumulator:
//!
//! - a line starting with `[Profile` or `[Install` clears the accumulator
//! - `Name=<value>` sets the display name (an empty value leaves it unset)
//! - `Path=<value>` sets the path, joined onto the base directory; absolute
//!   values replace the base, which covers `IsRelative=0` profiles, and an
//!   empty value means the base directory itself
//! - after every line, if both fields are set and no descriptor emitted so far
//!   has the same path, the descriptor is emitted and the accumulator cleared
//!
//! Emission does not wait for the next header, so a section yields its
//! descriptor as soon as its second field arrives. A duplicate path is not
//! emitted and does not clear the accumulator.
//!
//! Discovery never fails outward: a missing base directory, a missing
//! registry, or an unreadable file all produce an empty list.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::PROFILES_INI;

/// One discovered browser profile.
///
/// Descriptors from a single scan never share a `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDescriptor {
    /// Display name from the `Name=` line.
    pub name: String,
    /// Profile directory, resolved against the registry's base directory.
    pub path: PathBuf,
}

/// Partially filled descriptor for the section being read.
#[derive(Debug, Default)]
struct Accumulator {
    name: Option<String>,
    path: Option<PathBuf>,
}

/// Scanner state. There is only one state; the transition that fires when
/// both fields are set re-enters it with a cleared accumulator.
#[derive(Debug)]
enum ScanState {
    Collecting(Accumulator),
}

/// Line-at-a-time `profiles.ini` scanner.
#[derive(Debug)]
struct RegistryScanner<'a> {
    base: &'a Path,
    state: ScanState,
    emitted: Vec<ProfileDescriptor>,
}

impl<'a> RegistryScanner<'a> {
    fn new(base: &'a Path) -> Self {
        Self {
            base,
            state: ScanState::Collecting(Accumulator::default()),
            emitted: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        let ScanState::Collecting(acc) = &mut self.state;

        if line.starts_with("[Profile") || line.starts_with("[Install") {
            *acc = Accumulator::default();
        } else if let Some(name) = line.strip_prefix("Name=") {
            let name = name.trim();
            acc.name = (!name.is_empty()).then(|| name.to_string());
        } else if let Some(rel) = line.strip_prefix("Path=") {
            let rel = rel.trim();
            acc.path = Some(if rel.is_empty() { self.base.to_path_buf() } else { self.base.join(rel) });
        }

        if let (Some(name), Some(path)) = (&acc.name, &acc.path)
            && !self.emitted.iter().any(|p| &p.path == path)
        {
            self.emitted.push(ProfileDescriptor {
                name: name.clone(),
                path: path.clone(),
            });
            self.state = ScanState::Collecting(Accumulator::default());
        }
    }

    fn finish(self) -> Vec<ProfileDescriptor> {
        self.emitted
    }
}

/// Parse registry `content`, resolving relative paths against `base`.
#[must_use]
pub fn parse_registry(content: &str, base: &Path) -> Vec<ProfileDescriptor> {
    let mut scanner = RegistryScanner::new(base);
    for line in content.lines() {
        scanner.feed(line);
    }
    scanner.finish()
}

/// Locates and reads the profile registry under one base directory.
///
/// # Examples
///
/// ```rust,no_run
/// use bfup_cli::profile::ProfileLocator;
///
/// let locator = ProfileLocator::platform_default();
/// for profile in locator.list_profiles() {
///     println!("{} -> {}", profile.name, profile.path.display());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ProfileLocator {
    base_dir: PathBuf,
}

impl ProfileLocator {
    /// Locator rooted at an explicit base directory (the one holding `profiles.ini`).
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Locator rooted at the platform's Firefox directory.
    ///
    /// When the environment does not provide one, the base is empty and
    /// [`list_profiles`](Self::list_profiles) returns nothing.
    #[must_use]
    pub fn platform_default() -> Self {
        Self::new(crate::utils::platform::firefox_base_dir())
    }

    /// Base directory in use.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Full path of the registry file.
    #[must_use]
    pub fn registry_path(&self) -> PathBuf {
        self.base_dir.join(PROFILES_INI)
    }

    /// Scan the registry afresh. Never fails; see the [module docs](self).
    #[must_use]
    pub fn list_profiles(&self) -> Vec<ProfileDescriptor> {
        if self.base_dir.as_os_str().is_empty() {
            debug!("No profile base directory available");
            return Vec::new();
        }

        let ini = self.registry_path();
        if !ini.exists() {
            debug!("Profile registry not found at {}", ini.display());
            return Vec::new();
        }

        match std::fs::read_to_string(&ini) {
            Ok(content) => {
                let profiles = parse_registry(&content, &self.base_dir);
                debug!("Found {} profile(s) in {}", profiles.len(), ini.display());
                profiles
            }
            Err(e) => {
                warn!("Failed to read profile registry {}: {}", ini.display(), e);
                Vec::new()
            }
        }
    }
}
