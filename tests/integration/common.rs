use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub use bfup_cli::test_utils::write_profile;

/// Isolated sandbox: every path a test touches lives under one temp dir.
pub struct TestEnv {
    temp: TempDir,
    config_path: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        bfup_cli::test_utils::init_test_logging(None);
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("bfup").join("config.toml");
        Self {
            temp,
            config_path,
        }
    }

    /// `bfup` with the sandboxed config and no colors or inherited log filter.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("bfup").unwrap();
        cmd.env("BFUP_CONFIG_PATH", &self.config_path)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .current_dir(self.temp.path());
        cmd
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn write_config(&self, toml: &str) {
        std::fs::create_dir_all(self.config_path.parent().unwrap()).unwrap();
        std::fs::write(&self.config_path, toml).unwrap();
    }

    /// Profile directory `name` with an optional `user.js`.
    pub fn profile(&self, name: &str, user_js: Option<&str>) -> PathBuf {
        let dir = self.path(name);
        write_profile(&dir, user_js).unwrap();
        dir
    }

    /// Names of the `backup-*` entries under `root`, sorted.
    pub fn backups_in(&self, root: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("backup-"))
            .collect();
        names.sort();
        names
    }
}

/// Parse a command's stdout as JSON.
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
