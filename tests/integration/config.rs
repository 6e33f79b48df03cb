use predicates::prelude::*;

use crate::common::{TestEnv, stdout_json};

#[test]
fn test_config_path_honours_env() {
    let env = TestEnv::new();
    env.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(env.config_path().to_str().unwrap()));
}

#[test]
fn test_config_init_and_show() {
    let env = TestEnv::new();

    env.cmd()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config"));
    assert!(env.config_path().is_file());

    env.cmd()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    env.cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("retention_days     = 60"))
        .stdout(predicate::str::contains("raw.githubusercontent.com"));
}

#[test]
fn test_config_set_round_trip() {
    let env = TestEnv::new();

    env.cmd().args(["config", "set", "retention_days", "14"]).assert().success();
    env.cmd().args(["config", "set", "auto_backup", "false"]).assert().success();
    env.cmd().args(["config", "set", "backup_folder", "/srv/fx-backups"]).assert().success();

    let output = env.cmd().args(["--format", "json", "config", "show"]).output().unwrap();
    assert!(output.status.success());
    let settings = stdout_json(&output);
    assert_eq!(settings["retention_days"], 14);
    assert_eq!(settings["auto_backup"], false);
    assert_eq!(settings["backup_folder"], "/srv/fx-backups");

    env.cmd().args(["config", "set", "backup_folder", ""]).assert().success();
    let output = env.cmd().args(["--format", "json", "config"]).output().unwrap();
    assert!(stdout_json(&output).get("backup_folder").is_none());
}

#[test]
fn test_config_set_unknown_key() {
    let env = TestEnv::new();
    env.cmd()
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key 'colour'"));
    assert!(!env.config_path().exists());
}

#[test]
fn test_broken_config_reported_and_recoverable() {
    let env = TestEnv::new();
    env.write_config("retention_days = [\n");

    env.cmd()
        .arg("profiles")
        .args(["--profiles-dir"])
        .arg(env.path("ff"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));

    env.cmd().args(["config", "init", "--force"]).assert().success();
    env.cmd().args(["config", "show"]).assert().success();
}
