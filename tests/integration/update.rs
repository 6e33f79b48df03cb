use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{TestEnv, stdout_json};

const UPSTREAM: &str = "/******\n* Betterfox user.js v130.0\n******/\nuser_pref(\"browser.startup.page\", 3);\n";

/// Mock upstream serving `user.js` and a one-commit history.
async fn upstream() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user.js"))
        .and(header("user-agent", "Betterfox-Updater"))
        .respond_with(ResponseTemplate::new(200).set_body_string(UPSTREAM))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "sha": "0123abc", "commit": { "committer": { "date": "2024-10-05T08:09:10Z" } } }
        ])))
        .mount(&server)
        .await;
    server
}

/// Mock upstream where `user.js` is gone.
async fn broken_upstream() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user.js"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;
    server
}

fn remote_config(server: &MockServer) -> String {
    format!(
        "[remote]\nraw_url = \"{0}/user.js\"\ncommits_url = \"{0}/commits\"\n",
        server.uri()
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_reports_versions() {
    let server = upstream().await;
    let env = TestEnv::new();
    env.write_config(&remote_config(&server));
    let profile = env.profile("profile", Some("// Betterfox user.js v128.0\n"));

    env.cmd()
        .arg("check")
        .arg("--profile")
        .arg(&profile)
        .assert()
        .success()
        .stdout(predicate::str::contains("v128.0"))
        .stdout(predicate::str::contains("v130.0"))
        .stdout(predicate::str::contains("2024-10-05 08:09:10"))
        .stdout(predicate::str::contains("update available"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_json_without_profile() {
    let server = upstream().await;
    let env = TestEnv::new();
    env.write_config(&remote_config(&server));

    let output = env.cmd().args(["check", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({
            "local": "n/d",
            "remote": "v130.0",
            "github": "2024-10-05 08:09:10",
            "firefox": "n/d",
            "update_available": true
        })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_offline_is_not_an_error() {
    let server = broken_upstream().await;
    let env = TestEnv::new();
    env.write_config(&remote_config(&server));

    let output = env.cmd().args(["--format", "json", "check"]).output().unwrap();
    assert!(output.status.success());
    let status = stdout_json(&output);
    assert_eq!(status["remote"], "n/d");
    assert_eq!(status["github"], "n/d");
    assert_eq!(status["update_available"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_with_auto_backup() {
    let server = upstream().await;
    let env = TestEnv::new();
    let profile = env.profile("profile", Some("// Betterfox user.js v128.0\n"));
    let backups = env.path("backups");
    env.write_config(&format!(
        "backup_folder = {:?}\n{}",
        backups.to_str().unwrap(),
        remote_config(&server)
    ));

    env.cmd()
        .arg("update")
        .arg("--profile")
        .arg(&profile)
        .assert()
        .success()
        .stdout(predicate::str::contains("[ok] Backup created: "))
        .stdout(predicate::str::contains("[ok] Updated to v130.0"));

    assert_eq!(std::fs::read_to_string(profile.join("user.js")).unwrap(), UPSTREAM);
    let saved = env.backups_in(&backups);
    assert_eq!(saved.len(), 1);
    assert_eq!(
        std::fs::read_to_string(backups.join(&saved[0]).join("user.js")).unwrap(),
        "// Betterfox user.js v128.0\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_warns_without_backup_folder() {
    let server = upstream().await;
    let env = TestEnv::new();
    env.write_config(&remote_config(&server));
    let profile = env.profile("profile", None);

    env.cmd()
        .arg("update")
        .arg("-p")
        .arg(&profile)
        .assert()
        .success()
        .stdout(predicate::str::contains("[warn] Backup skipped, backup folder not configured"))
        .stdout(predicate::str::contains("[ok] Updated to v130.0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_no_backup_flag() {
    let server = upstream().await;
    let env = TestEnv::new();
    let backups = env.path("backups");
    env.write_config(&format!(
        "backup_folder = {:?}\n{}",
        backups.to_str().unwrap(),
        remote_config(&server)
    ));
    let profile = env.profile("profile", None);

    env.cmd()
        .arg("update")
        .arg("-p")
        .arg(&profile)
        .arg("--no-backup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup").not());
    assert!(!backups.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_continues_after_failed_backup() {
    let server = upstream().await;
    let env = TestEnv::new();
    env.write_config(&remote_config(&server));
    let profile = env.profile("profile", None);
    let occupied = env.path("occupied");
    std::fs::write(&occupied, "not a directory").unwrap();

    let output = env
        .cmd()
        .args(["--format", "json", "update", "--profile"])
        .arg(&profile)
        .arg("--backup-dir")
        .arg(&occupied)
        .output()
        .unwrap();
    assert!(output.status.success());

    let flow = stdout_json(&output);
    assert_eq!(flow["ok"], true);
    assert_eq!(flow["version"], "v130.0");
    assert_eq!(flow["backup"]["ok"], false);
    let log: Vec<&str> = flow["log"].as_array().unwrap().iter().map(|l| l.as_str().unwrap()).collect();
    assert!(log[0].starts_with("[err] Backup: "));
    assert_eq!(log[1], "[warn] Backup failed, continuing with update");
    assert_eq!(log[2], "[ok] Updated to v130.0");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_download_failure_leaves_profile_alone() {
    let server = broken_upstream().await;
    let env = TestEnv::new();
    env.write_config(&remote_config(&server));
    let profile = env.profile("profile", Some("// Betterfox user.js v128.0\n"));

    env.cmd()
        .args(["update", "--no-backup", "--profile"])
        .arg(&profile)
        .assert()
        .failure()
        .stdout(predicate::str::contains("[err] Update: Download failed"))
        .stderr(predicate::str::contains("Update failed"));

    assert_eq!(
        std::fs::read_to_string(profile.join("user.js")).unwrap(),
        "// Betterfox user.js v128.0\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_without_profile_makes_no_requests() {
    let server = upstream().await;
    let env = TestEnv::new();
    env.write_config(&remote_config(&server));

    env.cmd()
        .arg("update")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[err] Profile not set"))
        .stderr(predicate::str::contains("--profile"));

    assert!(server.received_requests().await.unwrap().is_empty());
}
