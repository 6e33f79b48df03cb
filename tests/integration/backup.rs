use predicates::prelude::*;

use crate::common::{TestEnv, stdout_json};

#[test]
fn test_backup_creates_timestamped_copy() {
    let env = TestEnv::new();
    let profile = env.profile("profile", Some("// Betterfox user.js v128.0\n"));
    let dest = env.path("backups");

    env.cmd()
        .arg("backup")
        .arg("--profile")
        .arg(&profile)
        .arg("--dest")
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("[ok] Backup created: "));

    let backups = env.backups_in(&dest);
    assert_eq!(backups.len(), 1);
    let copy = dest.join(&backups[0]);
    assert_eq!(
        std::fs::read_to_string(copy.join("user.js")).unwrap(),
        "// Betterfox user.js v128.0\n"
    );
    assert!(copy.join("storage/default/ls.sqlite").is_file());
}

#[test]
fn test_backup_json_report() {
    let env = TestEnv::new();
    let profile = env.profile("profile", None);
    let dest = env.path("backups");

    let output = env
        .cmd()
        .args(["--format", "json", "backup", "-p"])
        .arg(&profile)
        .arg("-d")
        .arg(&dest)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = stdout_json(&output);
    assert_eq!(report["ok"], true);
    let backup_dir = report["backup_dir"].as_str().unwrap();
    assert!(backup_dir.contains("backup-"));
    assert_eq!(report["log"][0], format!("[ok] Backup created: {backup_dir}"));
}

#[test]
fn test_backup_without_destination_fails() {
    let env = TestEnv::new();
    let profile = env.profile("profile", None);

    env.cmd()
        .arg("backup")
        .arg("--profile")
        .arg(&profile)
        .assert()
        .failure()
        .stdout(predicate::str::contains("[err] Profile or backup folder missing"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn test_backup_missing_profile_dir_fails() {
    let env = TestEnv::new();
    let dest = env.path("backups");

    env.cmd()
        .arg("backup")
        .arg("--profile")
        .arg(env.path("no-such-profile"))
        .arg("--dest")
        .arg(&dest)
        .assert()
        .failure()
        .stdout(predicate::str::contains("[err] Backup: "))
        .stderr(predicate::str::contains("Backup failed"));
}

#[test]
fn test_backup_into_profile_subdirectory_refused() {
    let env = TestEnv::new();
    let profile = env.profile("profile", None);

    env.cmd()
        .arg("backup")
        .arg("--profile")
        .arg(&profile)
        .arg("--dest")
        .arg(profile.join("backups"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("[err] Backup: Cannot back up"))
        .stderr(predicate::str::contains("Backup failed"));
    assert!(!profile.join("backups").exists());
}

#[test]
fn test_backup_paths_from_config() {
    let env = TestEnv::new();
    let profile = env.profile("profile", None);
    let dest = env.path("configured-backups");
    env.write_config(&format!(
        "profile_path = {:?}\nbackup_folder = {:?}\n",
        profile.to_str().unwrap(),
        dest.to_str().unwrap()
    ));

    env.cmd().arg("backup").assert().success();
    assert_eq!(env.backups_in(&dest).len(), 1);
}

#[test]
#[cfg(unix)]
fn test_backup_prunes_expired_backups() {
    use std::time::{Duration, SystemTime};

    let env = TestEnv::new();
    let profile = env.profile("profile", None);
    let dest = env.path("backups");
    let day = Duration::from_secs(86_400);

    for (name, age_days) in [("backup-old", 45u32), ("backup-recent", 5), ("keep-old", 45)] {
        let dir = dest.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::File::open(&dir)
            .unwrap()
            .set_modified(SystemTime::now() - day * age_days)
            .unwrap();
    }

    env.cmd()
        .arg("backup")
        .arg("--profile")
        .arg(&profile)
        .arg("--dest")
        .arg(&dest)
        .args(["--retention-days", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[info] Removed expired backup: "))
        .stdout(predicate::str::contains("backup-old"));

    assert!(!dest.join("backup-old").exists());
    assert!(dest.join("backup-recent").exists());
    assert!(dest.join("keep-old").exists());
    assert_eq!(env.backups_in(&dest).len(), 2);
}
