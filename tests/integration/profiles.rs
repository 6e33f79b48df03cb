use predicates::prelude::*;

use crate::common::{TestEnv, stdout_json};

const REGISTRY: &str = "\
[Install4F96D1932A9F858E]
Default=Profiles/abcd.default-release
Locked=1

[Profile1]
Name=default
IsRelative=1
Path=Profiles/wxyz.default

[Profile0]
Name=default-release
IsRelative=1
Path=Profiles/abcd.default-release
Default=1

[Profile2]
Name=duplicate
IsRelative=1
Path=Profiles/abcd.default-release

[General]
StartWithLastProfile=1
Version=2
";

#[test]
fn test_profiles_lists_registry_entries() {
    let env = TestEnv::new();
    let firefox = env.path("firefox");
    std::fs::create_dir_all(&firefox).unwrap();
    std::fs::write(firefox.join("profiles.ini"), REGISTRY).unwrap();

    env.cmd()
        .arg("profiles")
        .arg("--profiles-dir")
        .arg(&firefox)
        .assert()
        .success()
        .stdout(predicate::str::contains("default-release"))
        .stdout(predicate::str::contains("wxyz.default"))
        .stdout(predicate::str::contains("duplicate").not());
}

#[test]
fn test_profiles_json() {
    let env = TestEnv::new();
    let firefox = env.path("firefox");
    std::fs::create_dir_all(&firefox).unwrap();
    std::fs::write(firefox.join("profiles.ini"), REGISTRY).unwrap();

    let output = env
        .cmd()
        .args(["--format", "json", "profiles", "--profiles-dir"])
        .arg(&firefox)
        .output()
        .unwrap();
    assert!(output.status.success());

    let profiles = stdout_json(&output);
    let profiles = profiles.as_array().unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0]["name"], "default");
    assert_eq!(
        profiles[0]["path"].as_str().unwrap(),
        firefox.join("Profiles/wxyz.default").to_str().unwrap()
    );
    assert_eq!(profiles[1]["name"], "default-release");
}

#[test]
fn test_profiles_missing_registry_is_empty() {
    let env = TestEnv::new();

    env.cmd()
        .args(["profiles", "--profiles-dir"])
        .arg(env.path("no-firefox-here"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No Firefox profiles found"));

    let output = env
        .cmd()
        .args(["profiles", "--format", "json", "--profiles-dir"])
        .arg(env.path("no-firefox-here"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!([]));
}

#[test]
fn test_profiles_dir_from_config() {
    let env = TestEnv::new();
    let firefox = env.path("configured-firefox");
    std::fs::create_dir_all(&firefox).unwrap();
    std::fs::write(firefox.join("profiles.ini"), "[Profile0]\nName=work\nPath=work.profile\n")
        .unwrap();
    env.write_config(&format!("profiles_dir = {:?}\n", firefox.to_str().unwrap()));

    env.cmd()
        .arg("profiles")
        .assert()
        .success()
        .stdout(predicate::str::contains("work"))
        .stdout(predicate::str::contains("work.profile"));
}
