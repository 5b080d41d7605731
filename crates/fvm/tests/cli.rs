#![cfg(unix)]

use std::path::Path;
use std::process::{Command, Output};

fn fvm(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fvm"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_DATA_HOME", home.join(".local").join("share"))
        .env_remove("FVM_HOME")
        .env_remove("FVM_ACTIVE_LINK")
        .output()
        .expect("run fvm binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn dir_prints_overridden_locations() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let workspace = temp_dir.path().join("versions");
    let link = temp_dir.path().join("flutter");

    let output = fvm(
        temp_dir.path(),
        &[
            "dir",
            "--workspace",
            &workspace.to_string_lossy(),
            "--active-link",
            &link.to_string_lossy(),
        ],
    );

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains(&workspace.display().to_string()));
    assert!(stdout.contains(&link.display().to_string()));
}

#[test]
fn list_reads_installed_versions_as_json() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let workspace = temp_dir.path().join("versions");
    let stable = workspace.join("stable");
    std::fs::create_dir_all(&stable).expect("create stable");
    std::fs::write(stable.join("version"), "3.0.0\n").expect("descriptor");
    std::fs::write(
        stable.join(".fvm-install.json"),
        r#"{"identifier":"stable","completed_at":"2024-01-01T00:00:00Z"}"#,
    )
    .expect("completion marker");
    std::os::unix::fs::symlink(&stable, temp_dir.path().join("flutter")).expect("active link");

    let output = fvm(
        temp_dir.path(),
        &[
            "list",
            "--json",
            "--workspace",
            &workspace.to_string_lossy(),
            "--active-link",
            &temp_dir.path().join("flutter").to_string_lossy(),
        ],
    );

    assert!(output.status.success());
    let listed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("list prints JSON");
    assert_eq!(listed[0]["name"], "stable");
    assert_eq!(listed[0]["number"], "3.0.0");
    assert_eq!(listed[0]["active"], true);
}

#[test]
fn empty_workspace_lists_nothing() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");

    let output = fvm(temp_dir.path(), &["list"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("No Flutter versions installed"));
}

#[test]
fn removing_unknown_version_exits_with_failure() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let workspace = temp_dir.path().join("versions");
    std::fs::create_dir_all(&workspace).expect("create workspace");

    let output = fvm(
        temp_dir.path(),
        &["remove", "beta", "--workspace", &workspace.to_string_lossy()],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Version not installed: beta"));
}

#[test]
fn invalid_settings_fall_back_to_defaults() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let config_dir = temp_dir.path().join(".config").join("fvm");
    std::fs::create_dir_all(&config_dir).expect("create config dir");
    std::fs::write(config_dir.join("settings.json"), "{ broken").expect("write settings");

    let output = fvm(temp_dir.path(), &["channels"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "master\ndev\nbeta\nstable\n");
}
