//! Integration tests for argument handling. None of these reach the network.

use std::process::{Command, Output};

/// Run the binary with an empty config and data location.
fn run_cli(args: &[&str]) -> Output {
    let home = tempfile::tempdir().expect("tempdir");
    Command::new(env!("CARGO_BIN_EXE_weathernow"))
        .args(args)
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("WEATHERNOW_API_KEY")
        .output()
        .expect("Failed to execute weathernow")
}

#[test]
fn test_help_lists_commands() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["show", "favorites", "history", "alerts", "configure"] {
        assert!(stdout.contains(command), "help should mention {command}");
    }
}

#[test]
fn test_show_without_location_fails() {
    let output = run_cli(&["show"]);
    assert!(!output.status.success());
}

#[test]
fn test_latitude_requires_longitude() {
    let output = run_cli(&["show", "--lat", "51.5"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--lon"), "unexpected error: {stderr}");
}

#[test]
fn test_city_conflicts_with_coordinates() {
    let output = run_cli(&["show", "London", "--lat", "51.5", "--lon", "-0.12"]);
    assert!(!output.status.success());
}

#[test]
fn test_invalid_sort_order_is_rejected() {
    let output = run_cli(&["history", "list", "--sort", "humidity"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown sort order"), "unexpected error: {stderr}");
}

#[test]
fn test_missing_api_key_points_to_configure() {
    let output = run_cli(&["show", "London"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("weathernow configure"), "unexpected error: {stderr}");
}

#[test]
fn test_empty_history_lists_nothing() {
    let output = run_cli(&["history", "list"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Nothing here yet."));
}
