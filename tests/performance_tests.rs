use assert_cmd::cargo_bin;
use std::process::Command;

mod common;

#[test]
fn test_large_file_streaming() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("large_test.csv");
    common::generate_large_csv(&input, 2).expect("Failed to generate large CSV");

    let output = Command::new(cargo_bin!("queuedesk"))
        .arg(&input)
        .arg("--log-level")
        .arg("warn")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "Binary failed to process 2MB file");

    let stdout = String::from_utf8_lossy(&output.stdout);
    // Header plus one row per account
    assert_eq!(stdout.lines().count(), 51);
}
