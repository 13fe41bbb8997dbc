#![cfg(feature = "cli")]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::process::Command;

const HEXCLI_EXE: &str = env!("CARGO_BIN_EXE_hexcli");

fn prepare(dir: &str, name: &str, content: &[u8]) -> String {
    std::fs::create_dir_all(dir).expect("Failed to create test dir");
    let path = format!("{dir}/{name}");
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(HEXCLI_EXE)
        .args(args)
        .output()
        .expect("Failed to run hexcli")
}

#[test]
fn test_hexcli_shows_help() {
    for flag in ["--help", "help", "-h"] {
        // Act
        let output = run(&[flag]);

        // Assert
        assert!(
            output.status.success(),
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(
            stdout.contains("Usage"),
            "stdout did not look like help text:\n{stdout}"
        );
    }
}

#[test]
fn test_hexcli_dump() {
    // Arrange
    let data: Vec<u8> = (0u8..20).collect();
    let path = prepare("build/cli_t1", "dump.bin", &data);

    // Act
    let output = run(&["dump", &path]);

    // Assert
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "unexpected dump:\n{stdout}");
    assert!(lines[0].starts_with("Offset    00 01 02"));
    assert!(lines[1].starts_with("00000000  00 01 02 03"));
    assert!(lines[2].starts_with("00000010  10 11 12 13"));
}

#[test]
fn test_hexcli_find() {
    // Arrange
    let mut data = vec![0u8; 300];
    data[100..102].copy_from_slice(&[0x41, 0x42]);
    let path = prepare("build/cli_t2", "find.bin", &data);

    // Act
    let output = run(&["find", &path, "41 42"]);

    // Assert
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("0x0000_0064") && stdout.contains("1 match(es)"),
        "stdout did not look like search results:\n{stdout}"
    );
}

#[test]
fn test_hexcli_hash_expect() {
    // Arrange
    let path = prepare("build/cli_t3", "hash.bin", b"abc");

    // Act
    let ok = run(&["hash", &path, "--expect", "352441C2"]);
    let bad = run(&["hash", &path, "--expect", "deadbeef"]);

    // Assert
    assert!(ok.status.success());
    assert!(String::from_utf8_lossy(&ok.stdout).contains("Match: CRC32"));
    assert!(!bad.status.success());
}

#[test]
fn test_hexcli_compare() {
    // Arrange
    let left = prepare("build/cli_t4", "left.bin", b"abcdef");
    let right = prepare("build/cli_t4", "right.bin", b"abXYef");

    // Act
    let output = run(&["compare", &left, &right]);

    // Assert
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Differences: 2 bytes") && stdout.contains("0x0000_0002 - 0x0000_0003"),
        "stdout did not look like compare text:\n{stdout}"
    );
}

#[test]
fn test_hexcli_missing_file() {
    // Act
    let output = run(&["info", "build/cli_t5/missing.bin"]);

    // Assert
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("File not found"),
        "stderr did not look like error text:\n{stderr}"
    );
}
