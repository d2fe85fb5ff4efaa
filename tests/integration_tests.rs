//! Integration tests for Pacer CLI

use assert_cmd::Command;
use predicates::prelude::*;

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("pacer").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pausable Concurrent Workers"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("pacer").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pacer"));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    let mut cmd = Command::cargo_bin("pacer").unwrap();
    cmd.arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Prime search below 100 must find exactly 25 primes
#[test]
fn test_primes_below_100() {
    let mut cmd = Command::cargo_bin("pacer").unwrap();
    cmd.args(["primes", "--max", "100", "--workers", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total primes found:"))
        .stdout(predicate::str::contains("25"));
}

/// The worker count must not change the total
#[test]
fn test_primes_total_is_worker_count_independent() {
    for workers in ["1", "3", "5"] {
        let output = Command::cargo_bin("pacer")
            .unwrap()
            .args(["primes", "--max", "1000", "--workers", workers, "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let report: serde_json::Value =
            serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["total_primes"], 168, "workers = {workers}");
    }
}

/// JSON output carries per-worker ranges and counts
#[test]
fn test_primes_json_report_shape() {
    let output = Command::cargo_bin("pacer")
        .unwrap()
        .args(["primes", "--max", "30", "--workers", "3", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["max"], 30);
    assert_eq!(report["total_primes"], 10);
    let workers = report["workers"].as_array().unwrap();
    assert_eq!(workers.len(), 3);
    assert_eq!(workers[0]["start"], 0);
    assert_eq!(workers[0]["end"], 9);
    assert_eq!(workers[0]["primes_found"], 4);
    assert_eq!(workers[2]["end"], 30);
    assert_eq!(workers[2]["primes_found"], 2);
}

/// --show-primes includes the primes themselves in the JSON report
#[test]
fn test_primes_json_with_show_primes() {
    let output = Command::cargo_bin("pacer")
        .unwrap()
        .args([
            "primes", "--max", "10", "--workers", "1", "--show-primes", "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        report["workers"][0]["primes"],
        serde_json::json!([2, 3, 5, 7])
    );
}

/// Zero workers is a contract violation, reported before any search runs
#[test]
fn test_primes_rejects_impossible_partition() {
    let mut cmd = Command::cargo_bin("pacer").unwrap();
    cmd.args(["primes", "--max", "3", "--workers", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot split"));
}

/// A quick race assigns every lane a unique rank and exactly one winner
#[test]
fn test_race_json_report() {
    let output = Command::cargo_bin("pacer")
        .unwrap()
        .args([
            "race",
            "--lanes",
            "3",
            "--track-length",
            "5",
            "--step-ms",
            "1",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let finishers = report["finishers"].as_array().unwrap();
    assert_eq!(finishers.len(), 3);
    let mut ranks: Vec<u64> = finishers
        .iter()
        .map(|f| f["rank"].as_u64().unwrap())
        .collect();
    ranks.sort_unstable();
    assert_eq!(ranks, vec![1, 2, 3]);
    assert_eq!(report["winner"], finishers[0]["name"]);
}

/// Unknown output formats are rejected
#[test]
fn test_unknown_format_is_rejected() {
    let mut cmd = Command::cargo_bin("pacer").unwrap();
    cmd.args(["primes", "--max", "10", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported output format"));
}

/// version subcommand prints the package name
#[test]
fn test_version_subcommand() {
    let mut cmd = Command::cargo_bin("pacer").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pacer v"));
}
