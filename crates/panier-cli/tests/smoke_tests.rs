//! Smoke tests for the panier CLI
//!
//! None of these launch a browser.

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn panier() -> Command {
    Command::cargo_bin("panier").expect("panier binary should exist")
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    panier()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    panier()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mon-marche.fr"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("steps"));
}

#[test]
fn test_no_args_fails() {
    panier().assert().failure();
}

#[test]
fn test_run_help_lists_flags() {
    panier()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--headed"))
        .stdout(predicate::str::contains("--screenshot-on-failure"));
}

// ============================================================================
// Steps Command
// ============================================================================

#[test]
fn test_steps_lists_four_steps() {
    panier()
        .arg("steps")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. navigate: open https://www.mon-marche.fr"))
        .stdout(predicate::str::contains("2. add_to_cart"))
        .stdout(predicate::str::contains("Mon panier"))
        .stdout(predicate::str::contains("4. assert_cart"));
}

#[test]
fn test_steps_json() {
    let output = panier()
        .args(["steps", "--format", "json", "--product", "Carotte"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 4);
    assert!(value[3]["action"].as_str().unwrap().contains("Carotte"));
}

// ============================================================================
// Configuration Errors (rejected before any browser starts)
// ============================================================================

#[test]
fn test_bad_viewport_rejected() {
    panier()
        .args(["run", "--viewport", "bad"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_non_http_url_rejected() {
    panier()
        .args(["run", "--url", "ftp://x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_empty_product_rejected_by_steps() {
    panier()
        .args(["steps", "--product", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("product must not be empty"));
}
