//! Integration tests for the CaseGuard CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! Passphrase prompts are bypassed through `CASEGUARD_PASSPHRASE`, and
//! every test works inside its own temporary project directory.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASSPHRASE: &str = "correct-horse-battery";

const CASE_CR1: &str = r#"{
    "caseNumber": "CR-1",
    "creationDate": "2024-01-15",
    "nextHearing": "2024-02-20",
    "clientName": "John Doe",
    "clientContact": "+1 555 0100",
    "evidence": ["e1", "e2"],
    "hearings": [],
    "status": "open"
}"#;

/// Helper: get a Command pointing at the caseguard binary.
fn caseguard() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("caseguard").expect("binary should exist")
}

/// Helper: a command bound to `tmp`, identity `u1`, and `passphrase`.
fn caseguard_in(tmp: &TempDir, passphrase: &str) -> Command {
    let mut cmd = caseguard();
    cmd.current_dir(tmp.path())
        .env("CASEGUARD_IDENTITY", "u1")
        .env("CASEGUARD_PASSPHRASE", passphrase)
        .env_remove("CASEGUARD_LOG");
    cmd
}

/// Helper: initialize a vault and store CR-1 in it.
fn vault_with_cr1() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child("cr1.json").write_str(CASE_CR1).unwrap();

    caseguard_in(&tmp, PASSPHRASE).arg("init").assert().success();
    caseguard_in(&tmp, PASSPHRASE)
        .args(["add", "cr1.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored case 'CR-1'"));

    tmp
}

#[test]
fn help_flag_shows_usage() {
    caseguard()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encrypted case record vault"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("set-status"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn version_flag_shows_version() {
    caseguard()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("caseguard"));
}

#[test]
fn no_args_shows_help() {
    caseguard()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_identity_fails() {
    let tmp = TempDir::new().unwrap();
    caseguard()
        .current_dir(tmp.path())
        .env_remove("CASEGUARD_IDENTITY")
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("identity"));
}

#[test]
fn status_before_init_reports_not_initialized() {
    let tmp = TempDir::new().unwrap();
    caseguard_in(&tmp, PASSPHRASE)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("u1"))
        .stdout(predicate::str::contains("not initialized"));
}

#[test]
fn list_before_init_fails() {
    let tmp = TempDir::new().unwrap();
    caseguard_in(&tmp, PASSPHRASE)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no vault exists"));
}

#[test]
fn init_creates_metadata_without_secrets() {
    let tmp = TempDir::new().unwrap();
    caseguard_in(&tmp, PASSPHRASE)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault created"));

    let vaults = tmp.path().join(".caseguard").join("vaults");
    let entries: Vec<_> = std::fs::read_dir(&vaults).unwrap().collect();
    assert_eq!(entries.len(), 1);

    let path = entries[0].as_ref().unwrap().path();
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("caseguard_vault_"));

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"salt\""));
    assert!(!raw.contains(PASSPHRASE));
}

#[test]
fn init_twice_fails() {
    let tmp = TempDir::new().unwrap();
    caseguard_in(&tmp, PASSPHRASE).arg("init").assert().success();
    caseguard_in(&tmp, PASSPHRASE)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_rejects_short_passphrase() {
    let tmp = TempDir::new().unwrap();
    caseguard_in(&tmp, "short")
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));
}

#[test]
fn add_then_list_and_show() {
    let tmp = vault_with_cr1();

    // Nothing in the case file is readable. `dTE` is `u1`, encoded.
    let raw = std::fs::read_to_string(
        tmp.path().join(".caseguard").join("cases").join("dTE.json"),
    )
    .unwrap();
    assert!(!raw.contains("CR-1"));
    assert!(!raw.contains("John Doe"));
    assert!(raw.contains("\"open\""));

    caseguard_in(&tmp, PASSPHRASE)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("CR-1"))
        .stdout(predicate::str::contains("John Doe"));

    caseguard_in(&tmp, PASSPHRASE)
        .args(["show", "CR-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"caseNumber\": \"CR-1\""))
        .stdout(predicate::str::contains("\"e2\""));
}

#[test]
fn adding_same_case_twice_fails() {
    let tmp = vault_with_cr1();
    caseguard_in(&tmp, PASSPHRASE)
        .args(["add", "cr1.json"])
        .assert()
        .failure();
}

#[test]
fn wrong_passphrase_is_reported() {
    let tmp = vault_with_cr1();
    caseguard_in(&tmp, "wrong-passphrase")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect passphrase"))
        .stdout(predicate::str::contains("CR-1").not());
}

#[test]
fn other_identity_cannot_see_vault() {
    let tmp = vault_with_cr1();
    caseguard_in(&tmp, PASSPHRASE)
        .env("CASEGUARD_IDENTITY", "u2")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("not initialized"));
}

#[test]
fn identities_keep_separate_case_files() {
    let tmp = vault_with_cr1();

    tmp.child("cr2.json")
        .write_str(&CASE_CR1.replace("CR-1", "CR-2").replace("John Doe", "Mary Major"))
        .unwrap();

    let as_u2 = || {
        let mut cmd = caseguard_in(&tmp, "u2-passphrase");
        cmd.env("CASEGUARD_IDENTITY", "u2");
        cmd
    };

    as_u2().arg("init").assert().success();
    as_u2()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cases stored: 0"));
    as_u2().args(["add", "cr2.json"]).assert().success();

    as_u2()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("CR-2"))
        .stdout(predicate::str::contains("CR-1").not());

    caseguard_in(&tmp, PASSPHRASE)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("CR-1"))
        .stdout(predicate::str::contains("CR-2").not());

    caseguard_in(&tmp, PASSPHRASE)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cases stored: 1"));
}

#[test]
fn corrupt_metadata_is_reported_as_corruption() {
    let tmp = TempDir::new().unwrap();
    caseguard_in(&tmp, PASSPHRASE).arg("init").assert().success();

    let vaults = tmp.path().join(".caseguard").join("vaults");
    for entry in std::fs::read_dir(&vaults).unwrap() {
        std::fs::write(entry.unwrap().path(), "{garbage").unwrap();
    }

    for command in ["list", "status", "init"] {
        caseguard_in(&tmp, PASSPHRASE)
            .arg(command)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Data corrupted"))
            .stderr(predicate::str::contains("no vault exists").not())
            .stdout(predicate::str::contains("not initialized").not());
    }
}

#[test]
fn set_status_and_filter() {
    let tmp = vault_with_cr1();

    caseguard_in(&tmp, PASSPHRASE)
        .args(["set-status", "CR-1", "awaitingCourt"])
        .assert()
        .success();

    caseguard_in(&tmp, PASSPHRASE)
        .args(["list", "--status", "open"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CR-1").not());

    caseguard_in(&tmp, PASSPHRASE)
        .args(["list", "--status", "awaitingCourt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CR-1"));
}

#[test]
fn set_status_rejects_unknown_status() {
    let tmp = vault_with_cr1();
    caseguard_in(&tmp, PASSPHRASE)
        .args(["set-status", "CR-1", "pending"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown status"));
}

#[test]
fn auto_status_marks_past_hearing_awaiting_court() {
    let tmp = vault_with_cr1();
    caseguard_in(&tmp, PASSPHRASE)
        .args(["auto-status", "CR-1"])
        .assert()
        .success();

    caseguard_in(&tmp, PASSPHRASE)
        .args(["show", "CR-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"awaitingCourt\""));
}

#[test]
fn delete_removes_case() {
    let tmp = vault_with_cr1();
    caseguard_in(&tmp, PASSPHRASE)
        .args(["delete", "CR-1", "--force"])
        .assert()
        .success();

    caseguard_in(&tmp, PASSPHRASE)
        .args(["show", "CR-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn export_writes_plaintext_json() {
    let tmp = vault_with_cr1();
    caseguard_in(&tmp, PASSPHRASE)
        .args(["export", "--output", "out.json"])
        .assert()
        .success();

    tmp.child("out.json")
        .assert(predicate::str::contains("\"clientName\": \"John Doe\""));
}

#[test]
fn data_dir_flag_overrides_default() {
    let tmp = TempDir::new().unwrap();
    let custom = tmp.path().join("elsewhere");

    caseguard_in(&tmp, PASSPHRASE)
        .args(["init", "--data-dir", custom.to_str().unwrap()])
        .assert()
        .success();

    assert!(custom.join("vaults").is_dir());
    assert!(!tmp.path().join(".caseguard").exists());
}

#[test]
fn config_rejects_weak_kdf_cost() {
    let tmp = TempDir::new().unwrap();
    tmp.child("caseguard.toml")
        .write_str("kdf_iterations = 1000\n")
        .unwrap();

    caseguard_in(&tmp, PASSPHRASE)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("kdf_iterations"));
}
