//! Integration tests for the case repositories.

use caseguard::cases::{
    CaseRepository, EncryptedCase, EncryptedHearing, JsonCaseFile, MemoryCaseRepository, Status,
};
use caseguard::errors::CaseGuardError;
use tempfile::TempDir;

/// Stored cases are opaque to the repository, so plain placeholder
/// strings stand in for ciphertext here.
fn stored(key: &str, status: Status) -> EncryptedCase {
    EncryptedCase {
        case_number: key.into(),
        creation_date: format!("{key}-created"),
        next_hearing: format!("{key}-next"),
        client_name: format!("{key}-client"),
        client_contact: format!("{key}-contact"),
        evidence: vec![],
        hearings: vec![],
        status,
    }
}

fn hearing(tag: &str) -> EncryptedHearing {
    EncryptedHearing {
        date: format!("{tag}-date"),
        outcome: format!("{tag}-outcome"),
        notes: format!("{tag}-notes"),
        status: Status::Scheduled,
    }
}

/// Behaviour every backend must share.
fn exercise_repository<R: CaseRepository>(repo: &mut R) {
    repo.add_case(stored("k1", Status::Open)).unwrap();
    repo.add_cases(vec![stored("k2", Status::Scheduled), stored("k3", Status::Open)])
        .unwrap();

    let keys: Vec<String> = repo
        .list_cases()
        .unwrap()
        .into_iter()
        .map(|c| c.case_number)
        .collect();
    assert_eq!(keys, ["k1", "k2", "k3"]);

    // Collisions.
    assert!(matches!(
        repo.add_case(stored("k1", Status::Closed)),
        Err(CaseGuardError::CaseAlreadyExists)
    ));
    assert!(matches!(
        repo.add_cases(vec![stored("k4", Status::Open), stored("k2", Status::Open)]),
        Err(CaseGuardError::CaseAlreadyExists)
    ));
    assert!(repo.get_case("k4").unwrap().is_none(), "batch is all-or-nothing");

    // Status filtering.
    let open: Vec<String> = repo
        .list_cases_by_status(Status::Open)
        .unwrap()
        .into_iter()
        .map(|c| c.case_number)
        .collect();
    assert_eq!(open, ["k1", "k3"]);
    assert!(repo.list_cases_by_status(Status::Closed).unwrap().is_empty());

    // Field updates.
    repo.update_status("k1", Status::AwaitingCourt).unwrap();
    repo.add_evidence("k1", "ev-a".into()).unwrap();
    repo.add_evidence("k1", "ev-b".into()).unwrap();
    repo.add_hearing("k1", hearing("h1")).unwrap();

    let k1 = repo.get_case("k1").unwrap().unwrap();
    assert_eq!(k1.status, Status::AwaitingCourt);
    assert_eq!(k1.evidence, ["ev-a", "ev-b"]);
    assert_eq!(k1.hearings, [hearing("h1")]);

    // Whole-record replacement.
    let mut replacement = stored("k2", Status::Closed);
    replacement.client_name = "k2-client-v2".into();
    repo.update_case(replacement.clone()).unwrap();
    assert_eq!(repo.get_case("k2").unwrap(), Some(replacement));

    // Delete.
    repo.delete_case("k3").unwrap();
    assert!(repo.get_case("k3").unwrap().is_none());
    assert_eq!(repo.list_cases().unwrap().len(), 2);

    // Unknown keys.
    assert!(matches!(repo.delete_case("missing"), Err(CaseGuardError::CaseNotFound)));
    assert!(matches!(
        repo.update_status("missing", Status::Open),
        Err(CaseGuardError::CaseNotFound)
    ));
    assert!(matches!(
        repo.add_evidence("missing", "x".into()),
        Err(CaseGuardError::CaseNotFound)
    ));
    assert!(matches!(
        repo.update_case(stored("missing", Status::Open)),
        Err(CaseGuardError::CaseNotFound)
    ));
}

#[test]
fn memory_repository_operations() {
    let mut repo = MemoryCaseRepository::new();
    exercise_repository(&mut repo);
}

#[test]
fn json_file_repository_operations() {
    let dir = TempDir::new().unwrap();
    let mut repo = JsonCaseFile::open(&dir.path().join("cases.json")).unwrap();
    assert!(repo.is_empty());
    exercise_repository(&mut repo);
    assert_eq!(repo.len(), 2);
}

#[test]
fn json_file_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("cases.json");

    {
        let mut repo = JsonCaseFile::open(&path).unwrap();
        repo.add_case(stored("k1", Status::Open)).unwrap();
        repo.add_hearing("k1", hearing("h1")).unwrap();
        repo.update_status("k1", Status::Scheduled).unwrap();
    }

    let repo = JsonCaseFile::open(&path).unwrap();
    let k1 = repo.get_case("k1").unwrap().unwrap();
    assert_eq!(k1.status, Status::Scheduled);
    assert_eq!(k1.hearings.len(), 1);

    // On-disk wire names are camelCase.
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"caseNumber\""));
    assert!(raw.contains("\"scheduled\""));
}

#[test]
fn failed_mutation_does_not_touch_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cases.json");

    let mut repo = JsonCaseFile::open(&path).unwrap();
    repo.add_case(stored("k1", Status::Open)).unwrap();
    let before = std::fs::read(&path).unwrap();

    assert!(repo.add_case(stored("k1", Status::Closed)).is_err());
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn corrupt_case_file_is_malformed_input() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cases.json");
    std::fs::write(&path, "[{ not json").unwrap();

    let err = JsonCaseFile::open(&path).unwrap_err();
    assert!(matches!(err, CaseGuardError::MalformedInput(_)));
}
