//! The record store collaborator.
//!
//! A `CaseRepository` only ever sees `EncryptedCase` values. Cases are
//! addressed by their *encrypted* case number: because every encryption
//! uses a fresh nonce, that blob is an opaque handle, and callers must
//! keep the blob they read back rather than re-encrypting the number.
//! `Status` is the one attribute the store can inspect, which is what
//! `list_cases_by_status` filters on.

use std::fs;
use std::path::{Path, PathBuf};

use super::model::{EncryptedCase, EncryptedHearing, Status};
use crate::errors::{CaseGuardError, Result};
use crate::vault::metadata::write_atomic;

/// Storage backend for encrypted case records.
pub trait CaseRepository {
    /// Store a new case. Fails with `CaseAlreadyExists` on a key collision.
    fn add_case(&mut self, case: EncryptedCase) -> Result<()>;

    /// Store several new cases; nothing is stored if any one collides.
    fn add_cases(&mut self, cases: Vec<EncryptedCase>) -> Result<()>;

    /// Replace the case whose encrypted case number matches.
    fn update_case(&mut self, case: EncryptedCase) -> Result<()>;

    /// Remove a case.
    fn delete_case(&mut self, case_number: &str) -> Result<()>;

    /// Look up a case by its encrypted case number.
    fn get_case(&self, case_number: &str) -> Result<Option<EncryptedCase>>;

    /// All cases, in insertion order.
    fn list_cases(&self) -> Result<Vec<EncryptedCase>>;

    /// Cases whose plaintext status equals `status`.
    fn list_cases_by_status(&self, status: Status) -> Result<Vec<EncryptedCase>>;

    /// Change only the status of a case.
    fn update_status(&mut self, case_number: &str, status: Status) -> Result<()>;

    /// Append an encrypted evidence item to a case.
    fn add_evidence(&mut self, case_number: &str, evidence: String) -> Result<()>;

    /// Append an encrypted hearing to a case.
    fn add_hearing(&mut self, case_number: &str, hearing: EncryptedHearing) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Shared in-memory list operations
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
struct CaseList {
    cases: Vec<EncryptedCase>,
}

impl CaseList {
    fn position(&self, case_number: &str) -> Option<usize> {
        self.cases.iter().position(|c| c.case_number == case_number)
    }

    fn find_mut(&mut self, case_number: &str) -> Result<&mut EncryptedCase> {
        self.cases
            .iter_mut()
            .find(|c| c.case_number == case_number)
            .ok_or(CaseGuardError::CaseNotFound)
    }

    fn add(&mut self, case: EncryptedCase) -> Result<()> {
        if self.position(&case.case_number).is_some() {
            return Err(CaseGuardError::CaseAlreadyExists);
        }
        self.cases.push(case);
        Ok(())
    }

    fn add_many(&mut self, cases: Vec<EncryptedCase>) -> Result<()> {
        for (i, case) in cases.iter().enumerate() {
            let dup_in_batch = cases[..i].iter().any(|c| c.case_number == case.case_number);
            if dup_in_batch || self.position(&case.case_number).is_some() {
                return Err(CaseGuardError::CaseAlreadyExists);
            }
        }
        self.cases.extend(cases);
        Ok(())
    }

    fn update(&mut self, case: EncryptedCase) -> Result<()> {
        let slot = self.find_mut(&case.case_number)?;
        *slot = case;
        Ok(())
    }

    fn delete(&mut self, case_number: &str) -> Result<()> {
        let idx = self.position(case_number).ok_or(CaseGuardError::CaseNotFound)?;
        self.cases.remove(idx);
        Ok(())
    }

    fn get(&self, case_number: &str) -> Option<EncryptedCase> {
        self.position(case_number).map(|i| self.cases[i].clone())
    }

    fn by_status(&self, status: Status) -> Vec<EncryptedCase> {
        self.cases
            .iter()
            .filter(|c| c.status == status)
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// MemoryCaseRepository
// ---------------------------------------------------------------------------

/// Volatile case store for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryCaseRepository {
    inner: CaseList,
}

impl MemoryCaseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CaseRepository for MemoryCaseRepository {
    fn add_case(&mut self, case: EncryptedCase) -> Result<()> {
        self.inner.add(case)
    }

    fn add_cases(&mut self, cases: Vec<EncryptedCase>) -> Result<()> {
        self.inner.add_many(cases)
    }

    fn update_case(&mut self, case: EncryptedCase) -> Result<()> {
        self.inner.update(case)
    }

    fn delete_case(&mut self, case_number: &str) -> Result<()> {
        self.inner.delete(case_number)
    }

    fn get_case(&self, case_number: &str) -> Result<Option<EncryptedCase>> {
        Ok(self.inner.get(case_number))
    }

    fn list_cases(&self) -> Result<Vec<EncryptedCase>> {
        Ok(self.inner.cases.clone())
    }

    fn list_cases_by_status(&self, status: Status) -> Result<Vec<EncryptedCase>> {
        Ok(self.inner.by_status(status))
    }

    fn update_status(&mut self, case_number: &str, status: Status) -> Result<()> {
        self.inner.find_mut(case_number)?.status = status;
        Ok(())
    }

    fn add_evidence(&mut self, case_number: &str, evidence: String) -> Result<()> {
        self.inner.find_mut(case_number)?.evidence.push(evidence);
        Ok(())
    }

    fn add_hearing(&mut self, case_number: &str, hearing: EncryptedHearing) -> Result<()> {
        self.inner.find_mut(case_number)?.hearings.push(hearing);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JsonCaseFile
// ---------------------------------------------------------------------------

/// Case store persisted as a JSON array of `EncryptedCase` on disk.
///
/// Every mutation rewrites the file atomically (temp file + rename). The
/// file only ever contains ciphertext and status values.
#[derive(Debug)]
pub struct JsonCaseFile {
    path: PathBuf,
    inner: CaseList,
}

impl JsonCaseFile {
    /// Open the case file at `path`, starting empty if it does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        let cases = if path.exists() {
            let data = fs::read(path)?;
            serde_json::from_slice(&data)
                .map_err(|e| CaseGuardError::MalformedInput(format!("case file: {e}")))?
        } else {
            Vec::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            inner: CaseList { cases },
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored cases.
    pub fn len(&self) -> usize {
        self.inner.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.cases.is_empty()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec_pretty(&self.inner.cases)
            .map_err(|e| CaseGuardError::SerializationError(format!("case file: {e}")))?;
        write_atomic(&self.path, &data)?;
        tracing::debug!(path = %self.path.display(), cases = self.len(), "case file written");
        Ok(())
    }

    /// Apply a mutation and persist it; the in-memory list is left
    /// untouched when the mutation itself fails.
    fn mutate<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut CaseList) -> Result<()>,
    {
        let mut next = self.inner.clone();
        f(&mut next)?;
        self.inner = next;
        self.persist()
    }
}

impl CaseRepository for JsonCaseFile {
    fn add_case(&mut self, case: EncryptedCase) -> Result<()> {
        self.mutate(|list| list.add(case))
    }

    fn add_cases(&mut self, cases: Vec<EncryptedCase>) -> Result<()> {
        self.mutate(|list| list.add_many(cases))
    }

    fn update_case(&mut self, case: EncryptedCase) -> Result<()> {
        self.mutate(|list| list.update(case))
    }

    fn delete_case(&mut self, case_number: &str) -> Result<()> {
        self.mutate(|list| list.delete(case_number))
    }

    fn get_case(&self, case_number: &str) -> Result<Option<EncryptedCase>> {
        Ok(self.inner.get(case_number))
    }

    fn list_cases(&self) -> Result<Vec<EncryptedCase>> {
        Ok(self.inner.cases.clone())
    }

    fn list_cases_by_status(&self, status: Status) -> Result<Vec<EncryptedCase>> {
        Ok(self.inner.by_status(status))
    }

    fn update_status(&mut self, case_number: &str, status: Status) -> Result<()> {
        self.mutate(|list| {
            list.find_mut(case_number)?.status = status;
            Ok(())
        })
    }

    fn add_evidence(&mut self, case_number: &str, evidence: String) -> Result<()> {
        self.mutate(|list| {
            list.find_mut(case_number)?.evidence.push(evidence);
            Ok(())
        })
    }

    fn add_hearing(&mut self, case_number: &str, hearing: EncryptedHearing) -> Result<()> {
        self.mutate(|list| {
            list.find_mut(case_number)?.hearings.push(hearing);
            Ok(())
        })
    }
}
