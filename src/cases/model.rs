//! Case record types, in plaintext and ciphertext form.
//!
//! The two shapes are structurally identical: every string becomes an
//! opaque base64 ciphertext blob, while `Status` stays in the clear so
//! the record store can filter on it server-side.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CaseGuardError, Result};

/// Lifecycle status of a case or hearing. Never encrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    Open,
    Closed,
    AwaitingCourt,
    ReviewingEvidence,
    Scheduled,
}

impl Status {
    /// Every status value, in display order.
    pub const ALL: [Status; 5] = [
        Status::Open,
        Status::Scheduled,
        Status::ReviewingEvidence,
        Status::AwaitingCourt,
        Status::Closed,
    ];

    /// Wire name, as the record store sees it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::AwaitingCourt => "awaitingCourt",
            Self::ReviewingEvidence => "reviewingEvidence",
            Self::Scheduled => "scheduled",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::AwaitingCourt => "Awaiting Court",
            Self::ReviewingEvidence => "Reviewing Evidence",
            Self::Scheduled => "Scheduled",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CaseGuardError;

    fn from_str(s: &str) -> Result<Self> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Status::ALL.iter().map(|st| st.as_str()).collect();
                CaseGuardError::CommandFailed(format!(
                    "unknown status '{s}' — expected one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

/// A hearing attached to a case, in plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptedHearing {
    pub date: String,
    pub outcome: String,
    pub notes: String,
    pub status: Status,
}

/// A case record in plaintext. Only ever held in process memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptedCase {
    pub case_number: String,
    pub creation_date: String,
    pub next_hearing: String,
    pub client_name: String,
    pub client_contact: String,
    #[serde(default)]
    pub evidence: Vec<String>,
    #[serde(default)]
    pub hearings: Vec<DecryptedHearing>,
    pub status: Status,
    /// Display-only flag. Not part of the stored record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

/// A hearing as stored by the backend: every string is a ciphertext blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedHearing {
    pub date: String,
    pub outcome: String,
    pub notes: String,
    pub status: Status,
}

/// A case as stored by the backend, keyed by its encrypted case number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedCase {
    pub case_number: String,
    pub creation_date: String,
    pub next_hearing: String,
    pub client_name: String,
    pub client_contact: String,
    pub evidence: Vec<String>,
    pub hearings: Vec<EncryptedHearing>,
    pub status: Status,
}
