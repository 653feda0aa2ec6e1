//! `caseguard add` — encrypt a plaintext case file and store it.

use std::fs;

use crate::cases::{encrypt_case, CaseRepository, DecryptedCase};
use crate::cli::{output, Cli, Session};
use crate::errors::{CaseGuardError, Result};

/// Execute the `add` command.
pub fn execute(cli: &Cli, file: &str) -> Result<()> {
    let contents = fs::read_to_string(file)?;
    let case: DecryptedCase = serde_json::from_str(&contents)
        .map_err(|e| CaseGuardError::CommandFailed(format!("invalid case file {file}: {e}")))?;

    let mut session = Session::unlock(cli)?;

    // The store only sees ciphertext, so duplicates are caught here.
    if session
        .decrypted_cases()?
        .iter()
        .any(|(_, existing)| existing.case_number == case.case_number)
    {
        return Err(CaseGuardError::CaseAlreadyExists);
    }

    let encrypted = encrypt_case(&case, |s| session.vault.encrypt_text(s))?;
    let case_key = encrypted.case_number.clone();
    session.cases.add_case(encrypted)?;

    session.audit("add", Some(&case_key), None);
    output::success(&format!(
        "Stored case '{}' ({} evidence items, {} hearings)",
        case.case_number,
        case.evidence.len(),
        case.hearings.len()
    ));

    Ok(())
}
