//! `caseguard export` — decrypt every case to a JSON array.

use std::fs;
use std::path::Path;

use crate::cases::{decrypt_cases, CaseRepository};
use crate::cli::{output, Cli, Session};
use crate::errors::{CaseGuardError, Result};

/// Execute the `export` command.
pub fn execute(cli: &Cli, output_path: Option<&str>) -> Result<()> {
    let session = Session::unlock(cli)?;

    let stored = session.cases.list_cases()?;
    let cases = decrypt_cases(&stored, |s| session.vault.decrypt_text(s))?;

    let content = serde_json::to_string_pretty(&cases)
        .map_err(|e| CaseGuardError::SerializationError(e.to_string()))?;

    session.audit("export", None, Some(&format!("{} cases", cases.len())));

    match output_path {
        Some(dest) => {
            // Refuse to clobber the encrypted store with plaintext.
            if Path::new(dest) == session.cases.path() {
                return Err(CaseGuardError::CommandFailed(
                    "refusing to export over the encrypted case file".into(),
                ));
            }

            fs::write(dest, format!("{content}\n")).map_err(|e| {
                CaseGuardError::CommandFailed(format!("failed to write export file: {e}"))
            })?;

            output::success(&format!("Exported {} cases to {dest}", cases.len()));
            output::warning("The export is plaintext. Store it somewhere safe.");
        }
        None => println!("{content}"),
    }

    Ok(())
}
