//! `caseguard show` — print one decrypted case as JSON.

use crate::cli::{Cli, Session};
use crate::errors::{CaseGuardError, Result};

/// Execute the `show` command.
pub fn execute(cli: &Cli, case_number: &str) -> Result<()> {
    let session = Session::unlock(cli)?;
    let (_, case) = session.find_case(case_number)?;

    let json = serde_json::to_string_pretty(&case)
        .map_err(|e| CaseGuardError::SerializationError(e.to_string()))?;
    println!("{json}");

    Ok(())
}
