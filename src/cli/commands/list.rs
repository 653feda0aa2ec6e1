//! `caseguard list` — decrypt and tabulate stored cases.

use crate::cases::{decrypt_cases, CaseRepository, Status};
use crate::cli::{output, Cli, Session};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, status: Option<&str>) -> Result<()> {
    let status: Option<Status> = status.map(str::parse::<Status>).transpose()?;
    let session = Session::unlock(cli)?;

    // Status is plaintext, so filtering happens before any decryption.
    let stored = match status {
        Some(s) => session.cases.list_cases_by_status(s)?,
        None => session.cases.list_cases()?,
    };

    let cases = decrypt_cases(&stored, |s| session.vault.decrypt_text(s))?;
    output::print_cases_table(&cases);

    Ok(())
}
