//! `caseguard delete` — remove a case from the store.

use dialoguer::Confirm;

use crate::cases::CaseRepository;
use crate::cli::{output, Cli, Session};
use crate::errors::{CaseGuardError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, case_number: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete case '{case_number}'?"))
            .default(false)
            .interact()
            .map_err(|e| CaseGuardError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let mut session = Session::unlock(cli)?;
    let (stored, _) = session.find_case(case_number)?;
    session.cases.delete_case(&stored.case_number)?;

    session.audit("delete", Some(&stored.case_number), None);
    output::success(&format!("Deleted case '{case_number}'"));

    Ok(())
}
