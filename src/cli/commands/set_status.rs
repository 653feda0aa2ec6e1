//! `caseguard set-status` and `caseguard auto-status`.
//!
//! Status is stored in the clear, so changing it never re-encrypts the
//! record: the store is addressed by the encrypted case number read back
//! from it.

use chrono::Local;

use crate::cases::{auto_status, CaseRepository, Status};
use crate::cli::{output, Cli, Session};
use crate::errors::Result;

/// Execute the `set-status` command.
pub fn execute(cli: &Cli, case_number: &str, status: &str) -> Result<()> {
    let status: Status = status.parse()?;
    let mut session = Session::unlock(cli)?;
    apply(&mut session, case_number, status)
}

/// Execute the `auto-status` command.
pub fn execute_auto(cli: &Cli, case_number: &str) -> Result<()> {
    let mut session = Session::unlock(cli)?;
    let (_, case) = session.find_case(case_number)?;
    let status = auto_status(&case, Local::now().date_naive());

    if status == case.status {
        output::info(&format!(
            "Case '{case_number}' is already {}",
            output::status_badge(status)
        ));
        return Ok(());
    }
    apply(&mut session, case_number, status)
}

fn apply(session: &mut Session, case_number: &str, status: Status) -> Result<()> {
    let (stored, _) = session.find_case(case_number)?;
    session.cases.update_status(&stored.case_number, status)?;

    session.audit("set-status", Some(&stored.case_number), Some(status.as_str()));
    output::success(&format!(
        "Case '{case_number}' is now {}",
        output::status_badge(status)
    ));
    Ok(())
}
