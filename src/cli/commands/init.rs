//! `caseguard init` — create the vault for an identity.

use crate::cli::output;
use crate::cli::{prompt_new_passphrase, Cli, Session};
use crate::errors::{CaseGuardError, Result};
use crate::vault::VaultState;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut session = Session::open(cli)?;

    // Refuse before prompting; `initialize` would refuse anyway.
    if session.vault.try_state()? != VaultState::Uninitialized {
        output::tip("Use `caseguard add` to store cases in the existing vault.");
        return Err(CaseGuardError::Precondition(format!(
            "a vault already exists for identity '{}'",
            session.identity
        )));
    }

    let passphrase = prompt_new_passphrase()?;
    session.vault.initialize(&passphrase)?;
    session.vault.lock();

    session.audit("init", None, Some("vault created"));
    output::success(&format!("Vault created for '{}'", session.identity));
    output::warning("There is no passphrase recovery. Losing it means losing every stored case.");
    output::tip("Run `caseguard add <case.json>` to store a case.");

    Ok(())
}
