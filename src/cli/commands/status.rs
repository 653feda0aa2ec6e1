//! `caseguard status` — report vault state without unlocking.

use console::style;

use crate::cli::{output, Cli, Session};
use crate::errors::Result;
use crate::vault::VaultState;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let session = Session::open(cli)?;

    let state = session.vault.try_state()?;

    println!("{} {}", style("Identity:").bold(), session.identity);
    let shown = match state {
        VaultState::Uninitialized => style("not initialized").yellow().to_string(),
        other => style(other.to_string()).green().to_string(),
    };
    println!("{} {}", style("Vault:").bold(), shown);
    println!("{} {}", style("Cases stored:").bold(), session.cases.len());
    println!(
        "{} {}",
        style("Case file:").bold(),
        session.cases.path().display()
    );

    if state == VaultState::Uninitialized {
        output::tip("Run `caseguard init` to create a vault for this identity.");
    }

    Ok(())
}
