//! `caseguard audit` — display the audit log.
//!
//! Usage:
//!   caseguard audit               # show last 50 entries
//!   caseguard audit --last 20     # show last 20
//!   caseguard audit --since 7d    # entries from last 7 days

use chrono::Utc;

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::{output, Cli, Session};
use crate::errors::{CaseGuardError, Result};

/// Execute the `audit` command.
///
/// Reading the log does not need the passphrase: it never holds case
/// contents.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let session = Session::open(cli)?;

    let audit = AuditLog::open(&session.data_dir)
        .ok_or_else(|| CaseGuardError::AuditError("failed to open audit database".into()))?;

    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let entries: Vec<AuditEntry> = audit
        .query(last, since_dt)?
        .into_iter()
        .filter(|e| e.identity == session.identity)
        .collect();

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let (num_str, unit) = if let Some(s) = input.strip_suffix('d') {
        (s, 'd')
    } else if let Some(s) = input.strip_suffix('h') {
        (s, 'h')
    } else if let Some(s) = input.strip_suffix('m') {
        (s, 'm')
    } else {
        return Err(CaseGuardError::CommandFailed(format!(
            "invalid duration '{input}' — use format like 7d, 24h, or 30m"
        )));
    };

    let num: i64 = num_str.parse().map_err(|_| {
        CaseGuardError::CommandFailed(format!(
            "invalid duration '{input}' — number part is not valid"
        ))
    })?;

    let duration = match unit {
        'd' => chrono::Duration::days(num),
        'h' => chrono::Duration::hours(num),
        _ => chrono::Duration::minutes(num),
    };

    Ok(Utc::now() - duration)
}

/// Print audit entries in a formatted table.
fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Case ref", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.case_ref.clone().unwrap_or_else(|| "-".into()),
            entry.details.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "init" => style(op).green().to_string(),
        "add" | "set-status" => style(op).blue().to_string(),
        "delete" => style(op).red().to_string(),
        "unlock" => style(op).yellow().to_string(),
        "export" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}
