//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::cases::{DecryptedCase, Status};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Status label, colored by how urgent it is.
pub fn status_badge(status: Status) -> String {
    let label = status.label();
    match status {
        Status::Open => style(label).blue().to_string(),
        Status::Closed => style(label).dim().to_string(),
        Status::AwaitingCourt => style(label).yellow().to_string(),
        Status::ReviewingEvidence => style(label).magenta().to_string(),
        Status::Scheduled => style(label).green().to_string(),
    }
}

/// Print a table of decrypted cases.
pub fn print_cases_table(cases: &[DecryptedCase]) {
    if cases.is_empty() {
        info("No cases stored yet.");
        tip("Run `caseguard add <case.json>` to store your first case.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Case",
        "Client",
        "Created",
        "Next hearing",
        "Evidence",
        "Hearings",
        "Status",
    ]);

    for c in cases {
        table.add_row(vec![
            c.case_number.clone(),
            c.client_name.clone(),
            c.creation_date.clone(),
            c.next_hearing.clone(),
            c.evidence.len().to_string(),
            c.hearings.len().to_string(),
            status_badge(c.status),
        ]);
    }

    println!("{table}");
}
