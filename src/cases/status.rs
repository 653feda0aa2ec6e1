//! Automatic status suggestion from a case's next hearing date.

use chrono::{DateTime, NaiveDate};

use super::model::{DecryptedCase, Status};

/// A hearing this many days out (or fewer) counts as scheduled.
const SCHEDULED_WINDOW_DAYS: i64 = 7;

/// Suggest a status for `case` as of `today`.
///
/// - no next hearing, or one that cannot be parsed: `Open`
/// - hearing already passed: `AwaitingCourt`
/// - hearing within a week: `Scheduled`
/// - otherwise `ReviewingEvidence` if any evidence is attached, else `Open`
pub fn auto_status(case: &DecryptedCase, today: NaiveDate) -> Status {
    let Some(hearing) = parse_hearing_date(&case.next_hearing) else {
        return Status::Open;
    };

    let days_until = (hearing - today).num_days();

    if days_until < 0 {
        Status::AwaitingCourt
    } else if days_until <= SCHEDULED_WINDOW_DAYS {
        Status::Scheduled
    } else if !case.evidence.is_empty() {
        Status::ReviewingEvidence
    } else {
        Status::Open
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (date part only).
fn parse_hearing_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
