//! Audit log — SQLite-based operation history.
//!
//! Stores a record of every vault operation (init, unlock, add, delete,
//! status changes, export) in a local SQLite database at
//! `<data_dir>/audit.db`. Entries carry the identity and, for record
//! operations, a short fingerprint of the *encrypted* case number. No
//! plaintext, passphrase, or key material is ever written here.
//!
//! If the database can't be opened or written to, commands continue
//! without logging.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::errors::{CaseGuardError, Result};

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub identity: String,
    pub case_ref: Option<String>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database at `<data_dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened; callers treat that
    /// as "audit logging unavailable" and continue.
    pub fn open(data_dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(data_dir);
        let conn = Connection::open(&db_path).ok()?;

        // Owner-only access to the audit database.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                operation   TEXT NOT NULL,
                identity    TEXT NOT NULL,
                case_ref    TEXT,
                details     TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Write failures are logged as warnings only.
    pub fn log(
        &self,
        operation: &str,
        identity: &str,
        case_ref: Option<&str>,
        details: Option<&str>,
    ) {
        let now = Utc::now().to_rfc3339();
        if let Err(e) = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, identity, case_ref, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![now, operation, identity, case_ref, details],
        ) {
            tracing::warn!(error = %e, operation, "audit entry not written");
        }
    }

    /// Query recent audit entries.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries newer than this timestamp.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let (sql, params): (&str, Vec<Box<dyn rusqlite::types::ToSql>>) = match since {
            Some(ref ts) => (
                "SELECT id, timestamp, operation, identity, case_ref, details
                 FROM audit_log
                 WHERE timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
                vec![
                    Box::new(ts.to_rfc3339()) as Box<dyn rusqlite::types::ToSql>,
                    Box::new(limit_i64),
                ],
            ),
            None => (
                "SELECT id, timestamp, operation, identity, case_ref, details
                 FROM audit_log
                 ORDER BY id DESC
                 LIMIT ?1",
                vec![Box::new(limit_i64) as Box<dyn rusqlite::types::ToSql>],
            ),
        };

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| CaseGuardError::AuditError(format!("query prepare: {e}")))?;

        let params_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| &**p).collect();

        let rows = stmt
            .query_map(params_refs.as_slice(), |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    identity: row.get(3)?,
                    case_ref: row.get(4)?,
                    details: row.get(5)?,
                })
            })
            .map_err(|e| CaseGuardError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| CaseGuardError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    /// Return the path to the audit database (for testing/display).
    pub fn db_path(data_dir: &Path) -> PathBuf {
        data_dir.join("audit.db")
    }
}

/// Short, stable reference to a stored record: the first 6 bytes of the
/// SHA-256 of its encrypted case number, in hex.
pub fn case_ref(encrypted_case_number: &str) -> String {
    let digest = Sha256::digest(encrypted_case_number.as_bytes());
    digest[..6].iter().map(|b| format!("{b:02x}")).collect()
}

/// Convenience helper: log an audit event under `data_dir`.
///
/// Never fails the calling command.
pub fn log_audit(
    data_dir: &Path,
    op: &str,
    identity: &str,
    case_ref: Option<&str>,
    details: Option<&str>,
) {
    if let Some(audit) = AuditLog::open(data_dir) {
        audit.log(op, identity, case_ref, details);
    }
}
