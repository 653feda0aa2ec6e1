//! Field-by-field transformation between `DecryptedCase` and
//! `EncryptedCase`.
//!
//! The codec never touches keys. Callers pass their own per-field
//! transform (usually `|s| vault.encrypt_text(s)` or
//! `|s| vault.decrypt_text(s)`), and the codec walks the record,
//! applying it to every string and copying every `Status` unchanged.
//!
//! Field order and list lengths are preserved exactly. The first failing
//! field aborts the whole record: no partially transformed record is
//! ever returned.

use super::model::{DecryptedCase, DecryptedHearing, EncryptedCase, EncryptedHearing};
use crate::errors::Result;

/// Encrypt every string field of a case.
///
/// The display-only `archived` flag is not part of the stored record and
/// is dropped.
pub fn encrypt_case<F>(case: &DecryptedCase, encrypt_fn: F) -> Result<EncryptedCase>
where
    F: Fn(&str) -> Result<String>,
{
    let hearings = case
        .hearings
        .iter()
        .map(|h| {
            Ok(EncryptedHearing {
                date: encrypt_fn(&h.date)?,
                outcome: encrypt_fn(&h.outcome)?,
                notes: encrypt_fn(&h.notes)?,
                status: h.status,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let evidence = transform_all(&case.evidence, &encrypt_fn)?;

    Ok(EncryptedCase {
        case_number: encrypt_fn(&case.case_number)?,
        creation_date: encrypt_fn(&case.creation_date)?,
        next_hearing: encrypt_fn(&case.next_hearing)?,
        client_name: encrypt_fn(&case.client_name)?,
        client_contact: encrypt_fn(&case.client_contact)?,
        evidence,
        hearings,
        status: case.status,
    })
}

/// Decrypt every string field of a stored case.
pub fn decrypt_case<F>(case: &EncryptedCase, decrypt_fn: F) -> Result<DecryptedCase>
where
    F: Fn(&str) -> Result<String>,
{
    let hearings = case
        .hearings
        .iter()
        .map(|h| {
            Ok(DecryptedHearing {
                date: decrypt_fn(&h.date)?,
                outcome: decrypt_fn(&h.outcome)?,
                notes: decrypt_fn(&h.notes)?,
                status: h.status,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let evidence = transform_all(&case.evidence, &decrypt_fn)?;

    Ok(DecryptedCase {
        case_number: decrypt_fn(&case.case_number)?,
        creation_date: decrypt_fn(&case.creation_date)?,
        next_hearing: decrypt_fn(&case.next_hearing)?,
        client_name: decrypt_fn(&case.client_name)?,
        client_contact: decrypt_fn(&case.client_contact)?,
        evidence,
        hearings,
        status: case.status,
        archived: None,
    })
}

/// Decrypt a list of stored cases. Any failing case fails the whole list.
pub fn decrypt_cases<F>(cases: &[EncryptedCase], decrypt_fn: F) -> Result<Vec<DecryptedCase>>
where
    F: Fn(&str) -> Result<String>,
{
    cases
        .iter()
        .map(|case| decrypt_case(case, &decrypt_fn))
        .collect()
}

fn transform_all<F>(items: &[String], f: &F) -> Result<Vec<String>>
where
    F: Fn(&str) -> Result<String>,
{
    items.iter().map(|item| f(item)).collect()
}
