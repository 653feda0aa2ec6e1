//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! 100 000 rounds is the floor. Vaults may record a higher count in
//! their metadata.

use hmac::Hmac;
use rand::rngs::OsRng;
use rand::TryRngCore;
use sha2::Sha256;
use zeroize::Zeroize;

use super::keys::{SessionKey, KEY_LEN};
use crate::errors::{CaseGuardError, Result};

/// Length of the per-vault salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Default (and minimum) PBKDF2 round count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Derive the session key from a passphrase and salt.
///
/// Uses the default iteration count. The same passphrase + salt always
/// produce the same key.
pub fn derive_key(passphrase: &str, salt: &[u8]) -> Result<SessionKey> {
    derive_key_with_iterations(passphrase, salt, DEFAULT_ITERATIONS)
}

/// Derive the session key with an explicit PBKDF2 round count.
///
/// Fails only on malformed input: an empty salt or a round count below
/// `DEFAULT_ITERATIONS`. Passphrase content (including the empty string)
/// is never rejected here.
pub fn derive_key_with_iterations(
    passphrase: &str,
    salt: &[u8],
    iterations: u32,
) -> Result<SessionKey> {
    if salt.is_empty() {
        return Err(CaseGuardError::KeyDerivationFailed(
            "salt must not be empty".into(),
        ));
    }
    if iterations < DEFAULT_ITERATIONS {
        return Err(CaseGuardError::KeyDerivationFailed(format!(
            "PBKDF2 iterations must be at least {DEFAULT_ITERATIONS} (got {iterations})"
        )));
    }

    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(passphrase.as_bytes(), salt, iterations, &mut key)
        .map_err(|e| CaseGuardError::KeyDerivationFailed(format!("PBKDF2 failed: {e}")))?;

    let session_key = SessionKey::from_bytes(key);
    key.zeroize();
    Ok(session_key)
}

/// Generate a fresh 16-byte salt from the operating system's CSPRNG.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| CaseGuardError::EntropyUnavailable(e.to_string()))?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_salt_is_rejected() {
        let err = derive_key("anything", &[]).unwrap_err();
        assert!(matches!(err, CaseGuardError::KeyDerivationFailed(_)));
    }

    #[test]
    fn weak_iteration_count_is_rejected() {
        let salt = [7u8; SALT_LEN];
        let err = derive_key_with_iterations("pw", &salt, 1_000).unwrap_err();
        assert!(matches!(err, CaseGuardError::KeyDerivationFailed(_)));
    }

    #[test]
    fn empty_passphrase_still_derives() {
        let salt = [7u8; SALT_LEN];
        assert!(derive_key("", &salt).is_ok());
    }

    #[test]
    fn iteration_count_changes_the_key() {
        let salt = [9u8; SALT_LEN];
        let a = derive_key_with_iterations("pw", &salt, DEFAULT_ITERATIONS).unwrap();
        let b = derive_key_with_iterations("pw", &salt, DEFAULT_ITERATIONS + 1).unwrap();
        assert!(!a.same_key_as(&b));
    }

    #[test]
    fn salts_are_fresh() {
        let a = generate_salt().unwrap();
        let b = generate_salt().unwrap();
        assert_ne!(a, b);
    }
}
