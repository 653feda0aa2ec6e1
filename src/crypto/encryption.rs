//! AES-256-GCM authenticated encryption of text fields.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext. The combined buffer is returned as a
//! single standard-alphabet base64 string:
//!
//! ```text
//! base64( [ 12-byte nonce | ciphertext + 16-byte auth tag ] )
//! ```
//!
//! `decrypt` reverses this. Tag verification is the only integrity check
//! in the system, so any failure there surfaces as
//! `AuthenticationFailed` and is never downgraded.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::Zeroize;

use super::keys::SessionKey;
use crate::errors::{CaseGuardError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
const TAG_LEN: usize = 16;

/// Encrypt a text field under `key`, returning a base64 blob.
pub fn encrypt(plaintext: &str, key: &SessionKey) -> Result<String> {
    let sealed = seal(key, plaintext.as_bytes())?;
    Ok(BASE64.encode(sealed))
}

/// Decrypt a base64 blob produced by `encrypt`.
///
/// Bad base64 or a blob too short to hold nonce and tag is
/// `MalformedInput`; a failed tag check is `AuthenticationFailed`.
pub fn decrypt(blob: &str, key: &SessionKey) -> Result<String> {
    let sealed = BASE64
        .decode(blob.trim())
        .map_err(|e| CaseGuardError::MalformedInput(format!("ciphertext is not base64: {e}")))?;

    let plaintext = open(key, &sealed)?;

    String::from_utf8(plaintext).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        CaseGuardError::MalformedInput("decrypted field is not valid UTF-8".into())
    })
}

/// Encrypt raw bytes. Returns nonce || ciphertext.
fn seal(key: &SessionKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CaseGuardError::EncryptionFailed(format!("invalid key length: {e}")))?;

    // Never reused: one fresh nonce per call.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| CaseGuardError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt nonce || ciphertext bytes produced by `seal`.
fn open(key: &SessionKey, sealed: &[u8]) -> Result<Vec<u8>> {
    if sealed.len() < NONCE_LEN + TAG_LEN {
        return Err(CaseGuardError::MalformedInput(format!(
            "ciphertext is {} bytes, shorter than nonce + tag ({})",
            sealed.len(),
            NONCE_LEN + TAG_LEN
        )));
    }

    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CaseGuardError::AuthenticationFailed)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| CaseGuardError::AuthenticationFailed)
}
