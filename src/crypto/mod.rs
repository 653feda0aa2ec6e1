//! Cryptographic primitives for CaseGuard.
//!
//! This module is stateless and knows nothing about identities:
//! - AES-256-GCM field encryption and decryption (`encryption`)
//! - PBKDF2-HMAC-SHA256 key derivation and salt generation (`kdf`)
//! - The zeroizing `SessionKey` wrapper (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_key, derive_key_with_iterations, generate_salt, DEFAULT_ITERATIONS, SALT_LEN};
pub use keys::SessionKey;
