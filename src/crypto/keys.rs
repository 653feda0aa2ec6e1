//! The in-memory session key.
//!
//! A `SessionKey` is the only place derived key material lives. It is
//! never serialized, its `Debug` output is redacted, and the bytes are
//! zeroed when the value is dropped (which is what `lock()` relies on).

use std::fmt;

use zeroize::Zeroize;

/// Length of the session key in bytes (256 bits, for AES-256-GCM).
pub const KEY_LEN: usize = 32;

/// A 256-bit AES-256-GCM key that zeroes its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SessionKey {
    bytes: [u8; KEY_LEN],
}

impl SessionKey {
    /// Wrap raw key bytes. Only the KDF should need this.
    pub(crate) fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (to build a cipher instance).
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Compare two keys without exposing the bytes to the caller.
    /// Used by tests and diagnostics only.
    pub fn same_key_as(&self, other: &SessionKey) -> bool {
        self.bytes == other.bytes
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_redacted() {
        let key = SessionKey::from_bytes([0x42; KEY_LEN]);
        let shown = format!("{key:?}");
        assert_eq!(shown, "SessionKey(<redacted>)");
        assert!(!shown.contains("42"));
    }

    #[test]
    fn same_key_as_compares_bytes() {
        let a = SessionKey::from_bytes([1; KEY_LEN]);
        let b = SessionKey::from_bytes([1; KEY_LEN]);
        let c = SessionKey::from_bytes([2; KEY_LEN]);
        assert!(a.same_key_as(&b));
        assert!(!a.same_key_as(&c));
    }

    #[test]
    fn session_key_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SessionKey>();
    }
}
