//! The per-session vault: identity binding, lock/unlock lifecycle, and
//! field-level encryption with the held session key.
//!
//! `VaultStore` is an explicit service object. Construct one per
//! application session and pass it by reference to whatever needs to
//! encrypt or decrypt; there is no process-wide instance.
//!
//! State machine:
//!
//! ```text
//! Unbound ──bind──▶ Uninitialized ──initialize──▶ Unlocked
//!                   Locked ─────────unlock──────▶ Unlocked ──lock──▶ Locked
//! ```
//!
//! `bind_identity` is valid from every state and always drops the key
//! first, so switching users implicitly locks.

use std::fmt;

use crate::crypto::{self, SessionKey, DEFAULT_ITERATIONS};
use crate::errors::{CaseGuardError, Result};

use super::metadata::{MetadataStore, VaultMetadata};

/// Lifecycle state of a `VaultStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    /// No identity bound yet.
    Unbound,
    /// Identity bound, no metadata persisted for it.
    Uninitialized,
    /// Metadata exists, no session key held.
    Locked,
    /// Session key held.
    Unlocked,
}

impl fmt::Display for VaultState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unbound => "unbound",
            Self::Uninitialized => "uninitialized",
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
        };
        f.write_str(name)
    }
}

/// The vault handle. Generic over where metadata is persisted.
pub struct VaultStore<M: MetadataStore> {
    /// Persisted per-identity salt records.
    metadata: M,

    /// Currently bound identity, if any.
    identity: Option<String>,

    /// The session key (zeroized on drop). Present only while unlocked.
    key: Option<SessionKey>,

    /// PBKDF2 round count used for vaults created by this handle.
    iterations: u32,
}

impl<M: MetadataStore> VaultStore<M> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create an unbound vault over `metadata` using the default KDF cost.
    pub fn new(metadata: M) -> Self {
        Self::with_iterations(metadata, DEFAULT_ITERATIONS)
    }

    /// Create an unbound vault that initializes new vaults with a custom
    /// PBKDF2 round count. Existing vaults always unlock with the count
    /// recorded in their metadata.
    pub fn with_iterations(metadata: M, iterations: u32) -> Self {
        Self {
            metadata,
            identity: None,
            key: None,
            iterations,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Bind the vault to `identity`, dropping any held key first.
    ///
    /// Returns the resulting state (`Uninitialized` or `Locked`).
    pub fn bind_identity(&mut self, identity: &str) -> Result<VaultState> {
        // Drop the key before anything can fail, so a rejected bind still
        // leaves the previous identity locked.
        self.key = None;

        if identity.is_empty() {
            self.identity = None;
            return Err(CaseGuardError::Precondition(
                "identity must not be empty".into(),
            ));
        }

        self.identity = Some(identity.to_string());
        let state = self.state();
        tracing::info!(identity, %state, "identity bound");
        Ok(state)
    }

    /// Create the vault for the bound identity.
    ///
    /// Generates a salt, derives the key, persists the metadata, and
    /// leaves the vault unlocked. Refuses to overwrite an existing vault.
    pub fn initialize(&mut self, passphrase: &str) -> Result<()> {
        let identity = self.bound_identity()?.to_string();

        if self.metadata.load(&identity)?.is_some() {
            return Err(CaseGuardError::Precondition(format!(
                "a vault already exists for identity '{identity}'"
            )));
        }

        let salt = crypto::generate_salt()?;
        let key = crypto::derive_key_with_iterations(passphrase, &salt, self.iterations)?;

        self.metadata
            .save(&identity, &VaultMetadata::new(salt, self.iterations))?;
        self.key = Some(key);

        tracing::info!(identity = %identity, "vault initialized");
        Ok(())
    }

    /// Derive the session key from `passphrase` and the stored salt.
    ///
    /// Returns `Ok(false)` only when no metadata exists for the bound
    /// identity. A `true` result does NOT prove the passphrase is right:
    /// PBKDF2 accepts any input, so a wrong passphrase is only detected
    /// when the first decrypt fails authentication. Use
    /// `verify_passphrase` to fold that check in when a known ciphertext
    /// is at hand.
    pub fn unlock(&mut self, passphrase: &str) -> Result<bool> {
        let identity = self.bound_identity()?.to_string();

        let Some(metadata) = self.metadata.load(&identity)? else {
            tracing::debug!(identity = %identity, "unlock requested but no vault exists");
            return Ok(false);
        };

        let key =
            crypto::derive_key_with_iterations(passphrase, &metadata.salt, metadata.kdf_iterations())?;
        self.key = Some(key);

        tracing::info!(identity = %identity, "vault unlocked");
        Ok(true)
    }

    /// Second phase of unlocking: prove the held key opens `probe`.
    ///
    /// On authentication failure the key is discarded (the vault returns
    /// to `Locked`) and `AuthenticationFailed` is returned.
    pub fn verify_passphrase(&mut self, probe: &str) -> Result<()> {
        match self.decrypt_text(probe) {
            Ok(_) => Ok(()),
            Err(CaseGuardError::AuthenticationFailed) => {
                self.lock();
                Err(CaseGuardError::AuthenticationFailed)
            }
            Err(e) => Err(e),
        }
    }

    /// Discard the session key. Idempotent.
    pub fn lock(&mut self) {
        if self.key.take().is_some() {
            tracing::info!(identity = self.identity.as_deref().unwrap_or(""), "vault locked");
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// `true` unless a session key is currently held.
    pub fn is_locked(&self) -> bool {
        self.key.is_none()
    }

    /// `true` when the bound identity has persisted metadata.
    ///
    /// Always `false` while unbound. Unreadable metadata counts as not
    /// initialized here; `try_state` reports it instead.
    pub fn is_initialized(&self) -> bool {
        match &self.identity {
            Some(id) => matches!(self.metadata.load(id), Ok(Some(_))),
            None => false,
        }
    }

    /// Current lifecycle state, surfacing metadata that cannot be read.
    ///
    /// Corrupt metadata for the bound identity is `MalformedInput`, never
    /// `Uninitialized`.
    pub fn try_state(&self) -> Result<VaultState> {
        let Some(identity) = &self.identity else {
            return Ok(VaultState::Unbound);
        };
        if self.key.is_some() {
            return Ok(VaultState::Unlocked);
        }
        match self.metadata.load(identity)? {
            Some(_) => Ok(VaultState::Locked),
            None => Ok(VaultState::Uninitialized),
        }
    }

    /// Current lifecycle state. Like `is_initialized`, treats unreadable
    /// metadata as absent.
    pub fn state(&self) -> VaultState {
        match (&self.identity, &self.key) {
            (None, _) => VaultState::Unbound,
            (Some(_), Some(_)) => VaultState::Unlocked,
            (Some(_), None) if self.is_initialized() => VaultState::Locked,
            (Some(_), None) => VaultState::Uninitialized,
        }
    }

    /// The bound identity, if any.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Borrow the session key. Fails with `Locked` unless unlocked.
    ///
    /// The returned borrow keeps `lock` and `bind_identity` (which need
    /// `&mut self`) from running while the key is still in use.
    pub fn key(&self) -> Result<&SessionKey> {
        self.key.as_ref().ok_or(CaseGuardError::Locked)
    }

    /// Access the underlying metadata store.
    pub fn metadata_store(&self) -> &M {
        &self.metadata
    }

    // ------------------------------------------------------------------
    // Field-level operations
    // ------------------------------------------------------------------

    /// Encrypt one text field with the session key.
    pub fn encrypt_text(&self, plaintext: &str) -> Result<String> {
        crypto::encrypt(plaintext, self.key()?)
    }

    /// Decrypt one text field with the session key.
    pub fn decrypt_text(&self, blob: &str) -> Result<String> {
        crypto::decrypt(blob, self.key()?)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn bound_identity(&self) -> Result<&str> {
        self.identity
            .as_deref()
            .ok_or_else(|| CaseGuardError::Precondition("no identity bound".into()))
    }
}

impl<M: MetadataStore> fmt::Debug for VaultStore<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultStore")
            .field("identity", &self.identity)
            .field("locked", &self.is_locked())
            .finish_non_exhaustive()
    }
}
