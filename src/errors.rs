use thiserror::Error;

/// All errors that can occur in CaseGuard.
#[derive(Debug, Error)]
pub enum CaseGuardError {
    // --- Vault lifecycle errors ---
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Vault is locked — unlock it with your passphrase first")]
    Locked,

    // --- Crypto errors ---
    #[error("Decryption failed — wrong passphrase or tampered data")]
    AuthenticationFailed,

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("System random source unavailable: {0}")]
    EntropyUnavailable(String),

    // --- Record store errors ---
    #[error("Case not found")]
    CaseNotFound,

    #[error("A case with this case number is already stored")]
    CaseAlreadyExists,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Coarse classification of an error, for callers that branch on
/// recoverability rather than on the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller misuse: no identity bound, or an existing vault would be overwritten.
    Precondition,
    /// The session key was requested while the vault is locked.
    Locked,
    /// Wrong passphrase or tampered ciphertext. The two are never told apart.
    Authentication,
    /// Persisted metadata or a ciphertext blob is structurally invalid.
    Corruption,
    /// Everything else (I/O, config, CLI).
    Other,
}

impl CaseGuardError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Precondition(_) => ErrorClass::Precondition,
            Self::Locked => ErrorClass::Locked,
            Self::AuthenticationFailed => ErrorClass::Authentication,
            Self::MalformedInput(_) => ErrorClass::Corruption,
            _ => ErrorClass::Other,
        }
    }

    /// Text suitable for showing to an end user.
    ///
    /// Authentication failures collapse to a generic message so no
    /// cryptographic detail leaks; corruption gets its own wording so an
    /// operator can tell it apart from a mistyped passphrase.
    pub fn user_message(&self) -> String {
        match self.class() {
            ErrorClass::Authentication => "Incorrect passphrase".to_string(),
            ErrorClass::Corruption => {
                "Data corrupted — stored vault or case data could not be read".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Convenience type alias for CaseGuard results.
pub type Result<T> = std::result::Result<T, CaseGuardError>;
