//! Persisted per-identity vault metadata and the stores that hold it.
//!
//! One entry exists per identity, addressed by `caseguard_vault_<identity>`.
//! The value is a flat JSON record:
//!
//! ```json
//! { "salt": "<base64, 16 bytes>", "initialized": true, "iterations": 100000 }
//! ```
//!
//! `iterations` is optional; records without it use the default PBKDF2
//! round count. Neither the passphrase nor any key ever lands here.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::{STANDARD as BASE64, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::crypto::{DEFAULT_ITERATIONS, SALT_LEN};
use crate::errors::{CaseGuardError, Result};

/// Prefix of every metadata entry key.
pub const STORAGE_KEY_PREFIX: &str = "caseguard_vault_";

/// Build the storage entry key for an identity.
pub fn storage_key(identity: &str) -> String {
    format!("{STORAGE_KEY_PREFIX}{identity}")
}

/// File-name-safe form of an identity: URL-safe base64 without padding,
/// so path separators and dots never reach the file system.
pub fn encode_identity(identity: &str) -> String {
    URL_SAFE_NO_PAD.encode(identity.as_bytes())
}

/// Metadata persisted once per identity at `initialize` time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultMetadata {
    /// The PBKDF2 salt (base64 in JSON).
    #[serde(serialize_with = "salt_encode", deserialize_with = "salt_decode")]
    pub salt: [u8; SALT_LEN],

    /// Always `true` once written.
    pub initialized: bool,

    /// PBKDF2 round count used at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
}

impl VaultMetadata {
    pub fn new(salt: [u8; SALT_LEN], iterations: u32) -> Self {
        Self {
            salt,
            initialized: true,
            iterations: (iterations != DEFAULT_ITERATIONS).then_some(iterations),
        }
    }

    /// Round count to feed back into the KDF on unlock.
    pub fn kdf_iterations(&self) -> u32 {
        self.iterations.unwrap_or(DEFAULT_ITERATIONS)
    }

    /// Parse a stored JSON record, mapping every failure to `MalformedInput`.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data)
            .map_err(|e| CaseGuardError::MalformedInput(format!("vault metadata: {e}")))
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| CaseGuardError::SerializationError(format!("vault metadata: {e}")))
    }
}

/// Where per-identity metadata lives.
///
/// `load` returns `Ok(None)` for an identity that has never been
/// initialized; callers must handle that case explicitly.
pub trait MetadataStore {
    fn load(&self, identity: &str) -> Result<Option<VaultMetadata>>;
    fn save(&mut self, identity: &str, metadata: &VaultMetadata) -> Result<()>;
}

/// In-memory metadata store for tests and ephemeral sessions.
///
/// Clones share the same underlying map, so a test can hand one clone to
/// a `VaultStore` and inspect the entries through another.
#[derive(Debug, Default, Clone)]
pub struct MemoryMetadataStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored bytes for an identity, as a browser-style key/value
    /// store would hold them.
    pub fn raw_entry(&self, identity: &str) -> Option<Vec<u8>> {
        self.guard().ok()?.get(&storage_key(identity)).cloned()
    }

    /// Overwrite the raw bytes for an identity (used to simulate corruption).
    pub fn put_raw_entry(&self, identity: &str, data: Vec<u8>) {
        if let Ok(mut map) = self.guard() {
            map.insert(storage_key(identity), data);
        }
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|_| CaseGuardError::CommandFailed("metadata store lock poisoned".into()))
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn load(&self, identity: &str) -> Result<Option<VaultMetadata>> {
        let map = self.guard()?;
        match map.get(&storage_key(identity)) {
            Some(data) => VaultMetadata::from_json(data).map(Some),
            None => Ok(None),
        }
    }

    fn save(&mut self, identity: &str, metadata: &VaultMetadata) -> Result<()> {
        let data = metadata.to_json()?;
        self.guard()?.insert(storage_key(identity), data);
        Ok(())
    }
}

/// Directory-backed metadata store: one JSON file per identity.
///
/// Identities are opaque strings, so file names carry them through
/// `encode_identity`.
#[derive(Debug, Clone)]
pub struct FileMetadataStore {
    dir: PathBuf,
}

impl FileMetadataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the metadata file for an identity.
    pub fn entry_path(&self, identity: &str) -> PathBuf {
        self.dir.join(format!(
            "{STORAGE_KEY_PREFIX}{}.json",
            encode_identity(identity)
        ))
    }
}

impl MetadataStore for FileMetadataStore {
    fn load(&self, identity: &str) -> Result<Option<VaultMetadata>> {
        let path = self.entry_path(identity);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read(&path)?;
        VaultMetadata::from_json(&data).map(Some)
    }

    fn save(&mut self, identity: &str, metadata: &VaultMetadata) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let path = self.entry_path(identity);
        write_atomic(&path, &metadata.to_json()?)?;
        tracing::debug!(path = %path.display(), "vault metadata written");
        Ok(())
    }
}

/// Write `data` to `path` via a temp file in the same directory + rename,
/// so readers never observe a half-written file.
///
/// On Unix the temp file is created owner-only (0o600) before any bytes
/// are written.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    // A leftover temp file from an interrupted write keeps its old mode,
    // so it is removed and the file always freshly created.
    match fs::remove_file(&tmp_path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Serde helpers for the fixed-length base64 salt
// ---------------------------------------------------------------------------

fn salt_encode<S>(salt: &[u8; SALT_LEN], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&BASE64.encode(salt))
}

fn salt_decode<'de, D>(deserializer: D) -> std::result::Result<[u8; SALT_LEN], D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let bytes = BASE64.decode(&s).map_err(serde::de::Error::custom)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        serde::de::Error::custom(format!("salt must be {SALT_LEN} bytes, got {len}"))
    })
}
