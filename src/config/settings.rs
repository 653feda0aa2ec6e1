use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::DEFAULT_ITERATIONS;
use crate::errors::{CaseGuardError, Result};
use crate::vault::metadata::encode_identity;

/// Project-level configuration, loaded from `caseguard.toml`.
///
/// Every field has a sensible default so CaseGuard works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) holding vault metadata,
    /// the case files, and the audit database.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// PBKDF2 round count for newly initialized vaults (minimum 100 000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Directory inside `data_dir` holding one encrypted case file per
    /// identity.
    #[serde(default = "default_case_dir")]
    pub case_dir: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_data_dir() -> String {
    ".caseguard".to_string()
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_case_dir() -> String {
    "cases".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            kdf_iterations: default_kdf_iterations(),
            case_dir: default_case_dir(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = "caseguard.toml";

    /// Load settings from `<project_dir>/caseguard.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, or asks for a KDF cost
    /// below the minimum, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            CaseGuardError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.kdf_iterations < DEFAULT_ITERATIONS {
            return Err(CaseGuardError::ConfigError(format!(
                "kdf_iterations must be at least {DEFAULT_ITERATIONS} (got {})",
                settings.kdf_iterations
            )));
        }

        Ok(settings)
    }

    /// Resolve the data directory against the project root.
    ///
    /// An absolute `data_dir` is used as-is.
    pub fn data_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.data_dir)
    }

    /// Directory holding one metadata file per identity.
    ///
    /// Example: `project_dir/.caseguard/vaults`
    pub fn metadata_dir(&self, project_dir: &Path) -> PathBuf {
        self.data_path(project_dir).join("vaults")
    }

    /// Full path to an identity's encrypted case store. The identity is
    /// encoded the same way as its metadata file name.
    ///
    /// Example: `project_dir/.caseguard/cases/dTE.json` for `u1`
    pub fn case_file_path(&self, project_dir: &Path, identity: &str) -> PathBuf {
        self.data_path(project_dir)
            .join(&self.case_dir)
            .join(format!("{}.json", encode_identity(identity)))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
