//! CLI module — Clap argument parser, session wiring, output helpers, and
//! command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::cases::{decrypt_case, CaseRepository, DecryptedCase, EncryptedCase, JsonCaseFile};
use crate::config::Settings;
use crate::errors::{CaseGuardError, Result};
use crate::vault::{FileMetadataStore, VaultState, VaultStore};

/// Minimum passphrase length enforced when creating a vault.
const MIN_PASSPHRASE_LEN: usize = 8;

/// Environment variable consulted before prompting for a passphrase.
pub const PASSPHRASE_ENV: &str = "CASEGUARD_PASSPHRASE";

/// CaseGuard CLI: encrypted case record vault.
#[derive(Parser)]
#[command(
    name = "caseguard",
    about = "Encrypted case record vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Identity whose vault to use
    #[arg(short, long, env = "CASEGUARD_IDENTITY", global = true)]
    pub identity: Option<String>,

    /// Data directory (overrides `data_dir` in caseguard.toml)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create the vault for this identity
    Init,

    /// Show whether the vault exists and how many cases are stored
    Status,

    /// Encrypt a case from a JSON file and store it
    Add {
        /// Path to a plaintext case JSON file
        file: String,
    },

    /// List stored cases
    List {
        /// Only show cases with this status (e.g. open, scheduled)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show a single case as JSON
    Show {
        /// Case number
        case_number: String,
    },

    /// Delete a case
    Delete {
        /// Case number
        case_number: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Set the status of a case
    SetStatus {
        /// Case number
        case_number: String,
        /// New status (open, closed, awaitingCourt, reviewingEvidence, scheduled)
        status: String,
    },

    /// Recompute a case's status from its next hearing date
    AutoStatus {
        /// Case number
        case_number: String,
    },

    /// Decrypt every case and write them as JSON
    Export {
        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// View the audit log of vault operations
    #[cfg(feature = "audit-log")]
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Session wiring shared by commands
// ---------------------------------------------------------------------------

/// Everything a command needs: the bound vault, the case store, and
/// where to log audit events.
pub struct Session {
    pub vault: VaultStore<FileMetadataStore>,
    pub cases: JsonCaseFile,
    pub identity: String,
    pub data_dir: PathBuf,
}

impl Session {
    /// Resolve settings, bind the identity, and open the case file.
    /// The vault is left locked.
    pub fn open(cli: &Cli) -> Result<Self> {
        let identity = require_identity(cli)?;
        let cwd = std::env::current_dir()?;
        let mut settings = Settings::load(&cwd)?;
        if let Some(dir) = &cli.data_dir {
            settings.data_dir.clone_from(dir);
        }

        let metadata = FileMetadataStore::new(settings.metadata_dir(&cwd));
        let mut vault = VaultStore::with_iterations(metadata, settings.kdf_iterations);
        vault.bind_identity(&identity)?;

        let cases = JsonCaseFile::open(&settings.case_file_path(&cwd, &identity))?;

        Ok(Self {
            vault,
            cases,
            identity,
            data_dir: settings.data_path(&cwd),
        })
    }

    /// Open the session and unlock the vault, proving the passphrase
    /// against the first stored case when there is one.
    pub fn unlock(cli: &Cli) -> Result<Self> {
        let mut session = Self::open(cli)?;

        if session.vault.try_state()? == VaultState::Uninitialized {
            output::tip("Run `caseguard init` to create a vault for this identity.");
            return Err(CaseGuardError::Precondition(format!(
                "no vault exists for identity '{}'",
                session.identity
            )));
        }

        let passphrase = prompt_passphrase()?;
        if !session.vault.unlock(&passphrase)? {
            return Err(CaseGuardError::Precondition(
                "vault metadata disappeared during unlock".into(),
            ));
        }

        if let Some(probe) = session.cases.list_cases()?.first() {
            session.vault.verify_passphrase(&probe.case_number)?;
        }

        session.audit("unlock", None, None);
        Ok(session)
    }

    /// Decrypt every stored case, paired with its stored ciphertext.
    pub fn decrypted_cases(&self) -> Result<Vec<(EncryptedCase, DecryptedCase)>> {
        self.cases
            .list_cases()?
            .into_iter()
            .map(|enc| {
                let dec = decrypt_case(&enc, |s| self.vault.decrypt_text(s))?;
                Ok((enc, dec))
            })
            .collect()
    }

    /// Find a stored case by its plaintext case number.
    pub fn find_case(&self, case_number: &str) -> Result<(EncryptedCase, DecryptedCase)> {
        self.decrypted_cases()?
            .into_iter()
            .find(|(_, dec)| dec.case_number == case_number)
            .ok_or(CaseGuardError::CaseNotFound)
    }

    /// Record an audit event. Never fails the calling command.
    #[cfg(feature = "audit-log")]
    pub fn audit(&self, op: &str, encrypted_case_number: Option<&str>, details: Option<&str>) {
        let case_ref = encrypted_case_number.map(crate::audit::case_ref);
        crate::audit::log_audit(
            &self.data_dir,
            op,
            &self.identity,
            case_ref.as_deref(),
            details,
        );
    }

    #[cfg(not(feature = "audit-log"))]
    pub fn audit(&self, _op: &str, _encrypted_case_number: Option<&str>, _details: Option<&str>) {}
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// The identity from `--identity` / `CASEGUARD_IDENTITY`.
pub fn require_identity(cli: &Cli) -> Result<String> {
    match cli.identity.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(CaseGuardError::Precondition(
            "no identity given — pass --identity or set CASEGUARD_IDENTITY".into(),
        )),
    }
}

/// Get the vault passphrase, trying in order:
/// 1. `CASEGUARD_PASSPHRASE` env var (scripted use)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_passphrase() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter vault passphrase")
        .interact()
        .map_err(|e| CaseGuardError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new passphrase with confirmation (used during `init`).
///
/// Also respects `CASEGUARD_PASSPHRASE`. Enforces a minimum length.
pub fn prompt_new_passphrase() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        if !pw.is_empty() {
            validate_new_passphrase(&pw)?;
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let passphrase = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose vault passphrase")
                .with_confirmation(
                    "Confirm vault passphrase",
                    "Passphrases do not match, try again",
                )
                .interact()
                .map_err(|e| CaseGuardError::CommandFailed(format!("passphrase prompt: {e}")))?,
        );

        if let Err(e) = validate_new_passphrase(&passphrase) {
            output::warning(&format!("{e}. Try again."));
            continue;
        }

        return Ok(passphrase);
    }
}

/// Reject passphrases too short to be worth protecting legal records with.
pub fn validate_new_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
        return Err(CaseGuardError::CommandFailed(format!(
            "passphrase must be at least {MIN_PASSPHRASE_LEN} characters"
        )));
    }
    Ok(())
}
