//! Case records and their encryption.
//!
//! - Plaintext and ciphertext record types plus `Status` (`model`)
//! - Field-by-field encrypt/decrypt of whole records (`codec`)
//! - Automatic status suggestion from hearing dates (`status`)
//! - The record store collaborator and its backends (`repository`)

pub mod codec;
pub mod model;
pub mod repository;
pub mod status;

pub use codec::{decrypt_case, decrypt_cases, encrypt_case};
pub use model::{DecryptedCase, DecryptedHearing, EncryptedCase, EncryptedHearing, Status};
pub use repository::{CaseRepository, JsonCaseFile, MemoryCaseRepository};
pub use status::auto_status;
