//! Vault module — per-identity key lifecycle.
//!
//! This module provides:
//! - `VaultMetadata` and the `MetadataStore` backends (`metadata`)
//! - The `VaultStore` lock/unlock state machine (`store`)

pub mod metadata;
pub mod store;

// Re-export the most commonly used items.
pub use metadata::{FileMetadataStore, MemoryMetadataStore, MetadataStore, VaultMetadata};
pub use store::{VaultState, VaultStore};
