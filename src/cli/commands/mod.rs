//! One module per subcommand.

#[cfg(feature = "audit-log")]
pub mod audit_cmd;
pub mod add;
pub mod delete;
pub mod export;
pub mod init;
pub mod list;
pub mod set_status;
pub mod show;
pub mod status;
