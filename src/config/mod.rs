//! Project configuration loaded from `caseguard.toml`.

pub mod settings;

pub use settings::Settings;
