#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

/// Whole-run wall-clock budget when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Upper bound accepted for a configured timeout.
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;
