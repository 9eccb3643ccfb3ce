use crate::config::{TomlConfig, DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "parking-lot")]
#[command(about = "Parking lot command interpreter (batch file or interactive)")]
pub struct CliConfig {
    /// Command file to run in batch mode. Reads stdin interactively when omitted.
    pub input: Option<String>,

    /// Optional TOML settings file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Wall-clock budget for the whole run, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Prompt shown before each interactive command
    #[arg(long)]
    pub prompt: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Log memory usage at session phases")]
    pub monitor: bool,

    /// Log level taken from the settings file.
    #[arg(skip)]
    pub log_level: Option<String>,
}

impl CliConfig {
    /// Fills every setting not given on the command line from `file`.
    pub fn apply_file(&mut self, file: &TomlConfig) {
        if self.input.is_none() {
            self.input = file.input_file().map(str::to_string);
        }
        if self.timeout_secs.is_none() {
            self.timeout_secs = file.timeout_seconds();
        }
        if self.prompt.is_none() {
            self.prompt = file.prompt().map(str::to_string);
        }
        if self.log_level.is_none() {
            self.log_level = file.log_level().map(str::to_string);
        }
        self.json_logs |= file.json_logs();
    }
}

impl ConfigProvider for CliConfig {
    fn input_file(&self) -> Option<&str> {
        self.input.as_deref()
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or("")
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input {
            validate_path("input", input)?;
        }
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }
        if let Some(secs) = self.timeout_secs {
            validate_range("timeout_secs", secs, 1, MAX_TIMEOUT_SECS)?;
        }
        Ok(())
    }
}
