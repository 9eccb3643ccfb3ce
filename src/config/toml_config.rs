use crate::config::{DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ParkingError, Result};
use crate::utils::validation::{validate_log_level, validate_path, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Optional settings file. Every table and key may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub session: Option<SessionConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Batch file to run when none is given on the command line.
    pub input: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses settings after replacing `${VAR}` with the environment value.
    /// Unset variables are left as written.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| ParkingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let name = &caps[1];
                std::env::var(name).unwrap_or_else(|_| format!("${{{}}}", name))
            })
            .into_owned()
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.session.as_ref().and_then(|s| s.timeout_seconds)
    }

    pub fn prompt(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.prompt.as_deref())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_file(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.input.as_deref())
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds().unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    fn prompt(&self) -> &str {
        TomlConfig::prompt(self).unwrap_or("")
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(input) = self.input_file() {
            validate_path("session.input", input)?;
        }
        if let Some(secs) = self.timeout_seconds() {
            validate_range("session.timeout_seconds", secs, 1, MAX_TIMEOUT_SECS)?;
        }
        if let Some(level) = self.log_level() {
            validate_log_level("logging.level", level)?;
        }
        Ok(())
    }
}
