use crate::core::parking_lot::LotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParkingError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("invalid input file, require 'create_parking_lot' as the first command (found '{found}')")]
    MissingCreateCommand { found: String },

    #[error("invalid input file: no commands found")]
    EmptySource,

    #[error("initial parking lot could not be created: {0}")]
    InitialLotRejected(LotError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ParkingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ParkingError::IoError(_) => ErrorCategory::Io,
            ParkingError::ConfigValidationError { .. }
            | ParkingError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ParkingError::MissingCreateCommand { .. }
            | ParkingError::EmptySource
            | ParkingError::InitialLotRejected(_) => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ParkingError::EmptySource => ErrorSeverity::Low,
            ParkingError::ConfigValidationError { .. }
            | ParkingError::InvalidConfigValueError { .. } => ErrorSeverity::Medium,
            ParkingError::MissingCreateCommand { .. } | ParkingError::InitialLotRejected(_) => {
                ErrorSeverity::High
            }
            ParkingError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the input file exists and is readable",
            ErrorCategory::Configuration => "Fix the configuration value and run again",
            ErrorCategory::Input => {
                "Start the input file with 'create_parking_lot <capacity>' (1..=20000)"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ParkingError::IoError(e) => format!("Could not read input: {e}"),
            ParkingError::InitialLotRejected(e) => format!("Could not create the parking lot: {e}"),
            other => other.to_string(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParkingError>;
