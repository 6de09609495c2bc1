//! Error types and handling
//!
//! Only initialization can fail with an error. Runtime misuse (stopping
//! while idle, starting while active) is absorbed by the recording state
//! machine and reported through outcome values instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Monitor-wide error type
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("There are no cameras in the sensor")]
    NoCameras,

    #[error("Duplicate camera name: {0}")]
    DuplicateCamera(String),

    #[error("Wrong cameras configuration; please provide cameras with names {expected:?} (found {found:?})")]
    CameraMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

impl MonitorError {
    /// Error for a required configuration field that is absent
    pub fn missing(field: &str) -> Self {
        MonitorError::Config(format!("Failed to get {}", field))
    }
}

/// Error response for the control transport
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<MonitorError> for ErrorResponse {
    fn from(error: MonitorError) -> Self {
        let code = match &error {
            MonitorError::Io(_) => "IO_ERROR",
            MonitorError::Serialization(_) => "SERIALIZATION_ERROR",
            MonitorError::Config(_) => "CONFIG_ERROR",
            MonitorError::NoCameras => "NO_CAMERAS",
            MonitorError::DuplicateCamera(_) => "DUPLICATE_CAMERA",
            MonitorError::CameraMismatch { .. } => "CAMERA_MISMATCH",
        };

        ErrorResponse {
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type alias using MonitorError
pub type MonitorResult<T> = Result<T, MonitorError>;
