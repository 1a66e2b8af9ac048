// Manifest loading error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Manifest error code constants
///
/// Error code range: 4001-4003
pub struct ManifestErrorCodes {}

impl ManifestErrorCodes {
    /// File could not be read
    pub const READ_FAILED: i32 = 4001;

    /// File is not valid JSON
    pub const PARSE_FAILED: i32 = 4002;

    /// Top-level JSON value is not an object
    pub const NOT_AN_OBJECT: i32 = 4003;
}

/// Log a manifest error with structured context
///
/// This function logs manifest errors with structured fields including:
/// - error_code: Numeric error code for programmatic handling
/// - message: Human-readable error message
/// - context: Additional contextual information
pub fn log_manifest_error(err: &ManifestError, context: &str) {
    error!(
        "Manifest error in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Fatal errors raised while loading a manifest or config file
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestError {
    /// File could not be read
    ReadFailed { path: String, details: String },

    /// File contents are not valid JSON
    ParseFailed { path: String, details: String },

    /// Top-level value is not a JSON object
    NotAnObject { path: String },
}

impl ErrorCode for ManifestError {
    fn code(&self) -> i32 {
        match self {
            ManifestError::ReadFailed { .. } => ManifestErrorCodes::READ_FAILED,
            ManifestError::ParseFailed { .. } => ManifestErrorCodes::PARSE_FAILED,
            ManifestError::NotAnObject { .. } => ManifestErrorCodes::NOT_AN_OBJECT,
        }
    }

    fn message(&self) -> String {
        match self {
            ManifestError::ReadFailed { path, details } => {
                format!("Failed to read {}: {}", path, details)
            }
            ManifestError::ParseFailed { path, details } => {
                format!("Failed to parse {} as JSON: {}", path, details)
            }
            ManifestError::NotAnObject { path } => {
                format!("{} must contain a JSON object at the top level", path)
            }
        }
    }
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ManifestError (code {}): {}",
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ManifestError {}
