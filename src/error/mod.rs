// Error types for the manifest audit
//
// Assertion failures are recoverable per test case; manifest errors are fatal
// to the whole run. Both carry numeric codes so callers can tell them apart
// without string matching.

mod assertion;
mod manifest;

pub use assertion::{log_assertion_error, AssertionError, AssertionErrorCodes};
pub use manifest::{log_manifest_error, ManifestError, ManifestErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent reporting from both the
/// runner and the CLI.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
