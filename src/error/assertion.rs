// Assertion error types and constants

use crate::error::ErrorCode;
use std::fmt;

/// Assertion error code constants
///
/// Error code range: 3001-3006
pub struct AssertionErrorCodes {}

impl AssertionErrorCodes {
    /// Actual value differs from the expected one
    pub const NOT_EQUAL: i32 = 3001;

    /// String did not satisfy (or unexpectedly satisfied) a pattern
    pub const PATTERN_MISMATCH: i32 = 3002;

    /// Object is nullish or lacks the requested key
    pub const MISSING_PROPERTY: i32 = 3003;

    /// Value is falsy
    pub const NOT_TRUTHY: i32 = 3004;

    /// Numeric ordering did not hold
    pub const COMPARISON_FAILED: i32 = 3005;

    /// Any other violated expectation
    pub const VIOLATION: i32 = 3006;
}

/// Log an assertion failure with structured context
///
/// Emitted at debug level: assertion failures are expected outcomes that the
/// runner already reports on stdout.
pub fn log_assertion_error(err: &AssertionError, context: &str) {
    tracing::debug!(
        code = err.code(),
        context,
        message = %err.message(),
        "assertion failed"
    );
}

/// Failure raised by a matcher when its predicate does not hold
///
/// Values are stored pre-serialized as JSON so messages read the same way
/// regardless of the value's type.
#[derive(Debug, Clone, PartialEq)]
pub enum AssertionError {
    /// Strict or deep equality failed
    NotEqual { expected: String, actual: String },

    /// Pattern test failed; `negated` is set for `not().to_match`
    PatternMismatch {
        pattern: String,
        actual: String,
        negated: bool,
    },

    /// Object is nullish or lacks `key`
    MissingProperty { key: String, actual: String },

    /// Value is falsy
    NotTruthy { actual: String },

    /// Numeric comparison failed
    ComparisonFailed {
        operator: &'static str,
        expected: String,
        actual: String,
    },

    /// Free-form failure for negations, containment and custom checks
    Violation { reason: String },
}

impl AssertionError {
    /// Shorthand for a free-form [`AssertionError::Violation`].
    pub fn violation(reason: impl Into<String>) -> Self {
        AssertionError::Violation {
            reason: reason.into(),
        }
    }
}

impl ErrorCode for AssertionError {
    fn code(&self) -> i32 {
        match self {
            AssertionError::NotEqual { .. } => AssertionErrorCodes::NOT_EQUAL,
            AssertionError::PatternMismatch { .. } => AssertionErrorCodes::PATTERN_MISMATCH,
            AssertionError::MissingProperty { .. } => AssertionErrorCodes::MISSING_PROPERTY,
            AssertionError::NotTruthy { .. } => AssertionErrorCodes::NOT_TRUTHY,
            AssertionError::ComparisonFailed { .. } => AssertionErrorCodes::COMPARISON_FAILED,
            AssertionError::Violation { .. } => AssertionErrorCodes::VIOLATION,
        }
    }

    fn message(&self) -> String {
        match self {
            AssertionError::NotEqual { expected, actual } => {
                format!("Expected {} to be {}", actual, expected)
            }
            AssertionError::PatternMismatch {
                pattern,
                actual,
                negated: false,
            } => format!("Expected {} to match /{}/", actual, pattern),
            AssertionError::PatternMismatch {
                pattern,
                actual,
                negated: true,
            } => format!("Expected {} not to match /{}/", actual, pattern),
            AssertionError::MissingProperty { key, actual } => {
                format!("Expected {} to have property \"{}\"", actual, key)
            }
            AssertionError::NotTruthy { actual } => {
                format!("Expected {} to be truthy", actual)
            }
            AssertionError::ComparisonFailed {
                operator,
                expected,
                actual,
            } => format!("Expected {} {} {}", actual, operator, expected),
            AssertionError::Violation { reason } => reason.clone(),
        }
    }
}

impl fmt::Display for AssertionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for AssertionError {}
