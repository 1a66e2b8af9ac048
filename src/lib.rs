// Manifest Audit - package.json validation suite
// Matcher/runner micro-framework plus the check catalog run against a
// front-end package manifest.

// Module declarations
pub mod checks;
pub mod config;
pub mod error;
pub mod expect;
pub mod manifest;
pub mod runner;

// Re-exports for convenience
pub use checks::build_suite;
pub use config::AuditConfig;
pub use error::{AssertionError, ErrorCode, ManifestError};
pub use expect::{expect, expect_field, expect_fn};
pub use manifest::Manifest;
pub use runner::{RunSummary, Suite};
