//! Check catalog registered against a loaded manifest.
//!
//! Each submodule contributes one `describe` group. Cases share the manifest
//! through an `Arc` and own clones of the config slice they need, so the
//! suite can outlive the config it was built from.

use serde_json::Value;
use std::sync::Arc;

use crate::config::AuditConfig;
use crate::error::AssertionError;
use crate::expect::{describe, type_of};
use crate::manifest::Manifest;
use crate::runner::Suite;

pub mod consistency;
pub mod dependencies;
pub mod metadata;
pub mod scripts;
pub mod security;

/// Build the full suite for `manifest`.
pub fn build_suite(manifest: Arc<Manifest>, config: &AuditConfig) -> Suite {
    let mut suite = Suite::new();
    register_all(&mut suite, &manifest, config);
    suite
}

/// Register every check group on `suite`, in reporting order.
pub fn register_all(suite: &mut Suite, manifest: &Arc<Manifest>, config: &AuditConfig) {
    suite.describe("metadata", |suite| {
        metadata::register(suite, manifest, &config.metadata)
    });
    suite.describe("scripts", |suite| {
        scripts::register(suite, manifest, &config.scripts)
    });
    suite.describe("dependencies", |suite| {
        dependencies::register(suite, manifest, &config.dependencies)
    });
    suite.describe("version consistency", |suite| {
        consistency::register(suite, manifest, &config.dependencies.consistent_pairs)
    });
    suite.describe("security", |suite| {
        security::register(suite, manifest, &config.security)
    });
}

/// Fail unless `value` is a non-array JSON object.
fn require_object(field: &str, value: Option<&Value>) -> Result<(), AssertionError> {
    match value {
        Some(Value::Object(_)) => Ok(()),
        other => Err(AssertionError::violation(format!(
            "Expected {field} to be an object, got {} {}",
            type_of(other),
            describe(other)
        ))),
    }
}

#[cfg(test)]
mod tests;
