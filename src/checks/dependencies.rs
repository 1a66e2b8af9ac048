use serde_json::Value;
use std::sync::Arc;

use super::require_object;
use crate::config::DependenciesConfig;
use crate::error::AssertionError;
use crate::expect::{describe, expect};
use crate::manifest::{DependencyKind, Manifest};
use crate::runner::Suite;

const KINDS: [DependencyKind; 2] = [DependencyKind::Runtime, DependencyKind::Dev];

pub fn register(suite: &mut Suite, manifest: &Arc<Manifest>, config: &DependenciesConfig) {
    for kind in KINDS {
        let pkg = Arc::clone(manifest);
        suite.test(format!("declares {}", kind.field()), move || {
            require_object(kind.field(), pkg.get(kind.field()))
        });
    }

    let pkg = Arc::clone(manifest);
    suite.test(
        "has no package in both dependencies and devDependencies",
        move || {
            let duplicates = pkg.duplicate_dependencies();
            if duplicates.is_empty() {
                Ok(())
            } else {
                Err(AssertionError::violation(format!(
                    "Declared in both tables: {}",
                    duplicates.into_iter().collect::<Vec<_>>().join(", ")
                )))
            }
        },
    );

    let pkg = Arc::clone(manifest);
    suite.test("declares every version as a non-empty string", move || {
        let invalid: Vec<String> = KINDS
            .into_iter()
            .filter_map(|kind| pkg.dependency_table(kind))
            .flatten()
            .filter(|(_, spec)| !matches!(spec, Value::String(s) if !s.trim().is_empty()))
            .map(|(name, spec)| format!("{name}={}", describe(Some(spec))))
            .collect();
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(AssertionError::violation(format!(
                "Invalid version specs: {}",
                invalid.join(", ")
            )))
        }
    });

    for (name, pinned) in &config.pinned {
        let pkg = Arc::clone(manifest);
        let name = name.clone();
        let pinned = pinned.clone();
        suite.test(format!("pins {name} to {pinned}"), move || {
            let (_, declared) = pkg.dependency(&name).ok_or_else(|| {
                AssertionError::violation(format!("Expected {name} to be declared"))
            })?;
            expect(&Value::from(declared)).to_be(&pinned)?;
            Ok(())
        });
    }
}
