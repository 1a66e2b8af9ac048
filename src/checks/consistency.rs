use serde_json::Value;
use std::sync::Arc;

use crate::error::AssertionError;
use crate::expect::expect;
use crate::manifest::Manifest;
use crate::runner::Suite;

pub fn register(suite: &mut Suite, manifest: &Arc<Manifest>, pairs: &[(String, String)]) {
    for (left, right) in pairs {
        let pkg = Arc::clone(manifest);
        let (left, right) = (left.clone(), right.clone());
        suite.test(format!("keeps {left} and {right} in sync"), move || {
            match (pkg.dependency(&left), pkg.dependency(&right)) {
                (None, None) => {
                    tracing::debug!(%left, %right, "neither package declared; skipping");
                    Ok(())
                }
                (Some((_, a)), Some((_, b))) => {
                    expect(&Value::from(b)).to_be(a)?;
                    Ok(())
                }
                (Some(_), None) => Err(missing_partner(&left, &right)),
                (None, Some(_)) => Err(missing_partner(&right, &left)),
            }
        });
    }
}

fn missing_partner(declared: &str, missing: &str) -> AssertionError {
    AssertionError::violation(format!(
        "{declared} is declared but {missing} is not"
    ))
}
