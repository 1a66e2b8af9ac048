use semver::Version;
use std::sync::Arc;

use crate::config::SecurityConfig;
use crate::error::AssertionError;
use crate::manifest::{Manifest, VersionSpec};
use crate::runner::Suite;

pub fn register(suite: &mut Suite, manifest: &Arc<Manifest>, config: &SecurityConfig) {
    for (name, minimum) in &config.minimum_versions {
        let pkg = Arc::clone(manifest);
        let name = name.clone();
        let minimum = minimum.clone();
        suite.test(format!("{name} is at least {minimum}"), move || {
            check_minimum(&pkg, &name, &minimum)
        });
    }
}

/// Fail when the spec declared for `name` admits any version below
/// `minimum`. Undeclared packages pass.
pub fn check_minimum(manifest: &Manifest, name: &str, minimum: &str) -> Result<(), AssertionError> {
    let floor = Version::parse(minimum).map_err(|err| {
        AssertionError::violation(format!("Invalid minimum version {minimum}: {err}"))
    })?;
    let Some((_, declared)) = manifest.dependency(name) else {
        tracing::debug!(%name, "package not declared; skipping minimum check");
        return Ok(());
    };
    let spec = VersionSpec::parse(declared).ok_or_else(|| {
        AssertionError::violation(format!(
            "Cannot determine a version for {name} from \"{declared}\""
        ))
    })?;
    if spec.satisfies_minimum(&floor) {
        Ok(())
    } else {
        Err(AssertionError::ComparisonFailed {
            operator: ">=",
            expected: floor.to_string(),
            actual: format!("{name}@\"{declared}\""),
        })
    }
}
