use std::sync::Arc;

use crate::config::MetadataConfig;
use crate::expect::expect_field;
use crate::manifest::Manifest;
use crate::runner::Suite;

/// Leading `major.minor.patch` of a package version.
pub const SEMVER_PATTERN: &str = r"^\d+\.\d+\.\d+";

pub fn register(suite: &mut Suite, manifest: &Arc<Manifest>, config: &MetadataConfig) {
    let pkg = Arc::clone(manifest);
    let expected = config.name.clone();
    suite.test("has a package name", move || {
        let name = expect_field(pkg.get("name")).to_be_truthy()?;
        if let Some(expected) = expected {
            name.to_be(expected)?;
        }
        Ok(())
    });

    let pkg = Arc::clone(manifest);
    let expected = config.version.clone();
    suite.test("uses a semantic version", move || {
        let version = expect_field(pkg.get("version")).to_match(SEMVER_PATTERN)?;
        if let Some(expected) = expected {
            version.to_be(expected)?;
        }
        Ok(())
    });

    if config.require_private {
        let pkg = Arc::clone(manifest);
        suite.test("is marked private", move || {
            expect_field(pkg.get("private")).to_be(true)?;
            Ok(())
        });
    }
}
