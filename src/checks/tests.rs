use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::*;
use crate::config::{DependenciesConfig, SecurityConfig};
use crate::error::ErrorCode;
use crate::runner::RunSummary;

fn manifest(value: Value) -> Arc<Manifest> {
    Arc::new(Manifest::from_value(value).unwrap())
}

fn baseline() -> Value {
    json!({
        "name": "@scope/pkg",
        "version": "1.0.0",
        "private": true,
        "scripts": {
            "dev": "next dev",
            "build": "next build",
            "start": "next start",
            "lint": "next lint"
        },
        "dependencies": {
            "next": "^15.5.10",
            "react": "18.2.0",
            "react-dom": "18.2.0"
        },
        "devDependencies": {
            "typescript": "5.3.3"
        }
    })
}

fn run_group(value: Value, group: &str) -> RunSummary {
    let mut suite = build_suite(manifest(value), &AuditConfig::default());
    suite.retain_matching(group);
    assert!(!suite.is_empty(), "no cases matched {group}");
    suite.run_quiet()
}

#[test]
fn baseline_manifest_passes_everything() {
    let summary = build_suite(manifest(baseline()), &AuditConfig::default()).run_quiet();
    assert_eq!(summary.failed, 0, "{:?}", summary.failures);
    assert_eq!(summary.exit_code(), 0);
}

#[test]
fn security_minimum_accepts_patched_next() {
    let pkg = manifest(json!({
        "name": "@scope/pkg",
        "version": "1.0.0",
        "private": true,
        "dependencies": {"next": "^15.5.10"},
        "devDependencies": {}
    }));
    assert!(security::check_minimum(&pkg, "next", "15.5.10").is_ok());
    let summary = {
        let mut suite = Suite::new();
        security::register(&mut suite, &pkg, &SecurityConfig::default());
        suite.run_quiet()
    };
    assert_eq!(summary.passed, 1);
}

#[test]
fn security_minimum_rejects_vulnerable_next() {
    let pkg = manifest(json!({
        "name": "@scope/pkg",
        "version": "1.0.0",
        "private": true,
        "dependencies": {"next": "^15.4.0"},
        "devDependencies": {}
    }));
    let err = security::check_minimum(&pkg, "next", "15.5.10").unwrap_err();
    assert!(err.message().contains("15.5.10"), "{}", err.message());
    assert!(err.message().contains("^15.4.0"), "{}", err.message());
}

#[test]
fn security_minimum_skips_undeclared_and_flags_unparsable() {
    let pkg = manifest(json!({"dependencies": {"next": "canary"}}));
    assert!(security::check_minimum(&pkg, "react", "18.0.0").is_ok());
    assert!(security::check_minimum(&pkg, "next", "15.5.10").is_err());
    assert!(security::check_minimum(&pkg, "react", "not-a-version").is_err());
}

#[test]
fn security_minimum_judges_whole_range() {
    let rejected = [
        "<16.0.0",
        "<=15.9.0",
        "15.5.10-canary.3",
        ">15.5.8",
        "^14.2.0 || ^15.5.10",
        ">=15.0.0 <16.0.0",
    ];
    for declared in rejected {
        let pkg = manifest(json!({"dependencies": {"next": declared}}));
        let err = security::check_minimum(&pkg, "next", "15.5.10").unwrap_err();
        assert!(err.message().contains(declared), "{}", err.message());
    }

    let accepted = [">15.5.9", "^15.5.10 || ^16.0.0", ">=15.5.10 <16.0.0", "15.5.11-canary.1"];
    for declared in accepted {
        let pkg = manifest(json!({"dependencies": {"next": declared}}));
        assert!(
            security::check_minimum(&pkg, "next", "15.5.10").is_ok(),
            "{declared} should pass"
        );
    }
}

#[test]
fn mismatched_react_versions_fail_consistency() {
    let mut value = baseline();
    value["dependencies"]["react-dom"] = json!("18.1.0");
    let summary = run_group(value, "version consistency");
    assert_eq!(summary.failed, 1);
    assert!(summary.failures[0].message.contains("18.1.0"));
}

#[test]
fn identical_react_versions_pass_consistency() {
    let summary = run_group(baseline(), "version consistency");
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.passed, 1);
}

#[test]
fn consistency_requires_both_partners() {
    let pkg = manifest(json!({"dependencies": {"react": "18.2.0"}}));
    let mut suite = Suite::new();
    consistency::register(
        &mut suite,
        &pkg,
        &DependenciesConfig::default().consistent_pairs,
    );
    let summary = suite.run_quiet();
    assert_eq!(summary.failed, 1);
    assert!(summary.failures[0].message.contains("react-dom is not"));
}

#[test]
fn duplicate_dependency_fails() {
    let mut value = baseline();
    value["devDependencies"]["react"] = json!("18.2.0");
    let summary = run_group(value, "both dependencies and devDependencies");
    assert_eq!(summary.failed, 1);
    assert!(summary.failures[0].message.contains("react"));
}

#[test]
fn no_duplicate_dependency_passes() {
    let summary = run_group(baseline(), "both dependencies and devDependencies");
    assert_eq!(summary.passed, 1);
}

#[test]
fn metadata_checks_configured_values() {
    let mut config = AuditConfig::default();
    config.metadata.name = Some("@scope/other".to_string());
    config.metadata.version = Some("1.0.0".to_string());
    let mut suite = build_suite(manifest(baseline()), &config);
    suite.retain_matching("metadata");
    let summary = suite.run_quiet();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].description, "metadata > has a package name");
}

#[test]
fn metadata_rejects_bad_version_and_public_package() {
    let mut value = baseline();
    value["version"] = json!("one");
    value["private"] = json!(false);
    let summary = run_group(value, "metadata");
    assert_eq!(summary.failed, 2);
}

#[test]
fn missing_script_is_reported() {
    let mut value = baseline();
    value["scripts"].as_object_mut().unwrap().remove("lint");
    let summary = run_group(value, "scripts");
    assert_eq!(summary.failed, 1);
    assert!(summary.failures[0].description.contains("\"lint\""));
}

#[test]
fn scripts_must_be_an_object() {
    let mut value = baseline();
    value["scripts"] = json!(["dev"]);
    let summary = run_group(value, "declares a scripts object");
    assert_eq!(summary.failed, 1);
}

#[test]
fn empty_version_specs_fail() {
    let mut value = baseline();
    value["devDependencies"]["eslint"] = json!("");
    let summary = run_group(value, "non-empty string");
    assert_eq!(summary.failed, 1);
    assert!(summary.failures[0].message.contains("eslint"));
}

#[test]
fn pinned_versions_must_match_exactly() {
    let mut config = AuditConfig::default();
    config.dependencies.pinned = BTreeMap::from([
        ("typescript".to_string(), "5.3.3".to_string()),
        ("prettier".to_string(), "3.1.0".to_string()),
    ]);
    let mut suite = build_suite(manifest(baseline()), &config);
    suite.retain_matching("pins");
    let summary = suite.run_quiet();
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 1);
    assert!(summary.failures[0].message.contains("prettier"));
}
