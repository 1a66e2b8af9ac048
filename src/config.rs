//! Audit configuration
//!
//! Expected values for the check catalog live here rather than in code so a
//! manifest bump only needs a config edit. Loading follows two paths: the
//! implicit `manifest-audit.json` next to the manifest falls back to defaults
//! with a warning, while a path passed explicitly must load cleanly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ManifestError;

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_PATH: &str = "manifest-audit.json";

/// Complete audit configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub metadata: MetadataConfig,
    pub scripts: ScriptsConfig,
    pub dependencies: DependenciesConfig,
    pub security: SecurityConfig,
}

/// Expectations for top-level package metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Exact package name; `None` only requires a non-empty name
    pub name: Option<String>,
    /// Exact version string; `None` only requires semver shape
    pub version: Option<String>,
    /// Require `"private": true`
    pub require_private: bool,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            name: None,
            version: None,
            require_private: true,
        }
    }
}

/// Scripts that must be declared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    pub required: Vec<String>,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            required: ["dev", "build", "start", "lint"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Dependency hygiene rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependenciesConfig {
    /// Packages whose declared spec must equal the given string exactly
    pub pinned: BTreeMap<String, String>,
    /// Package pairs that must declare identical specs
    pub consistent_pairs: Vec<(String, String)>,
}

impl Default for DependenciesConfig {
    fn default() -> Self {
        Self {
            pinned: BTreeMap::new(),
            consistent_pairs: vec![("react".to_string(), "react-dom".to_string())],
        }
    }
}

/// Minimum versions closing known advisories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Package name to minimum `major.minor.patch`
    pub minimum_versions: BTreeMap<String, String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            minimum_versions: BTreeMap::from([("next".to_string(), "15.5.10".to_string())]),
        }
    }
}

impl AuditConfig {
    /// Load configuration from a JSON file, returning defaults when the file
    /// is missing or invalid.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_strict(&path) {
            Ok(config) => {
                log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                config
            }
            Err(ManifestError::ReadFailed { .. }) if !path.as_ref().exists() => {
                log::debug!(
                    "[Config] No config file at {:?}. Using defaults.",
                    path.as_ref()
                );
                Self::default()
            }
            Err(err) => {
                log::warn!("[Config] {}. Using defaults.", err);
                Self::default()
            }
        }
    }

    /// Load configuration from a JSON file, failing on any read or parse error.
    pub fn load_strict<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| ManifestError::ReadFailed {
            path: path.display().to_string(),
            details: err.to_string(),
        })?;
        Self::from_json(path, &contents)
    }

    /// Parse configuration contents, labelling errors with `path`.
    pub fn from_json<P: AsRef<Path>>(path: P, data: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(data).map_err(|err| ManifestError::ParseFailed {
            path: path.as_ref().display().to_string(),
            details: err.to_string(),
        })
    }

    /// Load the implicit config from the working directory.
    pub fn load() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }
}
