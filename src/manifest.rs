//! Loader + typed accessors for the `package.json` manifest under audit.
//!
//! The manifest is kept as a raw JSON object so matchers can inspect any key,
//! while the accessors below cover the fields the check catalog cares about.
//! Nothing here enforces the audited invariants; that is the job of the
//! checks registered against the loaded manifest.

use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::ManifestError;

pub mod version;

pub use version::{RangeOperator, VersionSpec};

/// Manifest path used when the CLI is given no override.
pub const DEFAULT_MANIFEST_PATH: &str = "package.json";

/// Label used for manifests built in memory rather than read from disk.
const INLINE_LABEL: &str = "<inline>";

/// Which dependency table a package was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Runtime,
    Dev,
}

impl DependencyKind {
    /// Manifest key holding this table.
    pub fn field(&self) -> &'static str {
        match self {
            DependencyKind::Runtime => "dependencies",
            DependencyKind::Dev => "devDependencies",
        }
    }
}

/// Parsed manifest, read once per run and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    path: PathBuf,
    root: Value,
}

impl Manifest {
    /// Read and parse a manifest from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|err| ManifestError::ReadFailed {
            path: path.display().to_string(),
            details: err.to_string(),
        })?;
        let manifest = Self::from_json(path, &contents)?;
        tracing::info!(
            path = %path.display(),
            keys = manifest.fields().len(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// Parse manifest contents, labelling errors with `path`.
    pub fn from_json(path: impl AsRef<Path>, data: &str) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let value: Value = serde_json::from_str(data).map_err(|err| ManifestError::ParseFailed {
            path: path.display().to_string(),
            details: err.to_string(),
        })?;
        Self::with_path(path.to_path_buf(), value)
    }

    /// Wrap an in-memory JSON value.
    pub fn from_value(value: Value) -> Result<Self, ManifestError> {
        Self::with_path(PathBuf::from(INLINE_LABEL), value)
    }

    fn with_path(path: PathBuf, value: Value) -> Result<Self, ManifestError> {
        if value.is_object() {
            Ok(Self { path, root: value })
        } else {
            Err(ManifestError::NotAnObject {
                path: path.display().to_string(),
            })
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whole manifest as a JSON value; always an object.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Top-level fields.
    pub fn fields(&self) -> &Map<String, Value> {
        static EMPTY: Lazy<Map<String, Value>> = Lazy::new(Map::new);
        self.root.as_object().unwrap_or(&EMPTY)
    }

    /// Raw top-level field lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.get("version").and_then(Value::as_str)
    }

    /// True only when `private` is the boolean `true`.
    pub fn is_private(&self) -> bool {
        matches!(self.get("private"), Some(Value::Bool(true)))
    }

    pub fn scripts(&self) -> Option<&Map<String, Value>> {
        self.get("scripts").and_then(Value::as_object)
    }

    /// Dependency table of the given kind, if it is present and an object.
    pub fn dependency_table(&self, kind: DependencyKind) -> Option<&Map<String, Value>> {
        self.get(kind.field()).and_then(Value::as_object)
    }

    /// Declared version spec for `name`, preferring runtime dependencies.
    pub fn dependency(&self, name: &str) -> Option<(DependencyKind, &str)> {
        [DependencyKind::Runtime, DependencyKind::Dev]
            .into_iter()
            .find_map(|kind| {
                self.dependency_table(kind)
                    .and_then(|table| table.get(name))
                    .and_then(Value::as_str)
                    .map(|spec| (kind, spec))
            })
    }

    /// Package names declared in both `dependencies` and `devDependencies`.
    pub fn duplicate_dependencies(&self) -> BTreeSet<String> {
        let (Some(runtime), Some(dev)) = (
            self.dependency_table(DependencyKind::Runtime),
            self.dependency_table(DependencyKind::Dev),
        ) else {
            return BTreeSet::new();
        };
        runtime
            .keys()
            .filter(|name| dev.contains_key(name.as_str()))
            .cloned()
            .collect()
    }
}
