use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::DatasetError;

/// Version name that selects the greatest declared version
pub const LATEST: &str = "latest";

/// Supplies local file locations for a data type or helper key
pub trait FileResolver {
    /// Paths for `key`, all of which exist locally
    fn resolve(&self, key: &str) -> Result<Vec<PathBuf>, DatasetError>;
}

/// File names per data type, per declared version of a source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    versions: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl Manifest {
    /// Empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a version and its files.
    pub fn with_version(mut self, version: &str, files: &[(&str, &[&str])]) -> Self {
        let entry = self.versions.entry(version.to_string()).or_default();
        for (key, names) in files {
            entry.insert(key.to_string(), names.iter().map(|n| n.to_string()).collect());
        }
        self
    }

    /// Declared versions, ascending
    pub fn versions(&self) -> Vec<String> {
        self.versions.keys().cloned().collect()
    }

    /// Resolve `latest` (greatest version string) or check an explicit version.
    pub fn resolve_version(&self, requested: &str) -> Result<String, DatasetError> {
        let invalid = || DatasetError::InvalidVersion {
            requested: requested.to_string(),
            valid: self.versions(),
        };
        if requested == LATEST {
            return self.versions.keys().next_back().cloned().ok_or_else(invalid);
        }
        if self.versions.contains_key(requested) {
            Ok(requested.to_string())
        } else {
            Err(invalid())
        }
    }

    /// Files of one version
    pub fn files(&self, version: &str) -> Option<&BTreeMap<String, Vec<String>>> {
        self.versions.get(version)
    }
}

/// Resolves keys against one local directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalResolver {
    source: String,
    root: PathBuf,
    files: BTreeMap<String, Vec<String>>,
}

impl LocalResolver {
    /// Resolver over explicit file lists
    pub fn new(source: impl Into<String>, root: impl Into<PathBuf>, files: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            source: source.into(),
            root: root.into(),
            files,
        }
    }

    /// Resolver over one manifest version (`latest` allowed); returns the resolved version too.
    pub fn from_manifest(
        source: impl Into<String>,
        root: impl Into<PathBuf>,
        manifest: &Manifest,
        version: &str,
    ) -> Result<(Self, String), DatasetError> {
        let version = manifest.resolve_version(version)?;
        let files = manifest.files(&version).cloned().unwrap_or_default();
        Ok((Self::new(source, root, files), version))
    }

    /// Replace the file list of one key
    pub fn with_files(mut self, key: impl Into<String>, names: Vec<String>) -> Self {
        self.files.insert(key.into(), names);
        self
    }

    /// Directory the files live in
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileResolver for LocalResolver {
    fn resolve(&self, key: &str) -> Result<Vec<PathBuf>, DatasetError> {
        let names = self
            .files
            .get(key)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DatasetError::UndefinedDataType {
                key: key.to_string(),
                source_name: self.source.clone(),
            })?;
        names
            .iter()
            .map(|name| {
                let path = self.root.join(name);
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(DatasetError::MissingFile(path))
                }
            })
            .collect()
    }
}
