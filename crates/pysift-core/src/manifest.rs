//! Manifest I/O - requirements.txt serialization
//!
//! The manifest is the only interchange between the discovery and
//! reconciliation paths: a newline-delimited UTF-8 file with one
//! dependency per line, `#`-prefixed comment lines ignored, and an
//! optional `==version` qualifier per entry.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default manifest filename.
pub const MANIFEST_FILE: &str = "requirements.txt";

/// Errors that can occur when reading or writing manifests.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One declared dependency: a name with an optional pinned version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Package name as written in the manifest
    pub name: String,
    /// Pinned version, from a `name==version` line
    pub version: Option<String>,
}

impl Requirement {
    /// Parse a single manifest line.
    ///
    /// A `==version` suffix is split off; anything else is taken verbatim
    /// as the name. Comparison against the installed set uses only the
    /// name, but [`Requirement::spec`] preserves the pin for the install
    /// call.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line.split_once("==") {
            Some((name, version)) => Self {
                name: name.trim().to_string(),
                version: Some(version.trim().to_string()),
            },
            None => Self {
                name: line.trim().to_string(),
                version: None,
            },
        }
    }

    /// A requirement with no version pin.
    #[must_use]
    pub fn unpinned(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// The full install argument, pin included.
    #[must_use]
    pub fn spec(&self) -> String {
        match &self.version {
            Some(version) => format!("{}=={version}", self.name),
            None => self.name.clone(),
        }
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.spec())
    }
}

/// Read declared dependencies from a manifest file, in file order.
///
/// Blank lines and `#` comment lines are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read; reconciliation cannot
/// start without a manifest.
pub fn read_manifest(path: impl AsRef<Path>) -> Result<Vec<Requirement>, ManifestError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(Requirement::parse)
        .collect())
}

/// Write a dependency set to a manifest file, one name per line.
///
/// The input set is ordered, so output is byte-stable across runs; any
/// existing file at `path` is overwritten in full, including entries
/// added by hand.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_manifest(
    path: impl AsRef<Path>,
    dependencies: &BTreeSet<String>,
) -> Result<(), ManifestError> {
    let path = path.as_ref();
    let mut content = String::new();
    for name in dependencies {
        content.push_str(name);
        content.push('\n');
    }

    std::fs::write(path, content).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })
}
