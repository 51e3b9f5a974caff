//! Package-manager interface and the pip backend
//!
//! The reconciler only needs two operations from the environment: the set
//! of installed packages and a way to install one. Both go through the
//! [`PackageManager`] trait so tests can substitute a scripted fake.
//!
//! The real backend shells out to `python -m pip`. Install calls are
//! issued one at a time and never concurrently; pip's caches and locks
//! are not safe under overlapping invocations.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

/// Errors from the package manager.
#[derive(Error, Debug)]
pub enum PipError {
    #[error("failed to invoke {python}: {source}")]
    Spawn {
        python: String,
        source: std::io::Error,
    },

    #[error("pip list failed: {0}")]
    ListFailed(String),

    #[error("failed to parse pip list output: {0}")]
    ParseList(#[from] serde_json::Error),

    #[error("failed to install {spec}: {reason}")]
    InstallFailed { spec: String, reason: String },
}

/// Normalize a package name the way the package index does (PEP 503):
/// lowercase, with runs of `-`, `_`, and `.` collapsed to a single `-`.
#[must_use]
pub fn normalize(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut previous_sep = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !previous_sep {
                normalized.push('-');
            }
            previous_sep = true;
        } else {
            normalized.push(c.to_ascii_lowercase());
            previous_sep = false;
        }
    }
    normalized
}

/// The packages the environment currently reports as installed.
///
/// Owned by the external package manager; pysift only tests membership.
/// Names are stored normalized, so lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct InstalledSet {
    packages: BTreeMap<String, String>,
}

impl InstalledSet {
    /// Build a set from `(name, version)` pairs.
    pub fn from_packages<I, N, V>(packages: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<String>,
    {
        Self {
            packages: packages
                .into_iter()
                .map(|(name, version)| (normalize(name.as_ref()), version.into()))
                .collect(),
        }
    }

    /// Whether a package is installed, by normalized name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(&normalize(name))
    }

    /// The installed version of a package, if present.
    #[must_use]
    pub fn version(&self, name: &str) -> Option<&str> {
        self.packages.get(&normalize(name)).map(String::as_str)
    }

    /// Number of installed packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the environment reports nothing installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// The two operations the reconciler needs from a package manager.
pub trait PackageManager {
    /// Query the set of currently installed packages.
    ///
    /// # Errors
    ///
    /// Returns an error when the environment cannot be queried at all;
    /// reconciliation cannot start without an answer.
    fn installed(&self) -> Result<InstalledSet, PipError>;

    /// Install one package, blocking until the operation finishes.
    ///
    /// # Errors
    ///
    /// Returns an error with an opaque reason when the install fails;
    /// the caller decides whether to continue.
    fn install(&mut self, spec: &str) -> Result<(), PipError>;
}

/// One row of `pip list --format=json`.
#[derive(Debug, Deserialize)]
struct ListedPackage {
    name: String,
    version: String,
}

/// pip, invoked through a Python interpreter.
#[derive(Debug, Clone)]
pub struct Pip {
    python: PathBuf,
}

impl Pip {
    /// Use pip through the given interpreter.
    #[must_use]
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.python);
        command.args(["-m", "pip", "--disable-pip-version-check"]);
        command
    }

    fn spawn_error(&self, source: std::io::Error) -> PipError {
        PipError::Spawn {
            python: self.python.display().to_string(),
            source,
        }
    }
}

impl Default for Pip {
    fn default() -> Self {
        Self::new("python3")
    }
}

impl PackageManager for Pip {
    fn installed(&self) -> Result<InstalledSet, PipError> {
        let output = self
            .command()
            .args(["list", "--format=json"])
            .output()
            .map_err(|source| self.spawn_error(source))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipError::ListFailed(stderr.trim().to_string()));
        }

        let listed: Vec<ListedPackage> = serde_json::from_slice(&output.stdout)?;
        Ok(InstalledSet::from_packages(
            listed.into_iter().map(|p| (p.name, p.version)),
        ))
    }

    fn install(&mut self, spec: &str) -> Result<(), PipError> {
        let output = self
            .command()
            .args(["install", spec])
            .output()
            .map_err(|source| self.spawn_error(source))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("pip exited with {}", output.status),
                stderr => stderr.to_string(),
            };
            Err(PipError::InstallFailed {
                spec: spec.to_string(),
                reason,
            })
        }
    }
}
