//! Project configuration (`pysift.toml`) parsing and validation.
//!
//! The config file is optional; an absent file means defaults. It holds
//! the settings a project would otherwise pass on every invocation:
//!
//! ```toml
//! [project]
//! python-version = "3.12"
//! manifest = "requirements.txt"
//! exclude = ["build", "dist"]
//! ```

use crate::manifest::MANIFEST_FILE;
use crate::stdlib::{builtins, PythonVersion, StdlibError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The configuration filename.
pub const CONFIG_FILE: &str = "pysift.toml";

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Version(#[from] StdlibError),
}

/// The complete pysift.toml configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project settings.
    #[serde(default)]
    pub project: Project,
}

/// The `[project]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// Python version token for the standard-library tables.
    #[serde(default, rename = "python-version")]
    pub python_version: Option<String>,

    /// Manifest path, relative to the project root.
    #[serde(default)]
    pub manifest: Option<String>,

    /// Extra directory names for the scanner to skip.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Config {
    /// Load the config from a project root, falling back to defaults when
    /// no config file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed, or
    /// declares an unsupported Python version.
    pub fn load_or_default(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = root.as_ref().join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // An unsupported version should fail at load, not mid-scan
        builtins(self.python_version()?)?;
        Ok(())
    }

    /// The configured Python version, or the newest supported one.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured token does not parse.
    pub fn python_version(&self) -> Result<PythonVersion, StdlibError> {
        match &self.project.python_version {
            Some(token) => token.parse(),
            None => Ok(PythonVersion::default()),
        }
    }

    /// The manifest path, resolved against the project root.
    #[must_use]
    pub fn manifest_path(&self, root: &Path) -> PathBuf {
        match &self.project.manifest {
            Some(manifest) => root.join(manifest),
            None => root.join(MANIFEST_FILE),
        }
    }
}
