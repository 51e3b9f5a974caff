//! Implementation of the `pysift scan` command (the discovery path).

use anyhow::{Context, Result};
use pysift_core::{classify, write_manifest, Classified, Config, PythonVersion, Scanner};
use std::path::PathBuf;

/// Options for the discovery path.
#[derive(Debug, Default)]
pub struct DiscoverOptions {
    /// Root directory to scan (defaults to the current directory).
    pub root: Option<PathBuf>,
    /// Manifest path override.
    pub manifest: Option<PathBuf>,
    /// Python version token override, e.g. "3.12".
    pub python_version: Option<String>,
}

/// Result of a discovery run.
#[derive(Debug)]
pub struct DiscoverResult {
    /// Where the manifest was written.
    pub manifest_path: PathBuf,
    /// The classified reference set.
    pub classified: Classified,
    /// Number of source files visited.
    pub files_scanned: usize,
    /// Number of files skipped with diagnostics.
    pub files_skipped: usize,
}

impl DiscoverResult {
    /// Print a summary of what was discovered.
    pub fn print_summary(&self) {
        println!(
            "Scanned {} files ({} skipped).",
            self.files_scanned, self.files_skipped
        );

        if self.classified.dependencies.is_empty() {
            println!("No external dependencies found.");
        } else {
            println!("Discovered dependencies:");
            for name in &self.classified.dependencies {
                println!("  {name}");
            }
        }

        if !self.classified.invalid.is_empty() {
            println!("Dropped invalid references:");
            for name in &self.classified.invalid {
                println!("  {name}");
            }
        }

        println!("Wrote {}.", self.manifest_path.display());
    }
}

/// Scan a source tree, classify the references, and write the manifest.
///
/// Individual files that fail to parse are reported on stderr and
/// skipped; only an unusable root or a missing standard-library table is
/// fatal.
pub fn run(options: &DiscoverOptions) -> Result<DiscoverResult> {
    let root = match &options.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("failed to determine current directory")?,
    };

    let config = Config::load_or_default(&root)
        .with_context(|| format!("failed to load config from {}", root.display()))?;

    let version: PythonVersion = match &options.python_version {
        Some(token) => token.parse()?,
        None => config.python_version()?,
    };

    let manifest_path = options
        .manifest
        .clone()
        .unwrap_or_else(|| config.manifest_path(&root));

    let outcome = Scanner::new(&root)
        .exclude(config.project.exclude.clone())
        .scan()
        .with_context(|| format!("failed to scan {}", root.display()))?;

    for diagnostic in &outcome.diagnostics {
        eprintln!("warning: skipped {diagnostic}");
    }

    let classified = classify(&outcome.references, version)?;
    write_manifest(&manifest_path, &classified.dependencies)
        .context("failed to write manifest")?;

    Ok(DiscoverResult {
        manifest_path,
        classified,
        files_scanned: outcome.files_scanned,
        files_skipped: outcome.diagnostics.len(),
    })
}
