//! Implementation of the `pysift install` command (the reconciliation path).

use anyhow::{Context, Result};
use pysift_core::{
    read_manifest, reconcile, PackageManager, Pip, ReconcileOptions, ReconcileReport,
    MANIFEST_FILE,
};
use std::path::PathBuf;

/// Options for the reconciliation path.
#[derive(Debug, Default)]
pub struct InstallOptions {
    /// Manifest path (defaults to requirements.txt in the current directory).
    pub manifest: Option<PathBuf>,
    /// Python interpreter to run pip through.
    pub python: Option<PathBuf>,
    /// Report what would be installed without installing anything.
    pub dry_run: bool,
}

/// Read the manifest and reconcile it against the installed environment.
///
/// Returns an error only when reconciliation cannot start at all: the
/// manifest is unreadable or the installed set cannot be queried.
/// Individual install failures are recorded in the report.
pub fn run(options: &InstallOptions) -> Result<ReconcileReport> {
    let manifest_path = options
        .manifest
        .clone()
        .unwrap_or_else(|| PathBuf::from(MANIFEST_FILE));

    let requirements = read_manifest(&manifest_path).with_context(|| {
        format!(
            "cannot reconcile without a readable manifest at {}",
            manifest_path.display()
        )
    })?;

    let mut pip = match &options.python {
        Some(python) => Pip::new(python),
        None => Pip::default(),
    };

    let installed = pip
        .installed()
        .context("failed to query installed packages")?;

    Ok(reconcile(
        &requirements,
        &installed,
        &mut pip,
        &ReconcileOptions {
            dry_run: options.dry_run,
        },
    ))
}
