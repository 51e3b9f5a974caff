//! pysift CLI - discover Python dependencies and reconcile the environment

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod discover;
mod install;

use discover::DiscoverOptions;
use install::InstallOptions;

#[derive(Parser)]
#[command(name = "pysift")]
#[command(version = pysift_core::VERSION)]
#[command(about = "Discover Python dependencies and reconcile the environment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a source tree and write the dependency manifest
    Scan {
        /// Root directory to scan (defaults to the current directory)
        root: Option<PathBuf>,

        /// Write the manifest to this path instead of requirements.txt
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Python version for the standard-library tables, e.g. "3.12"
        #[arg(long, value_name = "X.Y")]
        python_version: Option<String>,
    },

    /// Install the manifest's missing dependencies
    Install {
        /// Manifest to reconcile (defaults to requirements.txt)
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Python interpreter to run pip through (defaults to python3)
        #[arg(long)]
        python: Option<PathBuf>,

        /// Report what would be installed without installing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Scan, write the manifest, then install what is missing
    Sync {
        /// Root directory to scan (defaults to the current directory)
        root: Option<PathBuf>,

        /// Manifest path shared by both steps
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Python version for the standard-library tables, e.g. "3.12"
        #[arg(long, value_name = "X.Y")]
        python_version: Option<String>,

        /// Python interpreter to run pip through (defaults to python3)
        #[arg(long)]
        python: Option<PathBuf>,

        /// Report what would be installed without installing anything
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Scan {
            root,
            manifest,
            python_version,
        }) => {
            let result = discover::run(&DiscoverOptions {
                root,
                manifest,
                python_version,
            })?;
            result.print_summary();
        }
        Some(Commands::Install {
            manifest,
            python,
            dry_run,
        }) => {
            let report = install::run(&InstallOptions {
                manifest,
                python,
                dry_run,
            })?;
            report.print_summary();
        }
        Some(Commands::Sync {
            root,
            manifest,
            python_version,
            python,
            dry_run,
        }) => sync(root, manifest, python_version, python, dry_run)?,
        // Bare `pysift` behaves like `pysift sync`
        None => sync(None, None, None, None, false)?,
    }

    Ok(())
}

/// Discovery then reconciliation, sharing only the manifest file.
fn sync(
    root: Option<PathBuf>,
    manifest: Option<PathBuf>,
    python_version: Option<String>,
    python: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let result = discover::run(&DiscoverOptions {
        root,
        manifest,
        python_version,
    })?;
    result.print_summary();

    let report = install::run(&InstallOptions {
        manifest: Some(result.manifest_path),
        python,
        dry_run,
    })?;
    report.print_summary();

    Ok(())
}
