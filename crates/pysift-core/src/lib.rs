//! pysift Core - Dependency discovery and reconciliation for Python source trees
//!
//! This crate provides the core functionality:
//! - Lexer: Tokenization of Python source, scoped to import extraction
//! - Parser: Import statement AST construction from the token stream
//! - Scan: Directory traversal and parallel per-file extraction
//! - Stdlib: Embedded standard-library module tables per Python version
//! - Classify: Filtering references down to installable dependencies
//! - Manifest: requirements.txt reading and writing
//! - Pm: Package-manager interface and the pip backend
//! - Reconcile: Installing missing dependencies with per-package isolation

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lexer module - tokenization of Python source code
pub mod lexer;

/// Parser module - converts tokens into import statements
pub mod parser;

/// Scanner module - directory traversal and reference extraction
pub mod scan;

/// Standard-library oracle - built-in module tables per Python version
pub mod stdlib;

/// Classifier - filters references against the standard library
pub mod classify;

/// Manifest I/O - requirements.txt serialization
pub mod manifest;

/// Package-manager interface and pip backend
pub mod pm;

/// Reconciler - installs missing dependencies
pub mod reconcile;

/// Project configuration (`pysift.toml`)
pub mod config;

pub use classify::{classify, is_valid_module_name, Classified};
pub use config::{Config, ConfigError, CONFIG_FILE};
pub use manifest::{read_manifest, write_manifest, ManifestError, Requirement, MANIFEST_FILE};
pub use parser::{parse_imports, DottedName, ImportStmt, ParseError, ParseErrorKind};
pub use pm::{normalize, InstalledSet, PackageManager, Pip, PipError};
pub use reconcile::{reconcile, InstallOutcome, ReconcileOptions, ReconcileReport};
pub use scan::{ModuleReference, ScanDiagnostic, ScanError, ScanOutcome, Scanner, SOURCE_EXT};
pub use stdlib::{builtins, PythonVersion, StdlibError};
