//! Scanner - directory traversal and module reference extraction
//!
//! Walks a root directory for Python source files, extracts the imported
//! modules from each file, and unions them into a single deduplicated
//! reference set. Files that fail to parse are skipped with a diagnostic;
//! the scan itself only fails when the root directory is unusable.
//!
//! Traversal visits directory entries in sorted order per level, so
//! repeated scans of an unchanged tree produce identical outcomes.
//! Extraction is parallel per file; each worker returns its own result
//! and a single reduce step merges them.

use crate::lexer::LineIndex;
use crate::parser::{parse_imports, ImportStmt};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Source file extension for the scanned language.
pub const SOURCE_EXT: &str = "py";

/// Directory names never worth scanning: caches, VCS metadata, and
/// vendored environments that would pollute discovery with their own
/// dependencies.
const SKIP_DIRS: &[&str] = &[
    "__pycache__",
    "node_modules",
    "site-packages",
    "venv",
];

/// Errors that make a scan impossible to start.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("root directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("root path is not a directory: {0}")]
    RootNotADirectory(PathBuf),

    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One import found in one source file. Lives only for the duration of a
/// scan pass; the outcome keeps module names, not occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReference {
    /// Top-level module name (dotted paths truncated to the first segment)
    pub name: String,
    /// The file the import was found in
    pub file: PathBuf,
    /// 1-indexed line of the import statement
    pub line: u32,
}

/// A per-file problem the scan recovered from.
#[derive(Debug, Clone)]
pub struct ScanDiagnostic {
    /// The file that could not be processed
    pub file: PathBuf,
    /// 1-indexed line, when the failure has a location
    pub line: Option<u32>,
    /// Human-readable description
    pub message: String,
}

impl std::fmt::Display for ScanDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}: {}", self.file.display(), self.message),
            None => write!(f, "{}: {}", self.file.display(), self.message),
        }
    }
}

/// The merged result of a scan pass.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Unique top-level module names referenced anywhere in the tree
    pub references: BTreeSet<String>,
    /// Files that were skipped, with the reason
    pub diagnostics: Vec<ScanDiagnostic>,
    /// Number of source files visited (including skipped ones)
    pub files_scanned: usize,
}

/// Recursive scanner for a source tree.
#[derive(Debug, Clone)]
pub struct Scanner {
    root: PathBuf,
    excludes: Vec<String>,
}

impl Scanner {
    /// Create a scanner for the given root directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excludes: Vec::new(),
        }
    }

    /// Add directory names to skip, on top of the built-in skip list.
    #[must_use]
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(names.into_iter().map(Into::into));
        self
    }

    /// Scan the tree and merge every file's references into one set.
    ///
    /// # Errors
    ///
    /// Returns an error only when the root directory cannot be traversed
    /// at all; per-file failures land in [`ScanOutcome::diagnostics`].
    pub fn scan(&self) -> Result<ScanOutcome, ScanError> {
        if !self.root.exists() {
            return Err(ScanError::RootNotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ScanError::RootNotADirectory(self.root.clone()));
        }

        let mut files = Vec::new();
        self.collect_files(&self.root, &mut files)?;

        // Parallel map per file, then a single sequential reduce. Workers
        // share nothing; the file list is already in deterministic order.
        let results: Vec<FileResult> = files
            .par_iter()
            .map(|path| extract_file(path))
            .collect();

        let mut outcome = ScanOutcome {
            files_scanned: files.len(),
            ..ScanOutcome::default()
        };
        for result in results {
            match result {
                FileResult::Parsed(references) => {
                    outcome
                        .references
                        .extend(references.into_iter().map(|r| r.name));
                }
                FileResult::Skipped(diagnostic) => outcome.diagnostics.push(diagnostic),
            }
        }

        Ok(outcome)
    }

    /// Collect source files depth-first, entries sorted per level.
    fn collect_files(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ScanError> {
        let entries = std::fs::read_dir(dir).map_err(|source| ScanError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        paths.sort();

        for path in paths {
            if path.is_dir() {
                if self.skip_dir(&path) {
                    continue;
                }
                self.collect_files(&path, files)?;
            } else if path.extension().is_some_and(|ext| ext == SOURCE_EXT) {
                files.push(path);
            }
        }

        Ok(())
    }

    fn skip_dir(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return true;
        };
        name.starts_with('.')
            || SKIP_DIRS.contains(&name)
            || self.excludes.iter().any(|e| e == name)
    }
}

enum FileResult {
    Parsed(Vec<ModuleReference>),
    Skipped(ScanDiagnostic),
}

/// Extract every module reference from one source file.
fn extract_file(path: &Path) -> FileResult {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            return FileResult::Skipped(ScanDiagnostic {
                file: path.to_path_buf(),
                line: None,
                message: format!("failed to read file: {err}"),
            });
        }
    };
    let source = String::from_utf8_lossy(&bytes);
    let index = LineIndex::new(&source);

    match parse_imports(&source) {
        Ok(stmts) => FileResult::Parsed(references(&stmts, path, &index)),
        Err(err) => FileResult::Skipped(ScanDiagnostic {
            file: path.to_path_buf(),
            line: Some(index.line(err.span.start)),
            message: err.kind.to_string(),
        }),
    }
}

fn references(stmts: &[ImportStmt], path: &Path, index: &LineIndex) -> Vec<ModuleReference> {
    stmts
        .iter()
        .flat_map(ImportStmt::referenced)
        .map(|name| ModuleReference {
            name: name.top_level().to_string(),
            file: path.to_path_buf(),
            line: index.line(name.span.start),
        })
        .collect()
}
