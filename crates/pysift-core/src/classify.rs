//! Classifier - filters scanned references down to installable dependencies
//!
//! Pure with respect to its inputs: the same reference set and version
//! token always produce the same dependency set.

use crate::stdlib::{builtins, PythonVersion, StdlibError};
use std::collections::BTreeSet;

/// Check whether a name can plausibly be installed as a package.
///
/// Accepts ASCII alphanumerics plus `-`, `_`, and `.`. A trailing comma
/// is the signature of a malformed parse and is rejected explicitly.
#[must_use]
pub fn is_valid_module_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !name.ends_with(',')
}

/// The result of classifying a reference set.
#[derive(Debug, Clone, Default)]
pub struct Classified {
    /// References that need to be installed from a package index
    pub dependencies: BTreeSet<String>,
    /// References that ship with the interpreter, discarded
    pub stdlib: Vec<String>,
    /// References that failed the validity check, discarded
    pub invalid: Vec<String>,
}

/// Split a reference set into dependencies, standard-library hits, and
/// invalid names.
///
/// The standard-library comparison is case-insensitive. Discarded names
/// are recorded rather than silently dropped so callers can report them.
///
/// # Errors
///
/// Returns an error when no standard-library table exists for `version`;
/// without one the set cannot be filtered safely.
pub fn classify(
    references: &BTreeSet<String>,
    version: PythonVersion,
) -> Result<Classified, StdlibError> {
    let builtins = builtins(version)?;
    let mut classified = Classified::default();

    for name in references {
        if !is_valid_module_name(name) {
            classified.invalid.push(name.clone());
        } else if builtins.contains(name.to_ascii_lowercase().as_str()) {
            classified.stdlib.push(name.clone());
        } else {
            classified.dependencies.insert(name.clone());
        }
    }

    Ok(classified)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn valid_names() {
        assert!(is_valid_module_name("requests"));
        assert!(is_valid_module_name("zope.interface"));
        assert!(is_valid_module_name("typing_extensions"));
        assert!(is_valid_module_name("ruamel-yaml"));
    }

    #[test]
    fn invalid_names() {
        assert!(!is_valid_module_name(""));
        assert!(!is_valid_module_name("requests,"));
        assert!(!is_valid_module_name("foo bar"));
        assert!(!is_valid_module_name("foo(bar)"));
    }

    #[test]
    fn stdlib_names_are_filtered_out() {
        let classified =
            classify(&refs(&["os", "sys", "requests"]), PythonVersion::LATEST).unwrap();
        assert_eq!(classified.dependencies, refs(&["requests"]));
        assert_eq!(classified.stdlib, vec!["os", "sys"]);
        assert!(classified.invalid.is_empty());
    }

    #[test]
    fn private_stdlib_modules_are_not_dependencies() {
        let classified =
            classify(&refs(&["_thread", "flask"]), PythonVersion::LATEST).unwrap();
        assert_eq!(classified.dependencies, refs(&["flask"]));
        assert_eq!(classified.stdlib, vec!["_thread"]);
    }

    #[test]
    fn stdlib_comparison_is_case_insensitive() {
        let classified = classify(&refs(&["OS", "Tkinter"]), PythonVersion::LATEST).unwrap();
        assert!(classified.dependencies.is_empty());
        assert_eq!(classified.stdlib.len(), 2);
    }

    #[test]
    fn dependency_case_is_preserved() {
        let classified = classify(&refs(&["Foo"]), PythonVersion::LATEST).unwrap();
        assert!(classified.dependencies.contains("Foo"));
    }

    #[test]
    fn malformed_names_are_recorded_not_raised() {
        let classified =
            classify(&refs(&["requests,", "flask"]), PythonVersion::LATEST).unwrap();
        assert_eq!(classified.dependencies, refs(&["flask"]));
        assert_eq!(classified.invalid, vec!["requests,"]);
    }

    #[test]
    fn classification_is_deterministic() {
        let references = refs(&["requests", "os", "Foo", "bad name"]);
        let first = classify(&references, PythonVersion::new(3, 11)).unwrap();
        let second = classify(&references, PythonVersion::new(3, 11)).unwrap();
        assert_eq!(first.dependencies, second.dependencies);
        assert_eq!(first.stdlib, second.stdlib);
        assert_eq!(first.invalid, second.invalid);
    }

    #[test]
    fn version_is_an_explicit_parameter() {
        // distutils is stdlib in 3.11 but a dependency in 3.12
        let references = refs(&["distutils"]);
        let old = classify(&references, PythonVersion::new(3, 11)).unwrap();
        assert!(old.dependencies.is_empty());
        let new = classify(&references, PythonVersion::new(3, 12)).unwrap();
        assert!(new.dependencies.contains("distutils"));
    }

    #[test]
    fn unsupported_version_is_fatal() {
        assert!(classify(&refs(&["requests"]), PythonVersion::new(2, 7)).is_err());
    }
}
