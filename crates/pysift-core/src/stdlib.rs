//! Standard-library oracle - built-in module tables per Python version
//!
//! The classifier needs to know which top-level modules ship with the
//! interpreter so they never end up in the dependency manifest. The
//! tables are embedded and keyed by version token, so the answer is
//! available offline and identical on every run.
//!
//! Names are stored lowercase; membership tests are case-insensitive.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;
use thiserror::Error;

/// Errors from the standard-library oracle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StdlibError {
    #[error("invalid Python version token '{0}', expected MAJOR.MINOR like \"3.12\"")]
    InvalidVersion(String),

    #[error("no standard-library data for Python {0}, supported versions are {oldest}..={latest}",
        oldest = PythonVersion::OLDEST, latest = PythonVersion::LATEST)]
    UnsupportedVersion(PythonVersion),
}

/// A Python feature version, e.g. `3.12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PythonVersion {
    pub major: u8,
    pub minor: u8,
}

impl PythonVersion {
    /// Oldest version with an embedded table.
    pub const OLDEST: Self = Self { major: 3, minor: 9 };

    /// Newest version with an embedded table; the default when no version
    /// is given.
    pub const LATEST: Self = Self {
        major: 3,
        minor: 13,
    };

    /// Create a version from major and minor numbers.
    #[must_use]
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl Default for PythonVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

impl std::fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl std::str::FromStr for PythonVersion {
    type Err = StdlibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StdlibError::InvalidVersion(s.to_string());
        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

/// The set of built-in top-level module names for a Python version.
///
/// # Errors
///
/// Returns [`StdlibError::UnsupportedVersion`] when no table is embedded
/// for the requested version. Discovery cannot proceed without an answer.
pub fn builtins(version: PythonVersion) -> Result<&'static BTreeSet<&'static str>, StdlibError> {
    tables()
        .get(&version)
        .ok_or(StdlibError::UnsupportedVersion(version))
}

fn tables() -> &'static BTreeMap<PythonVersion, BTreeSet<&'static str>> {
    static TABLES: OnceLock<BTreeMap<PythonVersion, BTreeSet<&'static str>>> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut tables = BTreeMap::new();
        let mut current: BTreeSet<&'static str> = BASE_3_9.iter().copied().collect();
        tables.insert(PythonVersion::new(3, 9), current.clone());

        for &(minor, added, removed) in CHANGES {
            for name in added {
                current.insert(name);
            }
            for name in removed {
                current.remove(name);
            }
            tables.insert(PythonVersion::new(3, minor), current.clone());
        }

        tables
    })
}

/// Module changes per minor version, applied cumulatively on top of 3.9.
const CHANGES: &[(u8, &[&str], &[&str])] = &[
    (10, &[], &["formatter", "parser", "symbol"]),
    (11, &["tomllib"], &["binhex"]),
    (12, &[], &["asynchat", "asyncore", "distutils", "imp", "smtpd"]),
    (
        13,
        &[],
        // PEP 594 dead-battery removals, plus lib2to3
        &[
            "aifc",
            "audioop",
            "cgi",
            "cgitb",
            "chunk",
            "crypt",
            "imghdr",
            "lib2to3",
            "mailcap",
            "msilib",
            "nis",
            "nntplib",
            "ossaudiodev",
            "pipes",
            "sndhdr",
            "spwd",
            "sunau",
            "telnetlib",
            "uu",
            "xdrlib",
        ],
    ),
];

/// Top-level standard-library modules of Python 3.9, lowercase.
const BASE_3_9: &[&str] = &[
    "__future__",
    "_abc",
    "_aix_support",
    "_ast",
    "_asyncio",
    "_bisect",
    "_bz2",
    "_codecs",
    "_collections",
    "_collections_abc",
    "_compat_pickle",
    "_compression",
    "_csv",
    "_ctypes",
    "_curses",
    "_datetime",
    "_decimal",
    "_elementtree",
    "_functools",
    "_hashlib",
    "_heapq",
    "_imp",
    "_io",
    "_json",
    "_locale",
    "_lsprof",
    "_lzma",
    "_markupbase",
    "_md5",
    "_multiprocessing",
    "_opcode",
    "_operator",
    "_osx_support",
    "_pickle",
    "_posixsubprocess",
    "_py_abc",
    "_pydecimal",
    "_pyio",
    "_queue",
    "_random",
    "_sha1",
    "_sha256",
    "_sha3",
    "_sha512",
    "_signal",
    "_sitebuiltins",
    "_socket",
    "_sqlite3",
    "_sre",
    "_ssl",
    "_stat",
    "_statistics",
    "_string",
    "_strptime",
    "_struct",
    "_thread",
    "_threading_local",
    "_tkinter",
    "_tracemalloc",
    "_uuid",
    "_warnings",
    "_weakref",
    "_weakrefset",
    "abc",
    "aifc",
    "antigravity",
    "argparse",
    "array",
    "ast",
    "asynchat",
    "asyncio",
    "asyncore",
    "atexit",
    "audioop",
    "base64",
    "bdb",
    "binascii",
    "binhex",
    "bisect",
    "builtins",
    "bz2",
    "calendar",
    "cgi",
    "cgitb",
    "chunk",
    "cmath",
    "cmd",
    "code",
    "codecs",
    "codeop",
    "collections",
    "colorsys",
    "compileall",
    "concurrent",
    "configparser",
    "contextlib",
    "contextvars",
    "copy",
    "copyreg",
    "cprofile",
    "crypt",
    "csv",
    "ctypes",
    "curses",
    "dataclasses",
    "datetime",
    "dbm",
    "decimal",
    "difflib",
    "dis",
    "distutils",
    "doctest",
    "email",
    "encodings",
    "ensurepip",
    "enum",
    "errno",
    "faulthandler",
    "fcntl",
    "filecmp",
    "fileinput",
    "fnmatch",
    "formatter",
    "fractions",
    "ftplib",
    "functools",
    "gc",
    "genericpath",
    "getopt",
    "getpass",
    "gettext",
    "glob",
    "graphlib",
    "grp",
    "gzip",
    "hashlib",
    "heapq",
    "hmac",
    "html",
    "http",
    "idlelib",
    "imaplib",
    "imghdr",
    "imp",
    "importlib",
    "inspect",
    "io",
    "ipaddress",
    "itertools",
    "json",
    "keyword",
    "lib2to3",
    "linecache",
    "locale",
    "logging",
    "lzma",
    "mailbox",
    "mailcap",
    "marshal",
    "math",
    "mimetypes",
    "mmap",
    "modulefinder",
    "msilib",
    "msvcrt",
    "multiprocessing",
    "netrc",
    "nis",
    "nntplib",
    "ntpath",
    "nturl2path",
    "numbers",
    "opcode",
    "operator",
    "optparse",
    "os",
    "ossaudiodev",
    "parser",
    "pathlib",
    "pdb",
    "pickle",
    "pickletools",
    "pipes",
    "pkgutil",
    "platform",
    "plistlib",
    "poplib",
    "posix",
    "posixpath",
    "pprint",
    "profile",
    "pstats",
    "pty",
    "pwd",
    "py_compile",
    "pyclbr",
    "pydoc",
    "pydoc_data",
    "queue",
    "quopri",
    "random",
    "re",
    "readline",
    "reprlib",
    "resource",
    "rlcompleter",
    "runpy",
    "sched",
    "secrets",
    "select",
    "selectors",
    "shelve",
    "shlex",
    "shutil",
    "signal",
    "site",
    "smtpd",
    "smtplib",
    "sndhdr",
    "socket",
    "socketserver",
    "spwd",
    "sqlite3",
    "sre_compile",
    "sre_constants",
    "sre_parse",
    "ssl",
    "stat",
    "statistics",
    "string",
    "stringprep",
    "struct",
    "subprocess",
    "sunau",
    "symbol",
    "symtable",
    "sys",
    "sysconfig",
    "syslog",
    "tabnanny",
    "tarfile",
    "telnetlib",
    "tempfile",
    "termios",
    "test",
    "textwrap",
    "this",
    "threading",
    "time",
    "timeit",
    "tkinter",
    "token",
    "tokenize",
    "trace",
    "traceback",
    "tracemalloc",
    "tty",
    "turtle",
    "turtledemo",
    "types",
    "typing",
    "unicodedata",
    "unittest",
    "urllib",
    "uu",
    "uuid",
    "venv",
    "warnings",
    "wave",
    "weakref",
    "webbrowser",
    "winreg",
    "winsound",
    "wsgiref",
    "xdrlib",
    "xml",
    "xmlrpc",
    "zipapp",
    "zipfile",
    "zipimport",
    "zlib",
    "zoneinfo",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_token_round_trip() {
        let version: PythonVersion = "3.12".parse().unwrap();
        assert_eq!(version, PythonVersion::new(3, 12));
        assert_eq!(version.to_string(), "3.12");
    }

    #[test]
    fn bad_version_tokens() {
        assert!("312".parse::<PythonVersion>().is_err());
        assert!("3.x".parse::<PythonVersion>().is_err());
        assert!(String::new().parse::<PythonVersion>().is_err());
    }

    #[test]
    fn unsupported_version_is_an_error() {
        let err = builtins(PythonVersion::new(2, 7)).unwrap_err();
        assert!(matches!(err, StdlibError::UnsupportedVersion(_)));
        assert!(builtins(PythonVersion::new(3, 99)).is_err());
    }

    #[test]
    fn core_modules_are_present_in_every_version() {
        for minor in 9..=13 {
            let set = builtins(PythonVersion::new(3, minor)).unwrap();
            for name in ["os", "sys", "json", "collections", "__future__"] {
                assert!(set.contains(name), "missing {name} in 3.{minor}");
            }
            assert!(!set.contains("requests"));
            assert!(!set.contains("numpy"));
        }
    }

    #[test]
    fn private_implementation_modules_are_builtin() {
        // CPython exposes these as plain importable modules, so an
        // `import _thread` must never look like a third-party package.
        for minor in 9..=13 {
            let set = builtins(PythonVersion::new(3, minor)).unwrap();
            for name in ["_thread", "_socket", "_collections_abc", "sre_compile", "opcode"] {
                assert!(set.contains(name), "missing {name} in 3.{minor}");
            }
        }
    }

    #[test]
    fn version_changes_apply_cumulatively() {
        // tomllib appeared in 3.11
        assert!(!builtins(PythonVersion::new(3, 10)).unwrap().contains("tomllib"));
        assert!(builtins(PythonVersion::new(3, 11)).unwrap().contains("tomllib"));
        assert!(builtins(PythonVersion::new(3, 13)).unwrap().contains("tomllib"));

        // distutils was removed in 3.12
        assert!(builtins(PythonVersion::new(3, 11)).unwrap().contains("distutils"));
        assert!(!builtins(PythonVersion::new(3, 12)).unwrap().contains("distutils"));

        // telnetlib fell out with the 3.13 dead batteries
        assert!(builtins(PythonVersion::new(3, 12)).unwrap().contains("telnetlib"));
        assert!(!builtins(PythonVersion::new(3, 13)).unwrap().contains("telnetlib"));
    }

    #[test]
    fn tables_are_lowercase() {
        let set = builtins(PythonVersion::LATEST).unwrap();
        assert!(set.iter().all(|name| *name == name.to_ascii_lowercase()));
    }
}
