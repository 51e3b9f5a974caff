//! End-to-end discovery tests: scan -> classify -> manifest.

use pysift_core::{classify, read_manifest, write_manifest, PythonVersion, Scanner, MANIFEST_FILE};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn discover(root: &Path) -> Vec<String> {
    let outcome = Scanner::new(root).scan().unwrap();
    let classified = classify(&outcome.references, PythonVersion::LATEST).unwrap();
    classified.dependencies.into_iter().collect()
}

#[test]
fn builtins_are_excluded_and_dotted_paths_truncate() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "app.py", "import os\nimport requests\n");
    write(tmp.path(), "util.py", "import Foo.Bar\n");

    let deps = discover(tmp.path());
    assert_eq!(deps, vec!["Foo", "requests"]);
}

#[test]
fn discovery_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "app.py",
        "import requests\nfrom flask import Flask\nimport sys\n",
    );
    write(tmp.path(), "pkg/mod.py", "from sqlalchemy.orm import Session\n");
    let manifest = tmp.path().join(MANIFEST_FILE);

    let outcome = Scanner::new(tmp.path()).scan().unwrap();
    let classified = classify(&outcome.references, PythonVersion::LATEST).unwrap();
    write_manifest(&manifest, &classified.dependencies).unwrap();
    let first = fs::read(&manifest).unwrap();

    let outcome = Scanner::new(tmp.path()).scan().unwrap();
    let classified = classify(&outcome.references, PythonVersion::LATEST).unwrap();
    write_manifest(&manifest, &classified.dependencies).unwrap();
    let second = fs::read(&manifest).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        String::from_utf8(first).unwrap(),
        "flask\nrequests\nsqlalchemy\n"
    );
}

#[test]
fn manifest_round_trips_through_the_reader() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "app.py", "import requests\nimport attrs\n");
    let manifest = tmp.path().join(MANIFEST_FILE);

    let outcome = Scanner::new(tmp.path()).scan().unwrap();
    let classified = classify(&outcome.references, PythonVersion::LATEST).unwrap();
    write_manifest(&manifest, &classified.dependencies).unwrap();

    let names: Vec<String> = read_manifest(&manifest)
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["attrs", "requests"]);
}

#[test]
fn broken_file_does_not_block_discovery() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "one.py", "import requests\n");
    write(tmp.path(), "broken.py", "def f(:\n    s = 'oops\n");
    write(tmp.path(), "two.py", "import flask\n");

    let outcome = Scanner::new(tmp.path()).scan().unwrap();
    assert_eq!(outcome.diagnostics.len(), 1);

    let classified = classify(&outcome.references, PythonVersion::LATEST).unwrap();
    let deps: Vec<String> = classified.dependencies.into_iter().collect();
    assert_eq!(deps, vec!["flask", "requests"]);
}

#[test]
fn realistic_tree() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "src/app.py",
        "\
import os, json\n\
import numpy as np\n\
from pandas import DataFrame\n\
from . import helpers\n\
\n\
def main():\n\
    import requests\n\
    print(requests.get('https://example.com'))\n",
    );
    write(
        tmp.path(),
        "src/helpers.py",
        "from collections import OrderedDict\nimport yaml\n",
    );
    write(tmp.path(), ".venv/lib/junk.py", "import vendored\n");

    let deps = discover(tmp.path());
    assert_eq!(deps, vec!["numpy", "pandas", "requests", "yaml"]);
}
