//! End-to-end reconciliation tests: manifest -> reconcile.

use pysift_core::{
    read_manifest, reconcile, InstallOutcome, InstalledSet, PackageManager, PipError,
    ReconcileOptions,
};
use tempfile::TempDir;

/// Package manager double that records install calls.
#[derive(Default)]
struct Recorder {
    fail: Vec<String>,
    attempted: Vec<String>,
}

impl PackageManager for Recorder {
    fn installed(&self) -> Result<InstalledSet, PipError> {
        Ok(InstalledSet::default())
    }

    fn install(&mut self, spec: &str) -> Result<(), PipError> {
        self.attempted.push(spec.to_string());
        if self.fail.iter().any(|f| f == spec) {
            Err(PipError::InstallFailed {
                spec: spec.to_string(),
                reason: "boom".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[test]
fn manifest_with_comments_and_pins_reconciles() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("requirements.txt");
    std::fs::write(&path, "numpy\n# comment\n\npandas==2.0\n").unwrap();

    let requirements = read_manifest(&path).unwrap();
    let installed = InstalledSet::from_packages([("numpy", "1.26")]);
    let mut manager = Recorder::default();

    let report = reconcile(
        &requirements,
        &installed,
        &mut manager,
        &ReconcileOptions::default(),
    );

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.outcomes[0].1, InstallOutcome::AlreadyPresent);
    assert_eq!(report.outcomes[1].1, InstallOutcome::Installed);
    // The pin travels through to the install call
    assert_eq!(manager.attempted, vec!["pandas==2.0"]);
}

#[test]
fn failures_are_reported_and_isolated() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("requirements.txt");
    std::fs::write(&path, "alpha\nbeta\ngamma\n").unwrap();

    let requirements = read_manifest(&path).unwrap();
    let mut manager = Recorder {
        fail: vec!["beta".to_string()],
        attempted: Vec::new(),
    };

    let report = reconcile(
        &requirements,
        &InstalledSet::default(),
        &mut manager,
        &ReconcileOptions::default(),
    );

    assert_eq!(manager.attempted, vec!["alpha", "beta", "gamma"]);
    assert_eq!(report.installed().len(), 2);
    let failed = report.failed();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0.name, "beta");
}
