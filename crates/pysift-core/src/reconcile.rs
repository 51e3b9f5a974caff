//! Reconciler - closes the gap between declared and installed packages
//!
//! Each declared dependency moves through a small state machine:
//! `pending -> already_present`, or `pending -> attempting -> installed |
//! failed`. Every package is attempted at most once per run, installs are
//! strictly sequential, and one failure never stops the rest of the batch.

use crate::manifest::Requirement;
use crate::pm::{InstalledSet, PackageManager};

/// Final state of one declared dependency after a reconciler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The environment already had it
    AlreadyPresent,
    /// Installed during this run
    Installed,
    /// Would be installed, but this was a dry run
    WouldInstall,
    /// Install was attempted and failed, with the manager's reason
    Failed(String),
}

/// Options for a reconciler run.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Report what would be installed without invoking the manager
    pub dry_run: bool,
}

/// Per-package outcomes of one reconciler run. Not persisted anywhere;
/// reported to the caller and discarded.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    /// One entry per declared dependency, in manifest order
    pub outcomes: Vec<(Requirement, InstallOutcome)>,
}

impl ReconcileReport {
    fn with(&self, wanted: &InstallOutcome) -> Vec<&Requirement> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome == wanted)
            .map(|(req, _)| req)
            .collect()
    }

    /// Dependencies that were already installed.
    #[must_use]
    pub fn already_present(&self) -> Vec<&Requirement> {
        self.with(&InstallOutcome::AlreadyPresent)
    }

    /// Dependencies installed during this run.
    #[must_use]
    pub fn installed(&self) -> Vec<&Requirement> {
        self.with(&InstallOutcome::Installed)
    }

    /// Dependencies a dry run would have installed.
    #[must_use]
    pub fn would_install(&self) -> Vec<&Requirement> {
        self.with(&InstallOutcome::WouldInstall)
    }

    /// Dependencies whose install failed, with reasons.
    #[must_use]
    pub fn failed(&self) -> Vec<(&Requirement, &str)> {
        self.outcomes
            .iter()
            .filter_map(|(req, outcome)| match outcome {
                InstallOutcome::Failed(reason) => Some((req, reason.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Returns true if no dependency was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Print a human-readable summary of the run.
    pub fn print_summary(&self) {
        if self.is_empty() {
            println!("No dependencies declared.");
            return;
        }

        let already = self.already_present();
        if !already.is_empty() {
            println!("Already installed:");
            for req in already {
                println!("  = {req}");
            }
        }

        let installed = self.installed();
        if !installed.is_empty() {
            println!("Installed:");
            for req in installed {
                println!("  + {req}");
            }
        }

        let pending = self.would_install();
        if !pending.is_empty() {
            println!("Would install:");
            for req in pending {
                println!("  ~ {req}");
            }
        }

        let failed = self.failed();
        if !failed.is_empty() {
            println!("Failed to install:");
            for (req, reason) in failed {
                println!("  ! {req}: {reason}");
            }
        }
    }
}

/// Reconcile declared dependencies against the installed environment.
///
/// Membership is checked by normalized name, ignoring any version pin.
/// Missing packages are installed one at a time; a failed install is
/// recorded and the batch moves on. There is no retry and no rollback.
pub fn reconcile(
    requirements: &[Requirement],
    installed: &InstalledSet,
    manager: &mut dyn PackageManager,
    options: &ReconcileOptions,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for requirement in requirements {
        let outcome = if installed.contains(&requirement.name) {
            InstallOutcome::AlreadyPresent
        } else if options.dry_run {
            InstallOutcome::WouldInstall
        } else {
            match manager.install(&requirement.spec()) {
                Ok(()) => InstallOutcome::Installed,
                Err(err) => InstallOutcome::Failed(err.to_string()),
            }
        };
        report.outcomes.push((requirement.clone(), outcome));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pm::PipError;

    /// Scripted package manager: installs succeed unless the spec is on
    /// the failure list. Records the install order.
    #[derive(Default)]
    struct FakeManager {
        fail: Vec<String>,
        attempted: Vec<String>,
    }

    impl FakeManager {
        fn failing(specs: &[&str]) -> Self {
            Self {
                fail: specs.iter().map(ToString::to_string).collect(),
                attempted: Vec::new(),
            }
        }
    }

    impl PackageManager for FakeManager {
        fn installed(&self) -> Result<InstalledSet, PipError> {
            Ok(InstalledSet::default())
        }

        fn install(&mut self, spec: &str) -> Result<(), PipError> {
            self.attempted.push(spec.to_string());
            if self.fail.iter().any(|f| f == spec) {
                Err(PipError::InstallFailed {
                    spec: spec.to_string(),
                    reason: "no matching distribution".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn requirements(lines: &[&str]) -> Vec<Requirement> {
        lines.iter().map(|l| Requirement::parse(l)).collect()
    }

    #[test]
    fn present_packages_are_not_reinstalled() {
        let installed = InstalledSet::from_packages([("numpy", "1.26")]);
        let mut manager = FakeManager::default();

        let report = reconcile(
            &requirements(&["numpy", "pandas==2.0"]),
            &installed,
            &mut manager,
            &ReconcileOptions::default(),
        );

        assert_eq!(manager.attempted, vec!["pandas==2.0"]);
        assert_eq!(report.already_present().len(), 1);
        assert_eq!(report.installed().len(), 1);
        assert!(report.failed().is_empty());
    }

    #[test]
    fn membership_ignores_case_and_version_pins() {
        let installed = InstalledSet::from_packages([("Flask", "3.0")]);
        let mut manager = FakeManager::default();

        let report = reconcile(
            &requirements(&["flask==2.9"]),
            &installed,
            &mut manager,
            &ReconcileOptions::default(),
        );

        assert!(manager.attempted.is_empty());
        assert_eq!(report.already_present().len(), 1);
    }

    #[test]
    fn one_failure_does_not_stop_the_batch() {
        let installed = InstalledSet::default();
        let mut manager = FakeManager::failing(&["b"]);

        let report = reconcile(
            &requirements(&["a", "b", "c"]),
            &installed,
            &mut manager,
            &ReconcileOptions::default(),
        );

        // c is still attempted after b fails
        assert_eq!(manager.attempted, vec!["a", "b", "c"]);
        assert_eq!(report.installed().len(), 2);
        let failed = report.failed();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0.name, "b");
        assert!(failed[0].1.contains("no matching distribution"));
    }

    #[test]
    fn each_package_is_attempted_at_most_once() {
        let installed = InstalledSet::default();
        let mut manager = FakeManager::failing(&["a"]);

        reconcile(
            &requirements(&["a", "a"]),
            &installed,
            &mut manager,
            &ReconcileOptions::default(),
        );

        // Duplicate declarations each get their own attempt, but no
        // single outcome is retried
        assert_eq!(manager.attempted, vec!["a", "a"]);
    }

    #[test]
    fn install_calls_carry_the_version_pin() {
        let installed = InstalledSet::default();
        let mut manager = FakeManager::default();

        reconcile(
            &requirements(&["pandas==2.0"]),
            &installed,
            &mut manager,
            &ReconcileOptions::default(),
        );

        assert_eq!(manager.attempted, vec!["pandas==2.0"]);
    }

    #[test]
    fn dry_run_never_touches_the_manager() {
        let installed = InstalledSet::from_packages([("numpy", "1.26")]);
        let mut manager = FakeManager::default();

        let report = reconcile(
            &requirements(&["numpy", "pandas"]),
            &installed,
            &mut manager,
            &ReconcileOptions { dry_run: true },
        );

        assert!(manager.attempted.is_empty());
        assert_eq!(report.would_install().len(), 1);
        assert_eq!(report.already_present().len(), 1);
    }

    #[test]
    fn outcomes_preserve_manifest_order() {
        let installed = InstalledSet::default();
        let mut manager = FakeManager::default();

        let report = reconcile(
            &requirements(&["zzz", "aaa"]),
            &installed,
            &mut manager,
            &ReconcileOptions::default(),
        );

        let names: Vec<&str> = report
            .outcomes
            .iter()
            .map(|(req, _)| req.name.as_str())
            .collect();
        assert_eq!(names, vec!["zzz", "aaa"]);
    }
}
