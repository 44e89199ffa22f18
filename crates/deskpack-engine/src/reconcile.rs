use anyhow::Result;
use deskpack_backend::{is_noop_output, PackageBackend, UpgradeMode};
use deskpack_core::{AppStatus, StateDocument};
use deskpack_state::find_app_index;

/// Per-candidate result of the apply phase, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeOutcome {
    pub package_id: String,
    pub status: AppStatus,
    /// Backend error text when the upgrade failed.
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeReport {
    pub candidates: Vec<String>,
    pub outcomes: Vec<UpgradeOutcome>,
}

impl UpgradeReport {
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == AppStatus::UpgradeFailed)
            .count()
    }
}

/// Candidate discovery: dry-checks every unpinned managed entry, in
/// insertion order. Output matching a known "nothing to do" phrase rules
/// the entry out; any other non-empty output makes it a candidate
/// regardless of exit code. Exit codes are unreliable on informational
/// runs, so the authoritative decision is deferred to the apply phase.
/// A hard backend fault aborts the whole run.
pub fn discover_candidates(
    backend: &dyn PackageBackend,
    doc: &StateDocument,
) -> Result<Vec<String>> {
    let mut candidates = Vec::new();
    for app in doc.managed_apps.iter().filter(|app| !app.pinned) {
        let outcome = backend.upgrade(&app.package_id, UpgradeMode::Check)?;
        let output = outcome.combined_output();
        if output.is_empty() || is_noop_output(&output) {
            continue;
        }
        candidates.push(app.package_id.clone());
    }
    Ok(candidates)
}

/// Applies upgrades in discovery order. One package's failure never blocks
/// the rest: the entry is marked `upgrade_failed` and the loop continues.
/// A candidate missing from the managed set is skipped; no entry is
/// fabricated.
pub fn apply_upgrades(
    backend: &dyn PackageBackend,
    doc: &mut StateDocument,
    candidates: &[String],
) -> Result<UpgradeReport> {
    let mut report = UpgradeReport {
        candidates: candidates.to_vec(),
        outcomes: Vec::new(),
    };

    for package_id in candidates {
        let outcome = backend.upgrade(package_id, UpgradeMode::Apply)?;
        let Some(index) = find_app_index(doc, package_id) else {
            continue;
        };

        let (status, detail) = if outcome.succeeded() {
            (AppStatus::UpgradedOrOk, None)
        } else {
            (AppStatus::UpgradeFailed, Some(outcome.combined_output()))
        };
        doc.managed_apps[index].last_status = status;
        report.outcomes.push(UpgradeOutcome {
            package_id: package_id.clone(),
            status,
            detail,
        });
    }

    Ok(report)
}

/// Full reconciliation cycle: discovery followed by apply.
pub fn run_reconciliation(
    backend: &dyn PackageBackend,
    doc: &mut StateDocument,
) -> Result<UpgradeReport> {
    let candidates = discover_candidates(backend, doc)?;
    apply_upgrades(backend, doc, &candidates)
}
