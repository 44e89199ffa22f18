use deskpack_backend::BackendOutcome;
use deskpack_core::{AppStatus, ManagedApp, StateDocument};
use deskpack_state::find_app_index;

/// Idempotent upsert into the managed set. Returns true when the entry was
/// newly registered, false when it already existed (no-op). Append-only:
/// registration never removes or reorders entries.
pub fn ensure_managed(doc: &mut StateDocument, package_id: &str) -> bool {
    if find_app_index(doc, package_id).is_some() {
        return false;
    }
    doc.managed_apps.push(ManagedApp::new(package_id));
    true
}

/// Reconciles an install attempt into the managed set. Registration and
/// status refinement are separate steps so "became managed" and "installed
/// successfully" stay independently observable.
pub fn record_install_outcome(
    doc: &mut StateDocument,
    package_id: &str,
    outcome: &BackendOutcome,
) {
    ensure_managed(doc, package_id);
    let Some(index) = find_app_index(doc, package_id) else {
        return;
    };
    doc.managed_apps[index].last_status = if outcome.succeeded() {
        AppStatus::Installed
    } else {
        AppStatus::InstallFailed
    };
}
