use std::collections::HashSet;
use std::fs;
use std::io;

use anyhow::{Context, Result};
use deskpack_core::StateDocument;

use crate::layout::StateLayout;
use crate::current_unix_timestamp;

const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reads the persisted state. A missing file yields a freshly initialized
/// document with an empty managed set, persisted immediately so subsequent
/// reads are stable. A file that exists but does not parse is an error:
/// the user's managed-app history is never silently discarded.
pub fn load_state(layout: &StateLayout) -> Result<StateDocument> {
    let path = layout.state_path();
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut doc = StateDocument::new(TOOL_VERSION, current_unix_timestamp());
            save_state(layout, &mut doc)
                .with_context(|| format!("failed to initialize state: {}", path.display()))?;
            return Ok(doc);
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read state: {}", path.display()));
        }
    };

    let mut doc: StateDocument = serde_json::from_str(&raw).with_context(|| {
        format!(
            "state file exists but could not be parsed: {}",
            path.display()
        )
    })?;
    normalize(&mut doc);
    Ok(doc)
}

/// Enforces the managed-set invariants: `managed_apps` is a well-formed
/// sequence (the deserializer already guarantees that) holding at most one
/// entry per package id, first registration wins. Runs after every load
/// and before every save.
pub fn normalize(doc: &mut StateDocument) {
    let mut seen = HashSet::new();
    doc.managed_apps
        .retain(|app| seen.insert(app.package_id.clone()));
}

/// Persists the document: refreshes `last_run_at_unix` and the version
/// stamp, normalizes, then writes to a sibling tmp file and renames it
/// over the real path so a crash mid-write never leaves an unparsable
/// state file behind.
pub fn save_state(layout: &StateLayout, doc: &mut StateDocument) -> Result<()> {
    doc.last_run_at_unix = current_unix_timestamp();
    doc.version = TOOL_VERSION.to_string();
    normalize(doc);

    layout.ensure_root()?;
    let content = serde_json::to_string_pretty(doc).context("failed to serialize state")?;
    let tmp_path = layout.tmp_state_path();
    let path = layout.state_path();
    fs::write(&tmp_path, content)
        .with_context(|| format!("failed to write state: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, &path)
        .with_context(|| format!("failed to replace state: {}", path.display()))
}

/// Position of the entry with this package id, if registered.
pub fn find_app_index(doc: &StateDocument, package_id: &str) -> Option<usize> {
    doc.managed_apps
        .iter()
        .position(|app| app.package_id == package_id)
}
