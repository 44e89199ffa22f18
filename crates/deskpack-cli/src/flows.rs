use anyhow::{anyhow, Result};
use deskpack_backend::PackageBackend;
use deskpack_core::{AppStatus, Catalog, CatalogEntry, StateDocument};
use deskpack_engine::{apply_upgrades, discover_candidates, record_install_outcome, UpgradeReport};
use deskpack_state::{find_app_index, save_state};

use crate::render::{backend_spinner, finish_spinner, render_status_line, OutputStyle};
use crate::selection::parse_selection;
use crate::session::Session;

fn display_name<'a>(catalog: &'a Catalog, package_id: &'a str) -> &'a str {
    catalog.display_name(package_id).unwrap_or(package_id)
}

/// Maps a selection string to catalog entries. Fails before any install
/// runs, so a bad selection never mutates state.
pub(crate) fn resolve_selection<'a>(
    catalog: &'a Catalog,
    selection: &str,
) -> Result<Vec<&'a CatalogEntry>> {
    let ids = parse_selection(selection)?;
    let mut entries = Vec::new();
    for id in ids {
        let entry = catalog
            .entry_by_local_id(id)
            .ok_or_else(|| anyhow!("no catalog entry with id {id}"))?;
        entries.push(entry);
    }
    Ok(entries)
}

/// One install attempt. A backend-reported failure is per-package
/// recoverable: the entry is registered and marked failed, and the caller
/// moves on. Only a hard fault (backend not invocable) is an error.
pub(crate) fn install_one(
    session: &Session,
    backend: &dyn PackageBackend,
    doc: &mut StateDocument,
    package_id: &str,
) -> Result<bool> {
    let name = display_name(&session.catalog, package_id);
    let spinner = backend_spinner(session.style, &format!("installing {name}"));
    let outcome = backend.install(package_id);
    finish_spinner(spinner);
    let outcome = outcome?;

    record_install_outcome(doc, package_id, &outcome);
    if outcome.succeeded() {
        println!(
            "{}",
            render_status_line(session.style, "ok", &format!("installed {name}"))
        );
    } else {
        println!(
            "{}",
            render_status_line(
                session.style,
                "err",
                &format!(
                    "install failed for {name} (exit {}): {}",
                    outcome.exit_code,
                    outcome.combined_output()
                )
            )
        );
    }
    Ok(outcome.succeeded())
}

pub(crate) fn run_install_batch(
    session: &Session,
    backend: &dyn PackageBackend,
    doc: &mut StateDocument,
    package_ids: &[String],
) -> Result<()> {
    let mut failed = 0_usize;
    for package_id in package_ids {
        if !install_one(session, backend, doc, package_id)? {
            failed += 1;
        }
    }
    save_state(&session.layout, doc)?;

    if failed > 0 {
        println!(
            "{}",
            render_status_line(
                session.style,
                "warn",
                &format!("{failed} of {} install(s) failed", package_ids.len())
            )
        );
    }
    Ok(())
}

pub(crate) fn run_install_selection(
    session: &Session,
    backend: &dyn PackageBackend,
    doc: &mut StateDocument,
    selection: &str,
) -> Result<()> {
    let package_ids = resolve_selection(&session.catalog, selection)?
        .into_iter()
        .map(|entry| entry.package_id.clone())
        .collect::<Vec<_>>();
    run_install_batch(session, backend, doc, &package_ids)
}

pub(crate) fn run_bundle_install(
    session: &Session,
    backend: &dyn PackageBackend,
    doc: &mut StateDocument,
    bundle_name: &str,
) -> Result<()> {
    let bundle = session
        .catalog
        .bundle(bundle_name)
        .ok_or_else(|| anyhow!("no bundle named '{bundle_name}'"))?;
    let package_ids = bundle.package_ids.clone();
    run_install_batch(session, backend, doc, &package_ids)
}

/// Discovery phase: dry-checks the managed set and reports what it found.
/// Does not persist; the caller decides when the action is complete.
pub(crate) fn check_updates(
    session: &Session,
    backend: &dyn PackageBackend,
    doc: &StateDocument,
) -> Result<Vec<String>> {
    let spinner = backend_spinner(session.style, "checking managed apps for updates");
    let candidates = discover_candidates(backend, doc);
    finish_spinner(spinner);
    let candidates = candidates?;

    if candidates.is_empty() {
        println!(
            "{}",
            render_status_line(session.style, "ok", "all managed apps are up to date")
        );
    } else {
        for line in format_candidate_lines(&candidates, &session.catalog, session.style) {
            println!("{line}");
        }
    }
    Ok(candidates)
}

/// Apply phase: upgrades every candidate, reports per-package outcomes,
/// and persists the reconciled state.
pub(crate) fn apply_updates(
    session: &Session,
    backend: &dyn PackageBackend,
    doc: &mut StateDocument,
    candidates: &[String],
) -> Result<()> {
    let spinner = backend_spinner(session.style, "applying updates");
    let report = apply_upgrades(backend, doc, candidates);
    finish_spinner(spinner);
    let report = report?;

    for line in format_update_report_lines(&report, &session.catalog, session.style) {
        println!("{line}");
    }
    save_state(&session.layout, doc)
}

pub(crate) fn run_update_flow(
    session: &Session,
    backend: &dyn PackageBackend,
    doc: &mut StateDocument,
    check_only: bool,
) -> Result<()> {
    let candidates = check_updates(session, backend, doc)?;
    if candidates.is_empty() || check_only {
        return save_state(&session.layout, doc);
    }
    apply_updates(session, backend, doc, &candidates)
}

pub(crate) fn set_pinned(doc: &mut StateDocument, package_id: &str, pinned: bool) -> Result<()> {
    let Some(index) = find_app_index(doc, package_id) else {
        return Err(anyhow!("not a managed app: {package_id}"));
    };
    doc.managed_apps[index].pinned = pinned;
    Ok(())
}

pub(crate) fn run_pin_flow(
    session: &Session,
    doc: &mut StateDocument,
    package_id: &str,
    pinned: bool,
) -> Result<()> {
    set_pinned(doc, package_id, pinned)?;
    save_state(&session.layout, doc)?;
    let verb = if pinned { "pinned" } else { "unpinned" };
    println!(
        "{}",
        render_status_line(
            session.style,
            "ok",
            &format!("{verb} {}", display_name(&session.catalog, package_id))
        )
    );
    Ok(())
}

pub(crate) fn format_candidate_lines(
    candidates: &[String],
    catalog: &Catalog,
    style: OutputStyle,
) -> Vec<String> {
    let mut lines = vec![render_status_line(
        style,
        "step",
        &format!("{} update(s) available", candidates.len()),
    )];
    for package_id in candidates {
        lines.push(format!("- {} ({package_id})", display_name(catalog, package_id)));
    }
    lines
}

pub(crate) fn format_update_report_lines(
    report: &UpgradeReport,
    catalog: &Catalog,
    style: OutputStyle,
) -> Vec<String> {
    let mut lines = Vec::new();
    for outcome in &report.outcomes {
        let name = display_name(catalog, &outcome.package_id);
        let line = match outcome.status {
            AppStatus::UpgradeFailed => render_status_line(
                style,
                "err",
                &format!(
                    "upgrade failed for {name}: {}",
                    outcome.detail.as_deref().unwrap_or("no backend output")
                ),
            ),
            _ => render_status_line(style, "ok", &format!("upgraded {name}")),
        };
        lines.push(line);
    }

    let failed = report.failed_count();
    if failed > 0 {
        lines.push(render_status_line(
            style,
            "warn",
            &format!("{failed} of {} upgrade(s) failed", report.outcomes.len()),
        ));
    }
    lines
}

pub(crate) fn format_managed_lines(doc: &StateDocument, catalog: &Catalog) -> Vec<String> {
    if doc.managed_apps.is_empty() {
        return vec!["no managed apps yet".to_string()];
    }

    doc.managed_apps
        .iter()
        .map(|app| {
            let pin = if app.pinned { " [pinned]" } else { "" };
            format!(
                "{} ({}): {}{}",
                display_name(catalog, &app.package_id),
                app.package_id,
                app.last_status.as_str(),
                pin
            )
        })
        .collect()
}

pub(crate) fn format_catalog_lines(catalog: &Catalog) -> Vec<String> {
    let mut lines = Vec::new();
    for category in catalog.categories() {
        lines.push(format!("{category}:"));
        for entry in catalog
            .entries
            .iter()
            .filter(|entry| entry.category == category)
        {
            lines.push(format!("  {:>3}) {}", entry.local_id, entry.display_name));
        }
    }
    lines
}
