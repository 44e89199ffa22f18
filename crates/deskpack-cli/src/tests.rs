use clap::CommandFactory;
use deskpack_core::{AppStatus, Catalog, ManagedApp, StateDocument};
use deskpack_engine::{UpgradeOutcome, UpgradeReport};

use super::flows::{
    format_candidate_lines, format_catalog_lines, format_managed_lines,
    format_update_report_lines, resolve_selection, set_pinned,
};
use super::menu::{parse_confirmation, Confirmation};
use super::render::{render_status_line, OutputStyle};
use super::selection::parse_selection;
use super::Cli;

fn test_catalog() -> Catalog {
    Catalog::from_toml_str(
        r#"
[[entries]]
local_id = 1
package_id = "7zip.7zip"
display_name = "7-Zip"
category = "Utilities"

[[entries]]
local_id = 2
package_id = "VideoLAN.VLC"
display_name = "VLC media player"
category = "Media"

[[entries]]
local_id = 3
package_id = "Mozilla.Firefox"
display_name = "Mozilla Firefox"
category = "Browsers"
"#,
    )
    .expect("test catalog should parse")
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn embedded_catalog_is_valid() {
    let catalog = Catalog::from_toml_str(include_str!("../catalog.toml"))
        .expect("built-in catalog must validate");
    assert!(!catalog.entries.is_empty());
    assert!(catalog.bundle("essentials").is_some());
    assert!(catalog.bundle("dev").is_some());
}

#[test]
fn parse_selection_handles_ids_and_ranges() {
    assert_eq!(
        parse_selection("1,3,7-10").expect("selection should parse"),
        vec![1, 3, 7, 8, 9, 10]
    );
    assert_eq!(
        parse_selection(" 2 , 4 - 5 ").expect("spaced selection should parse"),
        vec![2, 4, 5]
    );
}

#[test]
fn parse_selection_deduplicates_preserving_first_occurrence() {
    assert_eq!(
        parse_selection("3,1-4,1").expect("selection should parse"),
        vec![3, 1, 2, 4]
    );
}

#[test]
fn parse_selection_rejects_malformed_input() {
    assert!(parse_selection("").is_err());
    assert!(parse_selection("1,,2").is_err());
    assert!(parse_selection("a").is_err());
    assert!(parse_selection("5-3").is_err());
    assert!(parse_selection("0").is_err());
    assert!(parse_selection("0-2").is_err());
    assert!(parse_selection("1-").is_err());
}

#[test]
fn parse_selection_rejects_oversized_ranges_without_expanding() {
    // A fat-fingered range must come back as a recoverable error, not an
    // eager walk over billions of ids.
    assert!(parse_selection("1-4294967295").is_err());
    assert!(parse_selection("1-300").is_err());
    assert!(parse_selection("5,1-4294967295,2").is_err());
    assert_eq!(
        parse_selection("1-256").expect("span at the limit should parse").len(),
        256
    );
}

#[test]
fn resolve_selection_rejects_unknown_ids_before_any_work() {
    let catalog = test_catalog();

    let entries = resolve_selection(&catalog, "3,1").expect("known ids should resolve");
    assert_eq!(
        entries
            .iter()
            .map(|entry| entry.package_id.as_str())
            .collect::<Vec<_>>(),
        vec!["Mozilla.Firefox", "7zip.7zip"]
    );

    let err = resolve_selection(&catalog, "1,99").expect_err("unknown id must fail");
    assert!(err.to_string().contains("no catalog entry with id 99"));
}

#[test]
fn parse_confirmation_accepts_y_n_and_back() {
    assert_eq!(parse_confirmation("y"), Some(Confirmation::Yes));
    assert_eq!(parse_confirmation("Y"), Some(Confirmation::Yes));
    assert_eq!(parse_confirmation("yes"), Some(Confirmation::Yes));
    assert_eq!(parse_confirmation("n"), Some(Confirmation::No));
    assert_eq!(parse_confirmation("No"), Some(Confirmation::No));
    assert_eq!(parse_confirmation("0"), Some(Confirmation::Back));
    assert_eq!(parse_confirmation("maybe"), None);
    assert_eq!(parse_confirmation(""), None);
}

#[test]
fn render_status_line_plain_is_unadorned() {
    assert_eq!(
        render_status_line(OutputStyle::Plain, "ok", "installed 7-Zip"),
        "installed 7-Zip"
    );
}

#[test]
fn render_status_line_rich_includes_ascii_badge() {
    assert_eq!(
        render_status_line(OutputStyle::Rich, "ok", "installed 7-Zip"),
        "[OK] installed 7-Zip"
    );
    assert_eq!(
        render_status_line(OutputStyle::Rich, "err", "install failed"),
        "[ERR] install failed"
    );
    assert_eq!(
        render_status_line(OutputStyle::Rich, "warn", "1 of 3 install(s) failed"),
        "[WARN] 1 of 3 install(s) failed"
    );
    assert_eq!(
        render_status_line(OutputStyle::Rich, "step", "2 update(s) available"),
        "[..] 2 update(s) available"
    );
}

#[test]
fn format_managed_lines_shows_status_and_pin() {
    let catalog = test_catalog();
    let mut doc = StateDocument::new("0.0.1", 1);
    doc.managed_apps.push(ManagedApp::new("7zip.7zip"));
    doc.managed_apps.push(ManagedApp {
        package_id: "VideoLAN.VLC".to_string(),
        pinned: true,
        last_seen_version: None,
        last_status: AppStatus::UpgradedOrOk,
    });
    doc.managed_apps.push(ManagedApp::new("Unknown.App"));

    let lines = format_managed_lines(&doc, &catalog);
    assert_eq!(lines[0], "7-Zip (7zip.7zip): managed");
    assert_eq!(
        lines[1],
        "VLC media player (VideoLAN.VLC): upgraded_or_ok [pinned]"
    );
    assert_eq!(lines[2], "Unknown.App (Unknown.App): managed");
}

#[test]
fn format_managed_lines_reports_empty_set() {
    let catalog = test_catalog();
    let doc = StateDocument::new("0.0.1", 1);
    assert_eq!(
        format_managed_lines(&doc, &catalog),
        vec!["no managed apps yet".to_string()]
    );
}

#[test]
fn format_candidate_lines_names_each_candidate() {
    let catalog = test_catalog();
    let candidates = vec!["7zip.7zip".to_string(), "VideoLAN.VLC".to_string()];

    let lines = format_candidate_lines(&candidates, &catalog, OutputStyle::Plain);
    assert_eq!(lines[0], "2 update(s) available");
    assert_eq!(lines[1], "- 7-Zip (7zip.7zip)");
    assert_eq!(lines[2], "- VLC media player (VideoLAN.VLC)");
}

#[test]
fn format_update_report_lines_reports_mixed_outcomes() {
    let catalog = test_catalog();
    let report = UpgradeReport {
        candidates: vec!["7zip.7zip".to_string(), "VideoLAN.VLC".to_string()],
        outcomes: vec![
            UpgradeOutcome {
                package_id: "7zip.7zip".to_string(),
                status: AppStatus::UpgradedOrOk,
                detail: None,
            },
            UpgradeOutcome {
                package_id: "VideoLAN.VLC".to_string(),
                status: AppStatus::UpgradeFailed,
                detail: Some("Installer failed with exit code 1603".to_string()),
            },
        ],
    };

    let lines = format_update_report_lines(&report, &catalog, OutputStyle::Rich);
    assert_eq!(lines[0], "[OK] upgraded 7-Zip");
    assert_eq!(
        lines[1],
        "[ERR] upgrade failed for VLC media player: Installer failed with exit code 1603"
    );
    assert_eq!(lines[2], "[WARN] 1 of 2 upgrade(s) failed");
}

#[test]
fn format_catalog_lines_groups_by_category() {
    let catalog = test_catalog();
    let lines = format_catalog_lines(&catalog);
    assert_eq!(lines[0], "Utilities:");
    assert_eq!(lines[1], "    1) 7-Zip");
    assert_eq!(lines[2], "Media:");
    assert_eq!(lines[3], "    2) VLC media player");
    assert_eq!(lines[4], "Browsers:");
    assert_eq!(lines[5], "    3) Mozilla Firefox");
}

#[test]
fn set_pinned_requires_a_managed_entry() {
    let mut doc = StateDocument::new("0.0.1", 1);
    doc.managed_apps.push(ManagedApp::new("7zip.7zip"));

    set_pinned(&mut doc, "7zip.7zip", true).expect("managed app must pin");
    assert!(doc.managed_apps[0].pinned);
    set_pinned(&mut doc, "7zip.7zip", false).expect("managed app must unpin");
    assert!(!doc.managed_apps[0].pinned);

    let err = set_pinned(&mut doc, "Mozilla.Firefox", true).expect_err("unmanaged must fail");
    assert!(err.to_string().contains("not a managed app"));
}
