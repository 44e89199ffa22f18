use std::io::{self, Write};

use anyhow::{Context, Result};
use deskpack_backend::PackageBackend;
use deskpack_core::StateDocument;
use deskpack_state::save_state;

use crate::flows::{
    apply_updates, check_updates, format_catalog_lines, format_managed_lines, resolve_selection,
    run_install_batch,
};
use crate::render::{render_section_header, render_status_line};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Confirmation {
    Yes,
    No,
    Back,
}

pub(crate) fn parse_confirmation(input: &str) -> Option<Confirmation> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(Confirmation::Yes),
        "n" | "no" => Some(Confirmation::No),
        "0" => Some(Confirmation::Back),
        _ => None,
    }
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush().context("failed to flush prompt")?;

    let mut line = String::new();
    let read = io::stdin()
        .read_line(&mut line)
        .context("failed to read input")?;
    if read == 0 {
        // EOF behaves like "back" so piped input cannot wedge the menu.
        return Ok("0".to_string());
    }
    Ok(line.trim().to_string())
}

fn confirm(prompt: &str) -> Result<Confirmation> {
    loop {
        let answer = prompt_line(&format!("{prompt} [Y/N/0=back] "))?;
        if let Some(confirmation) = parse_confirmation(&answer) {
            return Ok(confirmation);
        }
        println!("please answer Y, N, or 0");
    }
}

/// The interactive session. Invalid input is reported and control returns
/// to the menu without mutating state; flow errors (backend hard faults,
/// state I/O) unwind to main. State is persisted by each mutating flow and
/// once more at clean exit.
pub(crate) fn run_menu(
    session: &Session,
    backend: &dyn PackageBackend,
    doc: &mut StateDocument,
) -> Result<()> {
    loop {
        println!();
        println!("{}", render_section_header(session.style, "deskpack"));
        println!(" 1) install a bundle");
        println!(" 2) browse catalog / install apps");
        println!(" 3) check & apply updates");
        println!(" 4) show managed apps");
        println!(" 5) pin / unpin an app");
        println!(" 0) exit");

        let choice = prompt_line("select an action: ")?;
        match choice.as_str() {
            "1" => menu_install_bundle(session, backend, doc)?,
            "2" => menu_browse_install(session, backend, doc)?,
            "3" => menu_update(session, backend, doc)?,
            "4" => {
                for line in format_managed_lines(doc, &session.catalog) {
                    println!("{line}");
                }
            }
            "5" => menu_toggle_pin(session, doc)?,
            "0" => break,
            "" => {}
            other => println!(
                "{}",
                render_status_line(session.style, "err", &format!("unknown menu choice: {other}"))
            ),
        }
    }

    save_state(&session.layout, doc)?;
    println!("bye");
    Ok(())
}

fn menu_install_bundle(
    session: &Session,
    backend: &dyn PackageBackend,
    doc: &mut StateDocument,
) -> Result<()> {
    if session.catalog.bundles.is_empty() {
        println!("the catalog defines no bundles");
        return Ok(());
    }

    println!();
    for (index, bundle) in session.catalog.bundles.iter().enumerate() {
        println!(
            " {}) {} ({} apps)",
            index + 1,
            bundle.display_name,
            bundle.package_ids.len()
        );
    }
    println!(" 0) back");

    let choice = prompt_line("select a bundle: ")?;
    if choice == "0" || choice.is_empty() {
        return Ok(());
    }
    let Some(bundle) = choice
        .parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| session.catalog.bundles.get(index))
    else {
        println!(
            "{}",
            render_status_line(session.style, "err", &format!("unknown bundle choice: {choice}"))
        );
        return Ok(());
    };

    let prompt = format!(
        "install '{}' ({} apps)?",
        bundle.display_name,
        bundle.package_ids.len()
    );
    if confirm(&prompt)? != Confirmation::Yes {
        return Ok(());
    }
    let package_ids = bundle.package_ids.clone();
    run_install_batch(session, backend, doc, &package_ids)
}

fn menu_browse_install(
    session: &Session,
    backend: &dyn PackageBackend,
    doc: &mut StateDocument,
) -> Result<()> {
    println!();
    for line in format_catalog_lines(&session.catalog) {
        println!("{line}");
    }

    let selection = prompt_line("apps to install (e.g. 1,3,7-10; 0 = back): ")?;
    if selection == "0" || selection.is_empty() {
        return Ok(());
    }

    // Selection problems are user-recoverable: report, back to the menu.
    let entries = match resolve_selection(&session.catalog, &selection) {
        Ok(entries) => entries,
        Err(err) => {
            println!("{}", render_status_line(session.style, "err", &format!("{err:#}")));
            return Ok(());
        }
    };

    println!("selected:");
    for entry in &entries {
        println!("- {} ({})", entry.display_name, entry.package_id);
    }
    if confirm(&format!("install {} app(s)?", entries.len()))? != Confirmation::Yes {
        return Ok(());
    }

    let package_ids = entries
        .iter()
        .map(|entry| entry.package_id.clone())
        .collect::<Vec<_>>();
    run_install_batch(session, backend, doc, &package_ids)
}

fn menu_update(
    session: &Session,
    backend: &dyn PackageBackend,
    doc: &mut StateDocument,
) -> Result<()> {
    if doc.managed_apps.is_empty() {
        println!("no managed apps yet");
        return Ok(());
    }

    let candidates = check_updates(session, backend, doc)?;
    if candidates.is_empty() {
        return save_state(&session.layout, doc);
    }

    if confirm("apply these updates?")? != Confirmation::Yes {
        return save_state(&session.layout, doc);
    }
    apply_updates(session, backend, doc, &candidates)
}

fn menu_toggle_pin(session: &Session, doc: &mut StateDocument) -> Result<()> {
    if doc.managed_apps.is_empty() {
        println!("no managed apps yet");
        return Ok(());
    }

    println!();
    for (index, line) in format_managed_lines(doc, &session.catalog).iter().enumerate() {
        println!(" {}) {}", index + 1, line);
    }
    println!(" 0) back");

    let choice = prompt_line("app to pin or unpin: ")?;
    if choice == "0" || choice.is_empty() {
        return Ok(());
    }
    let Some(index) = choice
        .parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .filter(|index| *index < doc.managed_apps.len())
    else {
        println!(
            "{}",
            render_status_line(session.style, "err", &format!("unknown app choice: {choice}"))
        );
        return Ok(());
    };

    let app = &mut doc.managed_apps[index];
    app.pinned = !app.pinned;
    let verb = if app.pinned { "pinned" } else { "unpinned" };
    let package_id = app.package_id.clone();
    save_state(&session.layout, doc)?;
    println!(
        "{}",
        render_status_line(
            session.style,
            "ok",
            &format!(
                "{verb} {} ({package_id})",
                session.catalog.display_name(&package_id).unwrap_or(&package_id)
            )
        )
    );
    Ok(())
}
