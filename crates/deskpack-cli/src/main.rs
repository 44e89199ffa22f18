use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use deskpack_backend::{PackageBackend, WingetBackend};
use deskpack_state::load_state;

mod flows;
mod menu;
mod render;
mod selection;
mod session;

use flows::{
    format_managed_lines, run_bundle_install, run_install_selection, run_pin_flow,
    run_update_flow,
};
use menu::run_menu;
use render::{current_output_style, render_status_line};
use session::{ensure_backend_ready, Session};

#[derive(Parser, Debug)]
#[command(name = "deskpack")]
#[command(about = "Curated desktop app installer over winget", long_about = None)]
struct Cli {
    /// Directory holding the managed-app state file.
    #[arg(long, default_value = ".")]
    state_root: PathBuf,
    /// Catalog file overriding the built-in curated list.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Force plain output.
    #[arg(long)]
    plain: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive menu (the default when no command is given).
    Menu,
    /// Install catalog apps by id selection, e.g. "1,3,7-10".
    Install { selection: String },
    /// Install a named catalog bundle.
    Bundle { name: String },
    /// Check managed apps for updates and apply them.
    Update {
        /// Report candidates without applying.
        #[arg(long)]
        check_only: bool,
    },
    /// Show managed apps and their last recorded status.
    List,
    /// Exclude a managed app from upgrade consideration.
    Pin { package_id: String },
    /// Re-include a managed app in upgrade consideration.
    Unpin { package_id: String },
    /// Diagnose the backend and state locations.
    Doctor,
    /// Generate shell completions.
    Completions { shell: clap_complete::Shell },
}

fn main() -> Result<()> {
    run_cli(Cli::parse())
}

fn run_cli(cli: Cli) -> Result<()> {
    let style = current_output_style(cli.plain);

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let session = Session::open(&cli.state_root, cli.catalog.as_deref(), style)?;
            let backend = WingetBackend::new();
            ensure_backend_ready(&backend)?;
            let mut doc = load_state(&session.layout)?;
            run_menu(&session, &backend, &mut doc)
        }
        Commands::Install { selection } => {
            let session = Session::open(&cli.state_root, cli.catalog.as_deref(), style)?;
            let backend = WingetBackend::new();
            ensure_backend_ready(&backend)?;
            let mut doc = load_state(&session.layout)?;
            run_install_selection(&session, &backend, &mut doc, &selection)
        }
        Commands::Bundle { name } => {
            let session = Session::open(&cli.state_root, cli.catalog.as_deref(), style)?;
            let backend = WingetBackend::new();
            ensure_backend_ready(&backend)?;
            let mut doc = load_state(&session.layout)?;
            run_bundle_install(&session, &backend, &mut doc, &name)
        }
        Commands::Update { check_only } => {
            let session = Session::open(&cli.state_root, cli.catalog.as_deref(), style)?;
            let backend = WingetBackend::new();
            ensure_backend_ready(&backend)?;
            let mut doc = load_state(&session.layout)?;
            run_update_flow(&session, &backend, &mut doc, check_only)
        }
        Commands::List => {
            let session = Session::open(&cli.state_root, cli.catalog.as_deref(), style)?;
            let doc = load_state(&session.layout)?;
            for line in format_managed_lines(&doc, &session.catalog) {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Pin { package_id } => {
            let session = Session::open(&cli.state_root, cli.catalog.as_deref(), style)?;
            let mut doc = load_state(&session.layout)?;
            run_pin_flow(&session, &mut doc, &package_id, true)
        }
        Commands::Unpin { package_id } => {
            let session = Session::open(&cli.state_root, cli.catalog.as_deref(), style)?;
            let mut doc = load_state(&session.layout)?;
            run_pin_flow(&session, &mut doc, &package_id, false)
        }
        Commands::Doctor => {
            let session = Session::open(&cli.state_root, cli.catalog.as_deref(), style)?;
            println!(
                "{}",
                render_status_line(
                    style,
                    "step",
                    &format!("state file: {}", session.layout.state_path().display())
                )
            );
            println!(
                "{}",
                render_status_line(
                    style,
                    "step",
                    &format!(
                        "catalog: {} ({} apps, {} bundles)",
                        session.catalog_source,
                        session.catalog.entries.len(),
                        session.catalog.bundles.len()
                    )
                )
            );

            let backend = WingetBackend::new();
            match backend.probe() {
                Ok(outcome) if outcome.succeeded() => {
                    println!(
                        "{}",
                        render_status_line(
                            style,
                            "ok",
                            &format!("backend: winget {}", outcome.combined_output())
                        )
                    );
                }
                Ok(outcome) => {
                    println!(
                        "{}",
                        render_status_line(
                            style,
                            "err",
                            &format!("backend probe failed: {}", outcome.combined_output())
                        )
                    );
                }
                Err(err) => {
                    println!("{}", render_status_line(style, "err", &format!("{err:#}")));
                }
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "deskpack", &mut std::io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
