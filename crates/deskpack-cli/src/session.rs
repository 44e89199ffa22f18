use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use deskpack_backend::PackageBackend;
use deskpack_core::Catalog;
use deskpack_state::StateLayout;

use crate::render::OutputStyle;

const EMBEDDED_CATALOG: &str = include_str!("../catalog.toml");

/// Everything a command needs besides the backend and the state document,
/// constructed once at startup and passed by reference. No ambient
/// globals.
pub(crate) struct Session {
    pub layout: StateLayout,
    pub catalog: Catalog,
    pub catalog_source: String,
    pub style: OutputStyle,
}

impl Session {
    pub fn open(
        state_root: &Path,
        catalog_path: Option<&Path>,
        style: OutputStyle,
    ) -> Result<Self> {
        let (catalog, catalog_source) = load_catalog(catalog_path)?;
        Ok(Self {
            layout: StateLayout::new(state_root),
            catalog,
            catalog_source,
            style,
        })
    }
}

/// A missing or unparsable catalog file is fatal for the whole run.
fn load_catalog(path: Option<&Path>) -> Result<(Catalog, String)> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog: {}", path.display()))?;
            let catalog = Catalog::from_toml_str(&raw)
                .with_context(|| format!("failed to load catalog: {}", path.display()))?;
            Ok((catalog, path.display().to_string()))
        }
        None => {
            let catalog = Catalog::from_toml_str(EMBEDDED_CATALOG)
                .context("built-in catalog is invalid")?;
            Ok((catalog, "built-in curated list".to_string()))
        }
    }
}

/// Backend availability preflight. A backend that cannot be invoked, or
/// that fails its own version probe, ends the session before any state is
/// touched.
pub(crate) fn ensure_backend_ready(backend: &dyn PackageBackend) -> Result<()> {
    let outcome = backend
        .probe()
        .context("package backend is not available; install winget (https://aka.ms/getwinget)")?;
    if !outcome.succeeded() {
        return Err(anyhow!(
            "package backend probe failed: {}",
            outcome.combined_output()
        ));
    }
    Ok(())
}
