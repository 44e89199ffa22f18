use std::collections::HashSet;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

/// One installable application as shown to the user. `local_id` is the
/// small number the menu displays; `package_id` is what the backend
/// understands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub local_id: u32,
    pub package_id: String,
    pub display_name: String,
    pub category: String,
}

/// A named curated group of catalog applications installable in one action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogBundle {
    pub name: String,
    pub display_name: String,
    pub package_ids: Vec<String>,
}

/// The curated list of installable applications. Read-only: the core never
/// mutates the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    #[serde(default)]
    pub entries: Vec<CatalogEntry>,
    #[serde(default)]
    pub bundles: Vec<CatalogBundle>,
}

impl Catalog {
    pub fn from_toml_str(input: &str) -> anyhow::Result<Self> {
        let catalog: Self = toml::from_str(input).context("failed to parse deskpack catalog")?;
        if catalog.entries.is_empty() {
            return Err(anyhow!("catalog must list at least one application"));
        }

        let mut seen_local_ids = HashSet::new();
        let mut seen_package_ids = HashSet::new();
        for entry in &catalog.entries {
            // Menu selections reserve 0 for "back", so an id of 0 could
            // never be picked.
            if entry.local_id == 0 {
                return Err(anyhow!(
                    "catalog entry '{}' has local id 0; ids start at 1",
                    entry.package_id
                ));
            }
            if entry.package_id.trim().is_empty() {
                return Err(anyhow!(
                    "catalog entry {} has an empty package id",
                    entry.local_id
                ));
            }
            if entry.display_name.trim().is_empty() {
                return Err(anyhow!(
                    "catalog entry '{}' has an empty display name",
                    entry.package_id
                ));
            }
            if !seen_local_ids.insert(entry.local_id) {
                return Err(anyhow!("duplicate catalog local id: {}", entry.local_id));
            }
            if !seen_package_ids.insert(entry.package_id.as_str()) {
                return Err(anyhow!(
                    "duplicate catalog package id: {}",
                    entry.package_id
                ));
            }
        }

        let mut seen_bundles = HashSet::new();
        for bundle in &catalog.bundles {
            if !seen_bundles.insert(bundle.name.as_str()) {
                return Err(anyhow!("duplicate bundle name: {}", bundle.name));
            }
            if bundle.package_ids.is_empty() {
                return Err(anyhow!("bundle '{}' lists no applications", bundle.name));
            }
            for package_id in &bundle.package_ids {
                if !seen_package_ids.contains(package_id.as_str()) {
                    return Err(anyhow!(
                        "bundle '{}' references unknown package id '{}'",
                        bundle.name,
                        package_id
                    ));
                }
            }
        }

        Ok(catalog)
    }

    pub fn display_name(&self, package_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.package_id == package_id)
            .map(|entry| entry.display_name.as_str())
    }

    pub fn entry_by_local_id(&self, local_id: u32) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.local_id == local_id)
    }

    pub fn bundle(&self, name: &str) -> Option<&CatalogBundle> {
        self.bundles.iter().find(|bundle| bundle.name == name)
    }

    /// Distinct categories in first-appearance order, for grouped display.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories = Vec::new();
        for entry in &self.entries {
            if !categories.contains(&entry.category.as_str()) {
                categories.push(entry.category.as_str());
            }
        }
        categories
    }
}
