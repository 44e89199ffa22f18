use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const STATE_FILE_NAME: &str = "deskpack-state.json";

/// Where the state store keeps its file. The default root is the tool's
/// working directory; `--state-root` makes it explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLayout {
    root: PathBuf,
}

impl StateLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE_NAME)
    }

    pub fn tmp_state_path(&self) -> PathBuf {
        self.root.join(format!("{STATE_FILE_NAME}.tmp"))
    }

    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))
    }
}
