use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a managed application, as recorded in the state
/// document. An entry is never in a terminal state: every update run
/// revisits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppStatus {
    Managed,
    Installed,
    InstallFailed,
    UpgradedOrOk,
    UpgradeFailed,
}

impl AppStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Managed => "managed",
            Self::Installed => "installed",
            Self::InstallFailed => "install_failed",
            Self::UpgradedOrOk => "upgraded_or_ok",
            Self::UpgradeFailed => "upgrade_failed",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "managed" => Ok(Self::Managed),
            "installed" => Ok(Self::Installed),
            "install_failed" => Ok(Self::InstallFailed),
            "upgraded_or_ok" => Ok(Self::UpgradedOrOk),
            "upgrade_failed" => Ok(Self::UpgradeFailed),
            _ => Err(anyhow!("invalid app status: {value}")),
        }
    }
}
