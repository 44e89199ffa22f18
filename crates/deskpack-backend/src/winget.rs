use std::process::Command;

use anyhow::{Context, Result};

use crate::{BackendOutcome, PackageBackend, UpgradeMode};

const DEFAULT_PROGRAM: &str = "winget";

// Consent flags let winget proceed without prompting. The check invocation
// deliberately omits them so it can only report.
const CONSENT_ARGS: [&str; 3] = [
    "--silent",
    "--accept-package-agreements",
    "--accept-source-agreements",
];

/// Adapter over the winget process boundary. One invocation per call,
/// output fully captured, no timeout: an unresponsive backend call blocks
/// the session until it returns.
#[derive(Debug, Clone)]
pub struct WingetBackend {
    program: String,
}

impl WingetBackend {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub(crate) fn install_args(package_id: &str) -> Vec<String> {
        let mut args = base_args("install", package_id);
        args.extend(CONSENT_ARGS.iter().map(|arg| (*arg).to_string()));
        args
    }

    pub(crate) fn upgrade_args(package_id: &str, mode: UpgradeMode) -> Vec<String> {
        let mut args = base_args("upgrade", package_id);
        if mode == UpgradeMode::Apply {
            args.extend(CONSENT_ARGS.iter().map(|arg| (*arg).to_string()));
        }
        args
    }

    fn run(&self, args: &[String]) -> Result<BackendOutcome> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .with_context(|| {
                format!(
                    "package backend could not be invoked: {} {}",
                    self.program,
                    args.join(" ")
                )
            })?;

        Ok(BackendOutcome {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl Default for WingetBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageBackend for WingetBackend {
    fn install(&self, package_id: &str) -> Result<BackendOutcome> {
        self.run(&Self::install_args(package_id))
    }

    fn upgrade(&self, package_id: &str, mode: UpgradeMode) -> Result<BackendOutcome> {
        self.run(&Self::upgrade_args(package_id, mode))
    }

    fn probe(&self) -> Result<BackendOutcome> {
        self.run(&["--version".to_string()])
    }
}

fn base_args(action: &str, package_id: &str) -> Vec<String> {
    vec![
        action.to_string(),
        "--id".to_string(),
        package_id.to_string(),
        "--exact".to_string(),
        "--disable-interactivity".to_string(),
    ]
}
