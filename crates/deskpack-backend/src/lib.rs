use anyhow::Result;

mod winget;

pub use winget::WingetBackend;

/// Result of one backend invocation. Backend-reported failure is an
/// ordinary value here, never an `Err`: the exit code plus the two text
/// streams are everything the backend gives back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl BackendOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// The backend has no structured no-op signal; classification works on
    /// the combined text of both streams.
    pub fn combined_output(&self) -> String {
        let mut combined = self.stdout.trim().to_string();
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            if !combined.is_empty() {
                combined.push('\n');
            }
            combined.push_str(stderr);
        }
        combined
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeMode {
    /// Report whether an update is available without applying it.
    Check,
    /// Perform the upgrade.
    Apply,
}

/// Contract over the system package manager. Every call is synchronous and
/// blocks for the duration of the underlying operation; concurrent
/// invocations are unsupported by the backend, so callers issue one call
/// at a time. An `Err` means the process could not be invoked at all and
/// is fatal for the whole run.
pub trait PackageBackend {
    fn install(&self, package_id: &str) -> Result<BackendOutcome>;
    fn upgrade(&self, package_id: &str, mode: UpgradeMode) -> Result<BackendOutcome>;
    /// Availability preflight; used by session startup and `doctor`.
    fn probe(&self) -> Result<BackendOutcome>;
}

/// Phrases the backend prints when an upgrade or lookup has nothing to do.
const NOOP_PHRASES: [&str; 2] = ["no applicable update found", "no installed package found"];

/// True when the combined backend output reports "nothing to do". Exit
/// codes are unreliable on informational runs, so this substring match is
/// the only dependable signal.
pub fn is_noop_output(output: &str) -> bool {
    let lowered = output.to_ascii_lowercase();
    NOOP_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

#[cfg(test)]
mod tests;
