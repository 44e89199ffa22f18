use serde::{Deserialize, Deserializer, Serialize};

use crate::status::AppStatus;

/// One application this tool has installed or been told to track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedApp {
    pub package_id: String,
    #[serde(default)]
    pub pinned: bool,
    /// Reserved for future version tracking; not populated today.
    #[serde(default)]
    pub last_seen_version: Option<String>,
    pub last_status: AppStatus,
}

impl ManagedApp {
    pub fn new(package_id: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
            pinned: false,
            last_seen_version: None,
            last_status: AppStatus::Managed,
        }
    }
}

/// The durable record of everything this tool has installed. Created once
/// with an empty managed set, mutated in place during a session, and
/// persisted after every state-mutating action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDocument {
    /// Tag of the tool build that last wrote the state. Informational only.
    pub version: String,
    /// Set once at creation, never overwritten afterwards.
    pub created_at_unix: u64,
    /// Overwritten on every persist.
    pub last_run_at_unix: u64,
    /// Insertion order = order first registered.
    #[serde(default, deserialize_with = "sequence_or_single")]
    pub managed_apps: Vec<ManagedApp>,
}

impl StateDocument {
    pub fn new(version: impl Into<String>, created_at_unix: u64) -> Self {
        Self {
            version: version.into(),
            created_at_unix,
            last_run_at_unix: created_at_unix,
            managed_apps: Vec::new(),
        }
    }
}

// State files written by earlier builds can carry a single collapsed object
// where a one-element sequence is meant. Deserialization always yields a
// sequence regardless of which shape is on disk.
fn sequence_or_single<'de, D>(deserializer: D) -> Result<Vec<ManagedApp>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SequenceOrSingle {
        Sequence(Vec<ManagedApp>),
        Single(ManagedApp),
    }

    match SequenceOrSingle::deserialize(deserializer)? {
        SequenceOrSingle::Sequence(apps) => Ok(apps),
        SequenceOrSingle::Single(app) => Ok(vec![app]),
    }
}
