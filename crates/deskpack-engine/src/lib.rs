mod reconcile;
mod register;

pub use reconcile::{
    apply_upgrades, discover_candidates, run_reconciliation, UpgradeOutcome, UpgradeReport,
};
pub use register::{ensure_managed, record_install_outcome};
