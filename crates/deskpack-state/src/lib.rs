use std::time::{SystemTime, UNIX_EPOCH};

mod layout;
mod store;

pub use layout::StateLayout;
pub use store::{find_app_index, load_state, normalize, save_state};

pub fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}
