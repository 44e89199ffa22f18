mod catalog;
mod state;
mod status;

pub use catalog::{Catalog, CatalogBundle, CatalogEntry};
pub use state::{ManagedApp, StateDocument};
pub use status::AppStatus;
