// Base trait and wrappers for dataset-specific cleaners
pub mod base;

// Individual cleaner implementations
pub mod cards;
pub mod date_events;
pub mod orders;
pub mod products;
pub mod stores;
pub mod users;

// Re-export the main components
pub use base::{DatasetCleaner, MetricsCleaner};
pub use cards::CardsCleaner;
pub use date_events::DateEventsCleaner;
pub use orders::OrdersCleaner;
pub use products::ProductsCleaner;
pub use stores::StoresCleaner;
pub use users::UsersCleaner;
