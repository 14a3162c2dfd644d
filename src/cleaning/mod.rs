pub mod datasets;
pub mod registry;
pub mod rules;

pub use datasets::DatasetCleaner;
pub use registry::CleanerRegistry;
