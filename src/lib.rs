pub mod cleaning;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod sinks;
pub mod sources;
pub mod table;
pub mod types;

pub use error::{EtlError, Result};
pub use table::Table;
pub use types::Dataset;
