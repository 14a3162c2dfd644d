// Field and row rules shared by the dataset cleaners
pub mod dates;
pub mod null_filter;
pub mod phone;
pub mod placeholder_blocks;
pub mod scrub;
pub mod weight;

pub use dates::{normalize_date_column, parse_fuzzy_date};
pub use null_filter::{filter_nulls_and_placeholders, is_placeholder, is_placeholder_row, strip_nulls};
pub use phone::{normalize_phone_column, normalize_phone_number};
pub use placeholder_blocks::drop_placeholder_blocks;
pub use weight::{convert_to_kg, convert_weight_column, parse_weight_expression};
