/// Dataset name constants used by the CLI, the cleaner registry and output file names.

pub const USERS_DATASET: &str = "users";
pub const CARDS_DATASET: &str = "cards";
pub const STORES_DATASET: &str = "stores";
pub const PRODUCTS_DATASET: &str = "products";
pub const ORDERS_DATASET: &str = "orders";
pub const DATE_EVENTS_DATASET: &str = "date_events";

// Destination tables in the star schema
pub const USERS_TARGET_TABLE: &str = "dim_users";
pub const CARDS_TARGET_TABLE: &str = "dim_card_details";
pub const STORES_TARGET_TABLE: &str = "dim_store_details";
pub const PRODUCTS_TARGET_TABLE: &str = "dim_products";
pub const ORDERS_TARGET_TABLE: &str = "orders_table";
pub const DATE_EVENTS_TARGET_TABLE: &str = "dim_date_times";

/// Literal the source systems write for a missing value
pub const NULL_SENTINEL: &str = "NULL";

/// Ten uppercase letters or digits: synthetic rows injected into the exports
pub const PLACEHOLDER_PATTERN: &str = r"^[A-Z0-9]{10}$";

/// Consecutive placeholder rows that make up a corrupt block in the products export
pub const PLACEHOLDER_BLOCK_WINDOW: usize = 3;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Key of the store count in the count endpoint's response body
pub const NUMBER_OF_STORES_FIELD: &str = "number_stores";

/// Column order of the cleaned store table
pub const STORE_COLUMN_ORDER: [&str; 11] = [
    "index",
    "address",
    "longitude",
    "latitude",
    "locality",
    "store_code",
    "staff_numbers",
    "opening_date",
    "store_type",
    "country_code",
    "continent",
];

/// Duplicate latitude column shipped by the store API
pub const STORE_DUPLICATE_LATITUDE: &str = "lat";

/// Columns removed from the orders table
pub const ORDER_PRUNED_COLUMNS: [&str; 3] = ["first_name", "last_name", "1"];

/// Get all supported dataset names
pub fn get_supported_datasets() -> Vec<&'static str> {
    vec![
        USERS_DATASET,
        CARDS_DATASET,
        STORES_DATASET,
        PRODUCTS_DATASET,
        ORDERS_DATASET,
        DATE_EVENTS_DATASET,
    ]
}
