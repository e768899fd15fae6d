pub mod app_config;
pub mod config;
pub mod facets;
pub mod inventory;
pub mod listing;
pub mod poster;
pub mod pricing;
pub mod query;
pub mod vehicle;
pub mod view;

pub use app_config::{AppConfig, CsvLocation, Environment, SourceMode};
pub use config::{load_app_config, load_app_config_with_overrides};
pub use facets::{facets, Facets};
pub use inventory::{InventorySnapshot, RowIssue, SourceKind};
pub use listing::ListedVehicle;
pub use poster::{compose_poster, PosterOptions};
pub use pricing::{effective_price, has_discount, savings};
pub use query::{PriceRange, QueryState, SortKey};
pub use vehicle::{VehicleRecord, DEFAULT_FUEL_TYPE};
pub use view::{view, view_indexed};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid price range \"{0}\" (expected one of: under-30k, 30k-50k, 50k-70k, over-70k)")]
    InvalidPriceRange(String),

    #[error("invalid sort key \"{0}\" (expected one of: year-desc, year-asc, price-desc, price-asc, make-asc, mileage-asc)")]
    InvalidSortKey(String),
}
