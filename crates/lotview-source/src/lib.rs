pub mod client;
pub mod csv_reader;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod parse;
pub(crate) mod rate_limit;
pub mod types;

pub use client::InventoryClient;
pub use csv_reader::parse_csv;
pub use error::SourceError;
pub use loader::{load_snapshot, load_snapshot_from_config};
pub use normalize::{normalize, Normalized};
pub use types::{InventoryResponse, RawRecord};
