use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::facets::{facets, Facets};
use crate::listing::ListedVehicle;
use crate::query::QueryState;
use crate::vehicle::VehicleRecord;
use crate::view::view_indexed;

/// Where a snapshot's raw records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The live scraping endpoint returning `{ ok, vehicles }`.
    Api,
    /// The CSV export.
    Csv,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Api => write!(f, "api"),
            SourceKind::Csv => write!(f, "csv"),
        }
    }
}

/// A raw record the normalizer dropped, kept for logging and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIssue {
    /// Zero-based position among the records handed to the normalizer. For
    /// CSV that is the position among non-blank data rows: the header and
    /// rows with only empty cells are not counted.
    pub index: usize,
    pub stock_number: Option<String>,
    pub reason: String,
}

/// One complete, immutable inventory load.
#[derive(Debug, Clone, Serialize)]
pub struct InventorySnapshot {
    pub vehicles: Vec<VehicleRecord>,
    pub source: SourceKind,
    /// `true` when the CSV was used because the live source failed.
    pub fell_back: bool,
    pub fetched_at: DateTime<Utc>,
    pub skipped: Vec<RowIssue>,
}

impl InventorySnapshot {
    #[must_use]
    pub fn new(vehicles: Vec<VehicleRecord>, source: SourceKind, skipped: Vec<RowIssue>) -> Self {
        Self {
            vehicles,
            source,
            fell_back: false,
            fetched_at: Utc::now(),
            skipped,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Looks a vehicle up by its [`VehicleRecord::display_key`].
    #[must_use]
    pub fn find(&self, key: &str) -> Option<(usize, &VehicleRecord)> {
        self.vehicles
            .iter()
            .enumerate()
            .find(|(i, v)| v.display_key(*i) == key)
    }

    #[must_use]
    pub fn view(&self, query: &QueryState) -> Vec<(usize, &VehicleRecord)> {
        view_indexed(&self.vehicles, query)
    }

    /// The query result as display rows with keys and derived pricing.
    #[must_use]
    pub fn listing(&self, query: &QueryState) -> Vec<ListedVehicle<'_>> {
        self.view(query)
            .into_iter()
            .map(|(index, vehicle)| ListedVehicle::new(index, vehicle))
            .collect()
    }

    #[must_use]
    pub fn facets(&self) -> Facets {
        facets(&self.vehicles)
    }
}
