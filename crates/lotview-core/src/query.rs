//! The search/filter/sort selection that drives the visible list.
//!
//! [`PriceRange`] and [`SortKey`] use the same wire strings for CLI flags,
//! HTTP query parameters, and serde, e.g. `under-30k` and `price-asc`.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::QueryError;

/// Displayed-price bucket. Intervals are half-open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceRange {
    /// No price filter.
    #[default]
    #[serde(rename = "")]
    Any,
    /// `< 30000`
    #[serde(rename = "under-30k")]
    Under30k,
    /// `[30000, 50000)`
    #[serde(rename = "30k-50k")]
    From30kTo50k,
    /// `[50000, 70000)`
    #[serde(rename = "50k-70k")]
    From50kTo70k,
    /// `>= 70000`
    #[serde(rename = "over-70k")]
    Over70k,
}

impl PriceRange {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PriceRange::Any => "",
            PriceRange::Under30k => "under-30k",
            PriceRange::From30kTo50k => "30k-50k",
            PriceRange::From50kTo70k => "50k-70k",
            PriceRange::Over70k => "over-70k",
        }
    }

    /// Returns `true` if `price` falls in this bucket.
    ///
    /// A missing price only satisfies [`PriceRange::Any`].
    #[must_use]
    pub fn contains(self, price: Option<Decimal>) -> bool {
        let (low, high) = match self {
            PriceRange::Any => return true,
            PriceRange::Under30k => (None, Some(30_000)),
            PriceRange::From30kTo50k => (Some(30_000), Some(50_000)),
            PriceRange::From50kTo70k => (Some(50_000), Some(70_000)),
            PriceRange::Over70k => (Some(70_000), None),
        };
        let Some(price) = price else {
            return false;
        };
        low.is_none_or(|low| price >= Decimal::from(low))
            && high.is_none_or(|high| price < Decimal::from(high))
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceRange {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "any" => Ok(PriceRange::Any),
            "under-30k" => Ok(PriceRange::Under30k),
            "30k-50k" => Ok(PriceRange::From30kTo50k),
            "50k-70k" => Ok(PriceRange::From50kTo70k),
            "over-70k" => Ok(PriceRange::Over70k),
            other => Err(QueryError::InvalidPriceRange(other.to_string())),
        }
    }
}

/// Display order of the filtered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "year-desc")]
    YearDesc,
    #[serde(rename = "year-asc")]
    YearAsc,
    /// Unpriced vehicles count as 0.
    #[serde(rename = "price-desc")]
    PriceDesc,
    /// Unpriced vehicles sort last.
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "make-asc")]
    MakeAsc,
    /// Vehicles without mileage sort last.
    #[serde(rename = "mileage-asc")]
    MileageAsc,
}

impl SortKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::YearDesc => "year-desc",
            SortKey::YearAsc => "year-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::PriceAsc => "price-asc",
            SortKey::MakeAsc => "make-asc",
            SortKey::MileageAsc => "mileage-asc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "year-desc" => Ok(SortKey::YearDesc),
            "year-asc" => Ok(SortKey::YearAsc),
            "price-desc" => Ok(SortKey::PriceDesc),
            "price-asc" => Ok(SortKey::PriceAsc),
            // `make` is the older spelling used by the CSV-only browser.
            "make-asc" | "make" => Ok(SortKey::MakeAsc),
            "mileage-asc" => Ok(SortKey::MileageAsc),
            other => Err(QueryError::InvalidSortKey(other.to_string())),
        }
    }
}

/// Current search, filter and sort selection.
///
/// Empty strings mean "no filter" for every text field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryState {
    /// Case-insensitive substring over year, make, model, trim, sub-model
    /// and stock number.
    pub search: String,
    pub make: String,
    pub year: String,
    pub fuel_type: String,
    pub price_range: PriceRange,
    pub sort: SortKey,
}
