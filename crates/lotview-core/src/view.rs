//! Filter, search and sort engine.
//!
//! [`view`] is a pure function of the record list and a [`QueryState`]. It
//! is recomputed from scratch on every call; inventories are a few hundred
//! records, so there is no incremental diffing.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::pricing::effective_price;
use crate::query::{QueryState, SortKey};
use crate::vehicle::VehicleRecord;

/// Returns the records visible under `query`, in display order.
#[must_use]
pub fn view<'a>(records: &'a [VehicleRecord], query: &QueryState) -> Vec<&'a VehicleRecord> {
    view_indexed(records, query)
        .into_iter()
        .map(|(_, vehicle)| vehicle)
        .collect()
}

/// Like [`view`], but pairs each visible record with its position in
/// `records` so callers can derive [`VehicleRecord::display_key`].
#[must_use]
pub fn view_indexed<'a>(
    records: &'a [VehicleRecord],
    query: &QueryState,
) -> Vec<(usize, &'a VehicleRecord)> {
    let matcher = Matcher::new(query);
    let mut visible: Vec<(usize, &VehicleRecord)> = records
        .iter()
        .enumerate()
        .filter(|(_, vehicle)| matcher.matches(vehicle))
        .collect();

    // `sort_by` is stable: equal keys keep their filtered order.
    visible.sort_by(|(_, a), (_, b)| compare(query.sort, a, b));
    visible
}

/// Pre-processed predicates for one query. Every text input is trimmed,
/// so surrounding whitespace never turns a filter into a no-match.
struct Matcher<'q> {
    needle: String,
    make: &'q str,
    year: &'q str,
    fuel_type: &'q str,
    query: &'q QueryState,
}

impl<'q> Matcher<'q> {
    fn new(query: &'q QueryState) -> Self {
        Self {
            needle: query.search.trim().to_lowercase(),
            make: query.make.trim(),
            year: query.year.trim(),
            fuel_type: query.fuel_type.trim(),
            query,
        }
    }

    fn matches(&self, vehicle: &VehicleRecord) -> bool {
        (self.needle.is_empty() || vehicle.search_text().contains(&self.needle))
            && (self.make.is_empty() || vehicle.make == self.make)
            && (self.year.is_empty() || vehicle.year.to_string() == self.year)
            && (self.fuel_type.is_empty() || vehicle.fuel_type == self.fuel_type)
            && self.query.price_range.contains(effective_price(vehicle))
    }
}

/// Total order for one sort key.
///
/// Missing prices and mileages never panic: they fall back to the sentinel
/// the key defines (0 for `price-desc`, "last" for the ascending keys).
#[must_use]
pub fn compare(sort: SortKey, a: &VehicleRecord, b: &VehicleRecord) -> Ordering {
    match sort {
        SortKey::YearDesc => b.year.cmp(&a.year),
        SortKey::YearAsc => a.year.cmp(&b.year),
        SortKey::PriceDesc => {
            let a = effective_price(a).unwrap_or(Decimal::ZERO);
            let b = effective_price(b).unwrap_or(Decimal::ZERO);
            b.cmp(&a)
        }
        SortKey::PriceAsc => missing_last(effective_price(a), effective_price(b)),
        SortKey::MakeAsc => compare_makes(&a.make, &b.make),
        SortKey::MileageAsc => missing_last(a.mileage, b.mileage),
    }
}

/// Locale-style ordering: accents and case are ignored at the primary
/// level, then accents, then case, then the exact strings so the order is
/// total.
pub(crate) fn compare_makes(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Decomposes to NFD, drops combining marks and lowercases, so `Škoda`
/// sorts as `skoda`.
fn collation_key(raw: &str) -> String {
    raw.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
