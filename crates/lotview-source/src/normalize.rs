//! Normalization from [`RawRecord`] to [`lotview_core::VehicleRecord`].
//!
//! Each canonical field is resolved through an alias list in priority order;
//! the first non-empty value wins. Rows without a make or a parseable year
//! are dropped, as are rows repeating an earlier stock number. Dropped rows
//! are returned as [`RowIssue`]s and never abort the batch.

use std::collections::HashSet;

use lotview_core::{RowIssue, SourceKind, VehicleRecord, DEFAULT_FUEL_TYPE};

use crate::parse::{parse_decimal, parse_image_urls, parse_mileage, parse_year};
use crate::types::RawRecord;

pub(crate) const MAKE: &[&str] = &["makeName", "make", "Make", "MakeName"];
pub(crate) const YEAR: &[&str] = &["year", "Year"];
pub(crate) const MODEL: &[&str] = &["model", "Model"];
pub(crate) const SUB_MODEL: &[&str] = &["sub-model", "subModel", "SubModel", "Submodel"];
pub(crate) const TRIM: &[&str] = &["trim", "Trim"];
pub(crate) const MILEAGE: &[&str] = &["mileage", "Mileage", "odometer", "Odometer"];
pub(crate) const LIST_PRICE: &[&str] = &["value", "price", "Price", "listPrice", "list_price"];
pub(crate) const SALE_PRICE: &[&str] = &["sale_value", "salePrice", "sale_price", "Sale", "SalePrice"];
pub(crate) const STOCK_NUMBER: &[&str] = &["stock_number", "Stock", "StockNumber", "stockNumber"];
pub(crate) const ENGINE: &[&str] = &["engine", "Engine"];
pub(crate) const FUEL_TYPE: &[&str] = &["fuel_type", "fuelType", "FuelType", "Fuel"];
pub(crate) const IMAGE_URLS: &[&str] = &["image_urls", "imageUrls", "images", "Images"];
pub(crate) const EXTERIOR_COLOR: &[&str] = &["exterior_color", "exteriorColor", "ExteriorColor"];
pub(crate) const INTERIOR_COLOR: &[&str] = &["interior_color", "interiorColor", "InteriorColor"];
pub(crate) const TRANSMISSION: &[&str] = &["transmission", "Transmission"];
pub(crate) const DRIVETRAIN: &[&str] = &["drivetrain", "Drivetrain"];
pub(crate) const BODY_STYLE: &[&str] = &["body_style", "bodyStyle", "BodyStyle"];

/// Output of [`normalize`]: accepted vehicles in input order plus the rows
/// that were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub vehicles: Vec<VehicleRecord>,
    pub skipped: Vec<RowIssue>,
}

/// Normalizes a batch of raw records from one source.
///
/// Input order is preserved. `source` only labels log lines; both sources
/// follow the same rules.
#[must_use]
pub fn normalize(raw: &[RawRecord], source: SourceKind) -> Normalized {
    let mut out = Normalized {
        vehicles: Vec::with_capacity(raw.len()),
        skipped: Vec::new(),
    };
    let mut seen_stock = HashSet::new();

    for (index, record) in raw.iter().enumerate() {
        let stock_number = record.text(STOCK_NUMBER);

        let reason = match normalize_record(record) {
            Ok(vehicle) => match &vehicle.stock_number {
                Some(stock) if !seen_stock.insert(stock.clone()) => {
                    format!("duplicate stock number {stock}")
                }
                _ => {
                    out.vehicles.push(vehicle);
                    continue;
                }
            },
            Err(reason) => reason.to_string(),
        };

        tracing::warn!(
            %source,
            index,
            stock_number = stock_number.as_deref().unwrap_or(""),
            reason = %reason,
            "skipping inventory row"
        );
        out.skipped.push(RowIssue {
            index,
            stock_number,
            reason,
        });
    }

    out
}

/// Resolves one raw record. Errors carry the reason the row is unusable.
fn normalize_record(raw: &RawRecord) -> Result<VehicleRecord, &'static str> {
    let make = raw.text(MAKE).ok_or("missing make")?;
    let year = raw
        .text(YEAR)
        .ok_or("missing year")
        .and_then(|y| parse_year(&y).ok_or("unparseable year"))?;

    Ok(VehicleRecord {
        make,
        year,
        model: raw.text(MODEL).unwrap_or_default(),
        trim: raw.text(TRIM),
        sub_model: raw.text(SUB_MODEL),
        mileage: raw.text(MILEAGE).as_deref().and_then(parse_mileage),
        list_price: raw.text(LIST_PRICE).as_deref().and_then(parse_decimal),
        sale_price: raw.text(SALE_PRICE).as_deref().and_then(parse_decimal),
        stock_number: raw.text(STOCK_NUMBER),
        engine: raw.text(ENGINE),
        fuel_type: raw
            .text(FUEL_TYPE)
            .unwrap_or_else(|| DEFAULT_FUEL_TYPE.to_string()),
        image_urls: raw
            .value(IMAGE_URLS)
            .map(parse_image_urls)
            .unwrap_or_default(),
        exterior_color: raw.text(EXTERIOR_COLOR),
        interior_color: raw.text(INTERIOR_COLOR),
        transmission: raw.text(TRANSMISSION),
        drivetrain: raw.text(DRIVETRAIN),
        body_style: raw.text(BODY_STYLE),
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
