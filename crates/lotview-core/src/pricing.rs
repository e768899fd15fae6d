//! Discount and displayed-price rules.
//!
//! Every surface that shows a price (view engine buckets and sorting,
//! facets, posters, CLI tables, HTTP responses) goes through these
//! functions so the discount decision is made in exactly one place.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::vehicle::{group_thousands, VehicleRecord};

/// Returns `true` when the vehicle has both prices and the sale price is
/// strictly below the list price.
#[must_use]
pub fn has_discount(vehicle: &VehicleRecord) -> bool {
    matches!(
        (vehicle.sale_price, vehicle.list_price),
        (Some(sale), Some(list)) if sale < list
    )
}

/// The displayed price: the sale price when [`has_discount`] holds,
/// otherwise the list price (which may be absent).
#[must_use]
pub fn effective_price(vehicle: &VehicleRecord) -> Option<Decimal> {
    if has_discount(vehicle) {
        vehicle.sale_price
    } else {
        vehicle.list_price
    }
}

/// Amount saved against the list price, when a discount applies.
#[must_use]
pub fn savings(vehicle: &VehicleRecord) -> Option<Decimal> {
    match (vehicle.sale_price, vehicle.list_price) {
        (Some(sale), Some(list)) if sale < list => Some(list - sale),
        _ => None,
    }
}

/// Formats a price as whole US dollars: `$32,995`.
///
/// Cents are rounded half away from zero.
#[must_use]
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(&digits))
}
