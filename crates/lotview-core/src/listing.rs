use rust_decimal::Decimal;
use serde::Serialize;

use crate::pricing::{effective_price, has_discount, savings};
use crate::vehicle::VehicleRecord;

/// A vehicle as presented in a list: the record plus its display key and
/// derived pricing.
#[derive(Debug, Clone, Serialize)]
pub struct ListedVehicle<'a> {
    pub key: String,
    #[serde(flatten)]
    pub vehicle: &'a VehicleRecord,
    pub effective_price: Option<Decimal>,
    pub has_discount: bool,
    pub savings: Option<Decimal>,
}

impl<'a> ListedVehicle<'a> {
    /// `index` is the record's position in its snapshot, used as the key when
    /// the stock number is absent.
    #[must_use]
    pub fn new(index: usize, vehicle: &'a VehicleRecord) -> Self {
        Self {
            key: vehicle.display_key(index),
            vehicle,
            effective_price: effective_price(vehicle),
            has_discount: has_discount(vehicle),
            savings: savings(vehicle),
        }
    }
}
