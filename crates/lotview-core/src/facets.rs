use std::collections::BTreeSet;

use serde::Serialize;

use crate::pricing::has_discount;
use crate::vehicle::VehicleRecord;
use crate::view::compare_makes;

/// Distinct filter values and headline counts for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// Distinct makes in `make-asc` order.
    pub makes: Vec<String>,
    /// Distinct model years, newest first.
    pub years: Vec<i32>,
    /// Distinct fuel types, alphabetical. Includes the default bucket.
    pub fuel_types: Vec<String>,
    pub total: usize,
    /// Vehicles with a sale price below their list price.
    pub on_sale: usize,
}

/// Collects the values that populate the make / year / fuel dropdowns.
#[must_use]
pub fn facets(records: &[VehicleRecord]) -> Facets {
    let mut makes: Vec<String> = records
        .iter()
        .map(|v| v.make.clone())
        .filter(|m| !m.is_empty())
        .collect();
    makes.sort_by(|a, b| compare_makes(a, b));
    makes.dedup();

    let years: BTreeSet<i32> = records.iter().map(|v| v.year).collect();
    let fuel_types: BTreeSet<&str> = records.iter().map(|v| v.fuel_type.as_str()).collect();

    Facets {
        makes,
        years: years.into_iter().rev().collect(),
        fuel_types: fuel_types.into_iter().map(str::to_owned).collect(),
        total: records.len(),
        on_sale: records.iter().filter(|v| has_discount(v)).count(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn facets_dedupes_and_orders() {
        let mut hybrid = VehicleRecord::new("Toyota", 2021, "Prius");
        hybrid.fuel_type = "Hybrid".to_string();
        let mut on_sale = VehicleRecord::new("honda", 2023, "Civic");
        on_sale.list_price = Some(Decimal::from(30_000));
        on_sale.sale_price = Some(Decimal::from(28_000));
        let records = vec![
            VehicleRecord::new("Toyota", 2020, "Camry"),
            hybrid,
            on_sale,
            VehicleRecord::new("Toyota", 2020, "Corolla"),
        ];

        let f = facets(&records);
        assert_eq!(f.makes, vec!["honda", "Toyota"]);
        assert_eq!(f.years, vec![2023, 2021, 2020]);
        assert_eq!(f.fuel_types, vec!["Gasoline", "Hybrid"]);
        assert_eq!(f.total, 4);
        assert_eq!(f.on_sale, 1);
    }

    #[test]
    fn facets_of_empty_snapshot() {
        let f = facets(&[]);
        assert!(f.makes.is_empty());
        assert!(f.years.is_empty());
        assert_eq!(f.total, 0);
    }
}
