use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fuel type assumed when a source does not state one.
pub const DEFAULT_FUEL_TYPE: &str = "Gasoline";

/// A vehicle from one inventory snapshot, normalized from whatever field
/// names and value types the source used.
///
/// Records are never patched in place: a refresh replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub make: String,
    /// Model year. Records without a parseable year never reach this type.
    pub year: i32,
    /// Empty string when the source has no model.
    pub model: String,
    pub trim: Option<String>,
    pub sub_model: Option<String>,
    /// Odometer reading in kilometres.
    pub mileage: Option<u32>,
    /// Regular asking price.
    pub list_price: Option<Decimal>,
    /// Discounted price. Only counts as a discount when below `list_price`;
    /// see [`crate::pricing::has_discount`].
    pub sale_price: Option<Decimal>,
    /// Dealer stock number, unique within a snapshot when present.
    pub stock_number: Option<String>,
    pub engine: Option<String>,
    /// Always populated; [`DEFAULT_FUEL_TYPE`] when the source was silent.
    pub fuel_type: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub exterior_color: Option<String>,
    pub interior_color: Option<String>,
    pub transmission: Option<String>,
    pub drivetrain: Option<String>,
    pub body_style: Option<String>,
}

impl VehicleRecord {
    /// Creates a record with the required fields set and every optional
    /// field empty.
    #[must_use]
    pub fn new(make: impl Into<String>, year: i32, model: impl Into<String>) -> Self {
        Self {
            make: make.into(),
            year,
            model: model.into(),
            trim: None,
            sub_model: None,
            mileage: None,
            list_price: None,
            sale_price: None,
            stock_number: None,
            engine: None,
            fuel_type: DEFAULT_FUEL_TYPE.to_string(),
            image_urls: Vec::new(),
            exterior_color: None,
            interior_color: None,
            transmission: None,
            drivetrain: None,
            body_style: None,
        }
    }

    /// `"2022 Toyota Camry"`.
    #[must_use]
    pub fn title(&self) -> String {
        let mut title = format!("{} {}", self.year, self.make);
        if !self.model.is_empty() {
            title.push(' ');
            title.push_str(&self.model);
        }
        title
    }

    /// Identity key for list rendering: the stock number, or the record's
    /// position in its snapshot when the stock number is absent.
    #[must_use]
    pub fn display_key(&self, index: usize) -> String {
        self.stock_number
            .clone()
            .unwrap_or_else(|| index.to_string())
    }

    /// Lowercased `"{year} {make} {model} {trim} {sub_model} {stock_number}"`
    /// used by free-text search. Absent fields contribute empty strings.
    #[must_use]
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.year,
            self.make,
            self.model,
            self.trim.as_deref().unwrap_or_default(),
            self.sub_model.as_deref().unwrap_or_default(),
            self.stock_number.as_deref().unwrap_or_default(),
        )
        .to_lowercase()
    }

    /// Mileage as shown on cards and posters: `"45,000 km"` or `"N/A"`.
    #[must_use]
    pub fn mileage_label(&self) -> String {
        self.mileage.map_or_else(
            || "N/A".to_string(),
            |km| format!("{} km", group_thousands(&km.to_string())),
        )
    }
}

/// Inserts `,` between each group of three digits in an unsigned integer
/// string: `"1234567"` becomes `"1,234,567"`.
pub(crate) fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
