//! Lenient field parsers.
//!
//! Source data is hand-maintained, so numbers arrive as `"$32,995"`,
//! `"45,000 km"` or plain JSON numbers. Every parser here returns `None`
//! instead of failing; the normalizer decides whether a missing value drops
//! the row.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

static NUMBER_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-?)\s*\$?\s*(\d[\d,]*(?:\.\d+)?)").expect("valid number regex")
});

/// Parses the first numeric token in `raw`, ignoring currency symbols,
/// thousands separators and trailing units. A negative token yields `None`:
/// prices, years and odometer readings are never below zero.
#[must_use]
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let caps = NUMBER_TOKEN_RE.captures(raw)?;
    if !caps[1].is_empty() {
        return None;
    }
    let token = caps[2].replace(',', "");
    Decimal::from_str(&token).ok()
}

/// Parses a model year. Fractional values are rejected.
#[must_use]
pub fn parse_year(raw: &str) -> Option<i32> {
    let value = parse_decimal(raw)?;
    if !value.fract().is_zero() {
        return None;
    }
    value.to_i32()
}

/// Parses an odometer reading, truncating any fractional part.
#[must_use]
pub fn parse_mileage(raw: &str) -> Option<u32> {
    parse_decimal(raw)?.trunc().to_u32()
}

/// Accepts either a JSON array of strings or one string holding several URLs
/// separated by `|`, `;` or whitespace.
#[must_use]
pub fn parse_image_urls(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Value::String(joined) => joined
            .split(|c: char| c == '|' || c == ';' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
