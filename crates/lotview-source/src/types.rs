//! Raw shapes returned by the inventory sources.
//!
//! Neither source is trusted: the JSON endpoint and the CSV export use
//! different field names and mix strings with numbers, so raw records are
//! kept as loose key/value maps until [`crate::normalize`] resolves them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level payload of the live inventory endpoint.
///
/// `success` is accepted as a synonym of `ok`.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub vehicles: Vec<RawRecord>,
    #[serde(default)]
    pub error: Option<String>,
}

impl InventoryResponse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.ok || self.success
    }
}

/// One unvalidated vehicle row, keyed by whatever field names the source used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field unless the key is already present. CSV files with a
    /// repeated header keep the first column.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.entry(key.into()).or_insert_with(|| value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the first non-empty scalar among `aliases`, as trimmed text.
    ///
    /// Numbers and booleans are stringified. Nulls, empty strings, arrays and
    /// objects are skipped so the next alias gets a chance.
    #[must_use]
    pub fn text(&self, aliases: &[&str]) -> Option<String> {
        aliases
            .iter()
            .filter_map(|alias| self.0.get(*alias))
            .find_map(scalar_text)
    }

    /// Returns the first alias whose value is present and non-empty, without
    /// coercing it.
    #[must_use]
    pub fn value(&self, aliases: &[&str]) -> Option<&Value> {
        aliases
            .iter()
            .filter_map(|alias| self.0.get(*alias))
            .find(|v| match v {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                Value::Array(items) => !items.is_empty(),
                _ => true,
            })
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
