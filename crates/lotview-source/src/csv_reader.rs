//! CSV export reader.
//!
//! The export carries a header row whose names become [`RawRecord`] keys.
//! Rows may have fewer or more cells than the header; missing cells are
//! simply absent and extra cells are ignored.

use csv::{ReaderBuilder, Trim};

use crate::error::SourceError;
use crate::types::RawRecord;

/// Parses CSV text into raw records, one per non-blank data row.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the header row or a data row cannot be
/// read.
pub fn parse_csv(text: &str) -> Result<Vec<RawRecord>, SourceError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| SourceError::Csv {
            context: "header row".to_string(),
            source: e,
        })?
        .clone();

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let row_data = result.map_err(|e| SourceError::Csv {
            context: format!("data row {}", row + 1),
            source: e,
        })?;

        if row_data.iter().all(str::is_empty) {
            continue;
        }

        let record: RawRecord = headers
            .iter()
            .zip(row_data.iter())
            .filter(|(header, _)| !header.is_empty())
            .collect();
        records.push(record);
    }

    Ok(records)
}
