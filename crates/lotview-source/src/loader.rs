//! Builds an [`InventorySnapshot`] from the configured sources.
//!
//! In live mode the JSON endpoint is tried first and the CSV export is the
//! fallback; if both fail the error carries both causes. In CSV mode only the
//! export is read.

use lotview_core::{AppConfig, CsvLocation, InventorySnapshot, SourceKind, SourceMode};

use crate::client::InventoryClient;
use crate::csv_reader::parse_csv;
use crate::error::SourceError;
use crate::normalize::normalize;
use crate::types::RawRecord;

/// Loads a snapshot using the source settings in `config`.
///
/// # Errors
///
/// See [`load_snapshot`].
pub async fn load_snapshot_from_config(
    client: &InventoryClient,
    config: &AppConfig,
) -> Result<InventorySnapshot, SourceError> {
    load_snapshot(
        client,
        config.source_mode,
        config.api_url.as_deref(),
        &config.csv_source,
    )
    .await
}

/// Loads and normalizes one inventory snapshot.
///
/// An empty inventory is a valid snapshot, not an error.
///
/// # Errors
///
/// - In [`SourceMode::Csv`], whatever reading or parsing the CSV returned.
/// - In [`SourceMode::Live`], [`SourceError::BothSourcesFailed`] when the
///   endpoint and the CSV fallback both fail.
pub async fn load_snapshot(
    client: &InventoryClient,
    mode: SourceMode,
    api_url: Option<&str>,
    csv: &CsvLocation,
) -> Result<InventorySnapshot, SourceError> {
    let (raw, source, fell_back) = match mode {
        SourceMode::Csv => (load_csv(client, csv).await?, SourceKind::Csv, false),
        SourceMode::Live => {
            let live = match api_url {
                Some(url) => client.fetch_api(url).await,
                None => Err(SourceError::NoSourceConfigured),
            };
            match live {
                Ok(raw) => (raw, SourceKind::Api, false),
                Err(live_err) => {
                    tracing::warn!(error = %live_err, csv = %csv, "live inventory failed, trying CSV fallback");
                    match load_csv(client, csv).await {
                        Ok(raw) => (raw, SourceKind::Csv, true),
                        Err(csv_err) => {
                            return Err(SourceError::BothSourcesFailed {
                                live: Box::new(live_err),
                                csv: Box::new(csv_err),
                            })
                        }
                    }
                }
            }
        }
    };

    let normalized = normalize(&raw, source);
    let mut snapshot = InventorySnapshot::new(normalized.vehicles, source, normalized.skipped);
    snapshot.fell_back = fell_back;

    tracing::info!(
        source = %snapshot.source,
        fell_back,
        vehicles = snapshot.len(),
        skipped = snapshot.skipped.len(),
        "inventory snapshot loaded"
    );
    Ok(snapshot)
}

async fn load_csv(client: &InventoryClient, csv: &CsvLocation) -> Result<Vec<RawRecord>, SourceError> {
    let text = match csv {
        CsvLocation::Path(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| SourceError::Io {
                    path: path.clone(),
                    source: e,
                })?
        }
        CsvLocation::Url(url) => client.fetch_csv(url).await?,
    };
    parse_csv(&text)
}
