//! Inventory command handlers for the CLI.
//!
//! Each handler loads a fresh snapshot from the configured sources, so a
//! command always reflects the latest data the sources can provide.

use std::path::Path;

use anyhow::Context;
use lotview_core::pricing::format_price;
use lotview_core::{
    compose_poster, AppConfig, Facets, InventorySnapshot, ListedVehicle, PosterOptions,
    QueryState, VehicleRecord,
};
use lotview_source::{load_snapshot_from_config, InventoryClient, SourceError};

async fn load(config: &AppConfig) -> anyhow::Result<InventorySnapshot> {
    let client = InventoryClient::from_config(config)?;
    let snapshot = load_snapshot_from_config(&client, config).await?;
    if snapshot.fell_back {
        eprintln!("note: live inventory unavailable, showing CSV data");
    }
    Ok(snapshot)
}

fn find<'a>(snapshot: &'a InventorySnapshot, key: &str) -> anyhow::Result<(usize, &'a VehicleRecord)> {
    snapshot
        .find(key)
        .ok_or_else(|| anyhow::anyhow!("vehicle '{key}' not found; run `lotview list` to see keys"))
}

/// Print the filtered, sorted inventory as a table or JSON.
///
/// # Errors
///
/// Returns an error if the inventory cannot be loaded.
pub(crate) async fn run_list(
    config: &AppConfig,
    query: &QueryState,
    json: bool,
) -> anyhow::Result<()> {
    let snapshot = load(config).await?;
    let rows = snapshot.listing(query);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        if snapshot.is_empty() {
            println!("inventory is empty");
        } else {
            println!("no vehicles match the current filters");
        }
        return Ok(());
    }

    println!("{}", table_header());
    for row in &rows {
        println!("{}", table_row(row));
    }
    println!();
    println!("{} of {} vehicles", rows.len(), snapshot.len());
    Ok(())
}

/// Print one vehicle's detail fields.
///
/// # Errors
///
/// Returns an error if the inventory cannot be loaded or the key is unknown.
pub(crate) async fn run_show(config: &AppConfig, key: &str, json: bool) -> anyhow::Result<()> {
    let snapshot = load(config).await?;
    let (index, vehicle) = find(&snapshot, key)?;
    let listed = ListedVehicle::new(index, vehicle);

    if json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
    } else {
        for (label, value) in detail_lines(&listed) {
            println!("{label:<14}{value}");
        }
    }
    Ok(())
}

/// Render the poster HTML for one vehicle to stdout or a file.
///
/// # Errors
///
/// Returns an error if the inventory cannot be loaded, the key is unknown,
/// or the output file cannot be written.
pub(crate) async fn run_poster(
    config: &AppConfig,
    key: &str,
    out: Option<&Path>,
    auto_print: bool,
) -> anyhow::Result<()> {
    let snapshot = load(config).await?;
    let (_, vehicle) = find(&snapshot, key)?;
    let options = PosterOptions {
        dealer_name: config.dealer_name.clone(),
        auto_print,
    };
    let html = compose_poster(vehicle, &options);

    match out {
        Some(path) => {
            tokio::fs::write(path, html)
                .await
                .with_context(|| format!("failed to write poster to {}", path.display()))?;
            println!("wrote poster for {} to {}", vehicle.title(), path.display());
        }
        None => print!("{html}"),
    }
    Ok(())
}

/// Print the distinct filter values present in the inventory.
///
/// # Errors
///
/// Returns an error if the inventory cannot be loaded.
pub(crate) async fn run_facets(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let snapshot = load(config).await?;
    let facets = snapshot.facets();
    if json {
        println!("{}", serde_json::to_string_pretty(&facets)?);
    } else {
        print!("{}", facets_text(&facets));
    }
    Ok(())
}

/// Fire the scraper's refresh trigger.
///
/// # Errors
///
/// Returns an error if no refresh URL is configured or the trigger is
/// rejected.
pub(crate) async fn run_refresh(config: &AppConfig) -> anyhow::Result<()> {
    let url = config
        .refresh_url
        .as_deref()
        .ok_or(SourceError::RefreshNotConfigured)?;
    let client = InventoryClient::from_config(config)?;
    client
        .trigger_refresh(url, config.refresh_secret.as_deref())
        .await?;
    println!("refresh triggered; new inventory should be available in a few minutes");
    Ok(())
}

pub(crate) fn table_header() -> String {
    format!(
        "{:<12}{:<6}{:<14}{:<18}{:<12}{:<12}PRICE",
        "KEY", "YEAR", "MAKE", "MODEL", "TRIM", "MILEAGE"
    )
}

pub(crate) fn table_row(row: &ListedVehicle<'_>) -> String {
    let v = row.vehicle;
    format!(
        "{:<12}{:<6}{:<14}{:<18}{:<12}{:<12}{}",
        truncate(&row.key, 11),
        v.year,
        truncate(&v.make, 13),
        truncate(&v.model, 17),
        truncate(v.trim.as_deref().unwrap_or(""), 11),
        v.mileage_label(),
        price_cell(row)
    )
}

/// `"$32,500 (was $35,000)"` for discounted vehicles, `"Call for price"`
/// when unpriced.
pub(crate) fn price_cell(row: &ListedVehicle<'_>) -> String {
    match (row.effective_price, row.has_discount, row.vehicle.list_price) {
        (Some(price), true, Some(list)) => {
            format!("{} (was {})", format_price(price), format_price(list))
        }
        (Some(price), _, _) => format_price(price),
        (None, _, _) => "Call for price".to_string(),
    }
}

pub(crate) fn detail_lines(row: &ListedVehicle<'_>) -> Vec<(&'static str, String)> {
    let v = row.vehicle;
    let text = |field: Option<&str>| field.unwrap_or("\u{2014}").to_string();
    let mut lines = vec![
        ("Key", row.key.clone()),
        ("Vehicle", v.title()),
        ("Sub-model", text(v.sub_model.as_deref())),
        ("Price", price_cell(row)),
        ("Mileage", v.mileage_label()),
        ("Engine", text(v.engine.as_deref())),
        ("Fuel", v.fuel_type.clone()),
        ("Transmission", text(v.transmission.as_deref())),
        ("Drivetrain", text(v.drivetrain.as_deref())),
        ("Body style", text(v.body_style.as_deref())),
        ("Exterior", text(v.exterior_color.as_deref())),
        ("Interior", text(v.interior_color.as_deref())),
        ("Stock", text(v.stock_number.as_deref())),
    ];
    if let Some(saved) = row.savings {
        lines.insert(4, ("You save", format_price(saved)));
    }
    lines.extend(v.image_urls.iter().map(|url| ("Image", url.clone())));
    lines
}

pub(crate) fn facets_text(facets: &Facets) -> String {
    let years: Vec<String> = facets.years.iter().map(ToString::to_string).collect();
    format!(
        "Vehicles: {} ({} on sale)\nMakes: {}\nYears: {}\nFuel types: {}\n",
        facets.total,
        facets.on_sale,
        facets.makes.join(", "),
        years.join(", "),
        facets.fuel_types.join(", ")
    )
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        let mut out: String = value.chars().take(max_chars.saturating_sub(1)).collect();
        out.push('\u{2026}');
        out
    } else {
        value.to_string()
    }
}
