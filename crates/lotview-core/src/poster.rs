//! Printable windshield poster for a single vehicle.
//!
//! The template is fixed; only escaped vehicle data and the dealer name are
//! substituted. The discount block is chosen with [`has_discount`], the same
//! rule the list view uses.

use crate::pricing::{format_price, has_discount, savings};
use crate::vehicle::VehicleRecord;

/// Per-dealer poster settings.
#[derive(Debug, Clone)]
pub struct PosterOptions {
    /// Shown in the poster header and footer.
    pub dealer_name: String,
    /// Adds a script that opens the print dialog once the page loads.
    pub auto_print: bool,
}

impl Default for PosterOptions {
    fn default() -> Self {
        Self {
            dealer_name: "Used Inventory".to_string(),
            auto_print: false,
        }
    }
}

/// Renders the poster as a standalone HTML document.
#[must_use]
pub fn compose_poster(vehicle: &VehicleRecord, options: &PosterOptions) -> String {
    let dealer = escape(&options.dealer_name);
    let title = escape(&vehicle.title());
    let stock = escape(vehicle.stock_number.as_deref().unwrap_or("N/A"));

    let trim_line = vehicle
        .trim
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|t| {
            format!(
                r#"<div class="info-line"><span class="info-value">{}</span></div>"#,
                escape(t)
            )
        })
        .unwrap_or_default();

    let footer_color = vehicle
        .exterior_color
        .as_deref()
        .map(|c| format!(" &bull; {}", escape(c)))
        .unwrap_or_default();

    let print_script = if options.auto_print {
        "<script>window.onload = function () { setTimeout(function () { window.print(); }, 500); };</script>"
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8"/>
<title>Vehicle Poster - {title}</title>
<style>
body {{ margin: 20px; display: flex; justify-content: center; font-family: Inter, system-ui, sans-serif; }}
@media print {{ body {{ margin: 0; }} .poster {{ margin: 0; border: none; }} }}
</style>
</head>
<body>
<div class="poster">
<div class="poster-logo-center"><div class="brand-logo-lg">{dealer}</div></div>
<div class="poster-model-center">{year}</div>
<div class="poster-info-box">
<div class="info-line"><span class="info-label">{make}</span> <span class="info-value">{model}</span></div>
{trim_line}
</div>
<div class="price-block">
{price_block}
</div>
<div class="poster-specs-wide">
<div class="spec"><label>Mileage</label><span>{mileage}</span></div>
<div class="spec"><label>Engine</label><span>{engine}</span></div>
<div class="spec"><label>Stock</label><span>{stock}</span></div>
</div>
<div class="poster-footer">{dealer}{footer_color} &bull; Stock #{stock}</div>
</div>
{print_script}
</body>
</html>
"#,
        year = vehicle.year,
        make = escape(&vehicle.make),
        model = escape(&vehicle.model),
        price_block = price_block(vehicle),
        mileage = escape(&vehicle.mileage_label()),
        engine = escape(vehicle.engine.as_deref().unwrap_or("N/A")),
    )
}

fn price_block(vehicle: &VehicleRecord) -> String {
    match (vehicle.list_price, vehicle.sale_price) {
        (Some(list), Some(sale)) if has_discount(vehicle) => {
            let saved = savings(vehicle).map(format_price).unwrap_or_default();
            format!(
                r#"<div class="price-sale-wrap">
<div class="price-old">{}</div>
<div class="price-new-label">SALE PRICE</div>
<div class="price-now">{}</div>
<div class="price-save">Save {saved}</div>
</div>"#,
                format_price(list),
                format_price(sale),
            )
        }
        (Some(list), _) => format!(
            r#"<div class="price-label-line">PRICE</div>
<div class="price-main">{}</div>"#,
            format_price(list)
        ),
        (None, _) => r#"<div class="price-label-line">PRICE</div>
<div class="price-main">Call for price</div>"#
            .to_string(),
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
