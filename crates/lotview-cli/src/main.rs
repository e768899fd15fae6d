mod inventory;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lotview_core::{PriceRange, QueryState, SortKey};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lotview")]
#[command(about = "Browse a dealership's used-vehicle inventory")]
struct Cli {
    /// Inventory source to read; overrides `LOTVIEW_SOURCE_MODE`
    #[arg(long, global = true, value_enum)]
    source: Option<SourceArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    /// Live JSON endpoint, falling back to the CSV export
    Live,
    /// CSV export only
    Csv,
}

impl SourceArg {
    fn as_env_value(self) -> &'static str {
        match self {
            SourceArg::Live => "live",
            SourceArg::Csv => "csv",
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List vehicles matching the given search and filters
    List(ListArgs),
    /// Show every detail field for one vehicle
    Show {
        /// Stock number, or list position for vehicles without one
        key: String,
        /// Print JSON instead of labelled lines
        #[arg(long)]
        json: bool,
    },
    /// Render the printable poster for one vehicle
    Poster {
        /// Stock number, or list position for vehicles without one
        key: String,
        /// Write the HTML to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Include a script that opens the print dialog on load
        #[arg(long)]
        auto_print: bool,
    },
    /// Show the makes, years and fuel types present in the inventory
    Facets {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Ask the scraper to regenerate its inventory data
    Refresh,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Case-insensitive text matched against year, make, model, trim and stock number
    #[arg(long)]
    search: Option<String>,
    /// Exact make (e.g., Toyota)
    #[arg(long)]
    make: Option<String>,
    /// Exact model year
    #[arg(long)]
    year: Option<i32>,
    /// Exact fuel type (e.g., Gasoline, Hybrid)
    #[arg(long)]
    fuel_type: Option<String>,
    /// Price bucket: under-30k, 30k-50k, 50k-70k, over-70k
    #[arg(long)]
    price_range: Option<PriceRange>,
    /// Sort order: year-desc, year-asc, price-desc, price-asc, make-asc, mileage-asc
    #[arg(long, default_value = "year-desc")]
    sort: SortKey,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl ListArgs {
    fn query(&self) -> QueryState {
        QueryState {
            search: self.search.clone().unwrap_or_default(),
            make: self.make.clone().unwrap_or_default(),
            year: self.year.map(|y| y.to_string()).unwrap_or_default(),
            fuel_type: self.fuel_type.clone().unwrap_or_default(),
            price_range: self.price_range.unwrap_or_default(),
            sort: self.sort,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides: Vec<(&str, String)> = cli
        .source
        .map(|s| ("LOTVIEW_SOURCE_MODE", s.as_env_value().to_string()))
        .into_iter()
        .collect();
    let config = lotview_core::load_app_config_with_overrides(&overrides)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::List(args) => inventory::run_list(&config, &args.query(), args.json).await,
        Commands::Show { key, json } => inventory::run_show(&config, &key, json).await,
        Commands::Poster {
            key,
            out,
            auto_print,
        } => inventory::run_poster(&config, &key, out.as_deref(), auto_print).await,
        Commands::Facets { json } => inventory::run_facets(&config, json).await,
        Commands::Refresh => inventory::run_refresh(&config).await,
    }
}
