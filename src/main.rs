//! CLI entry point for ecotrajet.
//!
//! Provides subcommands for comparing the carbon footprint of transport
//! options between two points, inspecting the mode catalog, and forecasting
//! Vélib' station availability.

mod infra;

use crate::infra::supabase::SupabaseClient;
use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use ecotrajet::carbon::CarbonCalculator;
use ecotrajet::co2::{AliasTable, Co2FactorTable, load_factors};
use ecotrajet::config::load_catalog;
use ecotrajet::distance::GeoPoint;
use ecotrajet::forecast::{TimeOfDayBaseline, forecast_stations};
use ecotrajet::modes::ModeCatalog;
use ecotrajet::output::{TripRecord, append_record, print_json};
use ecotrajet::services::StationDirectory;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ecotrajet")]
#[command(about = "Compare the carbon footprint of urban transport options", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank transport options between two points by eco-score
    Carbon {
        /// Origin as LAT,LNG
        #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
        from: GeoPoint,

        /// Destination as LAT,LNG
        #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
        to: GeoPoint,

        /// JSON file overriding the builtin mode catalog
        #[arg(short, long)]
        catalog: Option<String>,

        /// Skip the remote store and use default CO2 factors
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Optional: CSV file to append a trip summary to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List transport modes with their resolved CO2 factors
    Modes {
        /// JSON file overriding the builtin mode catalog
        #[arg(short, long)]
        catalog: Option<String>,

        /// Skip the remote store and use default CO2 factors
        #[arg(long, default_value_t = false)]
        offline: bool,
    },
    /// Forecast hourly bike availability for Vélib' stations
    Forecast {
        /// Station codes to forecast (all stations if omitted)
        #[arg(short, long = "station", value_name = "CODE")]
        stations: Vec<String>,

        /// Number of hours to predict (1-168)
        #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u32).range(1..=168))]
        hours: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/ecotrajet.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ecotrajet.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Carbon {
            from,
            to,
            catalog,
            offline,
            output,
        } => {
            let (catalog, aliases) = load_catalog(catalog.as_deref())?;
            let factors = resolve_factors(&catalog, &aliases, offline).await?;

            let result = CarbonCalculator::new(&catalog, &factors).calculate(from, to, Utc::now());
            info!(
                straight_line_km = result.straight_line_km,
                best = result.best_eco_option.as_ref().map(|o| o.mode.as_str()),
                "Carbon footprint calculated"
            );
            print_json(&result)?;

            if let Some(path) = output {
                append_record(&path, &TripRecord::from_result(&result))?;
                info!(path, "Trip appended to log");
            }
        }
        Commands::Modes { catalog, offline } => {
            let (catalog, aliases) = load_catalog(catalog.as_deref())?;
            let factors = resolve_factors(&catalog, &aliases, offline).await?;

            for mode in catalog.iter() {
                let resolved = factors.get(&mode.key);
                info!(
                    key = %mode.key,
                    name = %mode.display_name,
                    speed_kmh = mode.speed_kmh,
                    distance_multiplier = mode.distance_multiplier,
                    co2_kg_per_km = resolved.map(|f| f.kg_per_km),
                    origin = ?resolved.map(|f| f.origin),
                    "Mode"
                );
            }

            for (name, kg_per_km) in factors.extras() {
                info!(name, co2_kg_per_km = kg_per_km, "Non-canonical remote mode");
            }

            info!(
                total = catalog.len(),
                remote = factors.remote_count(),
                extras = factors.extras().count(),
                "Mode catalog summary"
            );
        }
        Commands::Forecast { stations, hours } => {
            let client = SupabaseClient::from_env()?
                .context("SUPABASE_URL and SUPABASE_ANON_KEY must be set")?;

            let stations = client.list_stations(&stations).await?;
            if stations.is_empty() {
                warn!("No matching stations found");
            }

            let forecast =
                forecast_stations(&TimeOfDayBaseline, &stations, hours, Local::now().naive_local());
            info!(
                stations = forecast.summary.total_stations,
                high_risk_periods = forecast.summary.high_risk_periods,
                "Availability forecast generated"
            );
            print_json(&forecast)?;
        }
    }

    Ok(())
}

/// Resolves CO2 factors from Supabase, or the catalog defaults when offline
/// or when no credentials are configured.
#[tracing::instrument(skip(catalog, aliases))]
async fn resolve_factors(
    catalog: &ModeCatalog,
    aliases: &AliasTable,
    offline: bool,
) -> Result<Co2FactorTable> {
    if offline {
        info!("Offline mode, using default CO2 factors");
        return Ok(Co2FactorTable::defaults(catalog));
    }

    match SupabaseClient::from_env()? {
        Some(client) => Ok(load_factors(&client, catalog, aliases).await),
        None => {
            warn!("SUPABASE_URL or SUPABASE_ANON_KEY not set, using default CO2 factors");
            Ok(Co2FactorTable::defaults(catalog))
        }
    }
}
