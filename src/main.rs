//! CLI entry point for the fleet chart tool.
//!
//! Provides subcommands for turning a finished fleet simulation into chart
//! data and tables, polling the backend for a simulation, and running the
//! grouping, heatmap and colour helpers on their own.

mod infra;
mod services;

use crate::infra::backend::client::FleetBackendClient;
use crate::services::backend_api::wait_for_simulation;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fleet_charts::charts::{
    distribution::trips_by_distance,
    heatmap::normalize_heatmap,
    types::DistributionRow,
    unallocated::unallocated_trips_by_day,
    utility::y_ticks,
};
use fleet_charts::{
    config::ChartConfig,
    drivingbook::{Assignment, filter_trips},
    fetch::{BasicClient, HttpClient, auth::BearerAuth, fetch_bytes},
    output::{print_pretty, write_csv, write_json},
    parser::{parse_location_activity, parse_result_document, parse_vehicles},
    results::convert_simulation_results,
    table::{Order, TripColumn, comparator, stable_sort},
    vehicles::{reduce_duplicate_vehicles, selection_groups},
};
use fleet_charts::charts::colors::sort_shift_labels;
use fleet_charts::drivingbook::Trip;
use serde::Serialize;
use serde_json::json;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "fleet_charts")]
#[command(about = "A tool to turn fleet simulations into chart data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a finished simulation into chart JSON and table CSVs
    Report {
        /// Path to a simulation JSON file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Directory to write the report files to
        #[arg(short, long, default_value = "report")]
        output_dir: String,

        /// Optional chart configuration JSON
        #[arg(short, long)]
        config: Option<String>,

        /// Driving-book column to sort by
        #[arg(long, default_value = "start_time")]
        sort: TripColumn,

        /// Sort direction, `asc` or `desc`
        #[arg(long, default_value = "asc")]
        order: Order,

        /// Only keep driving-book rows containing this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Poll the backend until a fleet simulation finishes and save it
    Fetch {
        /// Simulation job id
        #[arg(value_name = "SIMULATION_ID")]
        id: String,

        /// File to write the simulation job JSON to
        #[arg(short, long, default_value = "simulation.json")]
        output: String,

        /// Seconds between polls
        #[arg(long, default_value_t = 5)]
        interval: u64,

        /// Give up after this many polls
        #[arg(long, default_value_t = 120)]
        max_polls: usize,
    },
    /// Group identical vehicles from a vehicle list JSON
    Groups {
        #[arg(value_name = "FILE")]
        file: String,

        /// Optional vehicle list JSON of hypothetical extra vehicles
        #[arg(long)]
        extra: Option<String>,
    },
    /// Fill and date the weekly activity heatmap of each location
    Heatmap {
        #[arg(value_name = "FILE")]
        file: String,
    },
    /// Print the colour assigned to each shift label
    Colors {
        #[arg(value_name = "LABEL", required = true)]
        labels: Vec<String>,

        /// Optional chart configuration JSON
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/fleet_charts.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("fleet_charts.log"));

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
        Commands::Report {
            source,
            output_dir,
            config,
            sort,
            order,
            filter,
        } => {
            let config = ChartConfig::load_or_default(config.as_deref())?;
            report(&source, Path::new(&output_dir), &config, sort, order, filter.as_deref())
                .await?;
        }
        Commands::Fetch {
            id,
            output,
            interval,
            max_polls,
        } => {
            let base_url =
                std::env::var("FLEET_API_URL").context("FLEET_API_URL must be set")?;
            let api = FleetBackendClient::new(&base_url, backend_http()?);

            let job =
                wait_for_simulation(&api, &id, Duration::from_secs(interval), max_polls).await?;
            write_json(Path::new(&output), &job)?;
            info!(simulation_id = %id, output = %output, "Simulation saved");
        }
        Commands::Groups { file, extra } => {
            let vehicles = parse_vehicles(&std::fs::read(&file)?)?;
            match extra {
                Some(extra) => {
                    let extra = parse_vehicles(&std::fs::read(&extra)?)?;
                    let groups = selection_groups(&vehicles, &extra);
                    info!(vehicles = vehicles.len(), groups = groups.len(), "Vehicles grouped");
                    print_stdout(&groups)?;
                }
                None => {
                    let groups = reduce_duplicate_vehicles(&vehicles);
                    info!(vehicles = vehicles.len(), groups = groups.len(), "Vehicles grouped");
                    print_stdout(&groups)?;
                }
            }
        }
        Commands::Heatmap { file } => {
            let locations = parse_location_activity(&std::fs::read(&file)?)?;
            let rows = normalize_heatmap(&locations)?;
            print_stdout(&rows)?;
        }
        Commands::Colors { labels, config } => {
            let config = ChartConfig::load_or_default(config.as_deref())?;
            let colors = config.shift_colors(&labels);
            for label in sort_shift_labels(&labels) {
                match colors.color_for(&label) {
                    Some(color) => println!("{label}\t{color}"),
                    None => warn!(label = %label, "No colour available"),
                }
            }
        }
    }

    Ok(())
}

/// Plain client, or one sending the identity-provider token when
/// `FLEET_API_TOKEN` is set.
fn backend_http() -> Result<Box<dyn HttpClient>> {
    match std::env::var("FLEET_API_TOKEN") {
        Ok(token) if !token.is_empty() => {
            Ok(Box::new(BearerAuth::new(BasicClient::new(), &token)?))
        }
        _ => Ok(Box::new(BasicClient::new())),
    }
}

/// Loads simulation data from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %url))]
async fn fetcher(url: &str) -> Result<Vec<u8>> {
    let bytes = if url.starts_with("http") {
        let client = backend_http()?;
        fetch_bytes(&client, url).await?
    } else {
        std::fs::read(url).with_context(|| format!("failed to read {url}"))?
    };
    Ok(bytes)
}

fn bar_totals(rows: &[DistributionRow]) -> Vec<u64> {
    rows.iter().map(|row| row.total() as u64).collect()
}

fn print_stdout<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes every chart and table of one simulation to `output_dir`.
#[tracing::instrument(skip(config))]
async fn report(
    source: &str,
    output_dir: &Path,
    config: &ChartConfig,
    sort: TripColumn,
    order: Order,
    filter: Option<&str>,
) -> Result<()> {
    let bytes = fetcher(source).await?;
    let simulation = parse_result_document(&bytes)?;
    let results = convert_simulation_results(&simulation)?;
    print_pretty(&results.fleet_change_totals);

    std::fs::create_dir_all(output_dir)?;

    let trips = &results.driving_book;
    let current = trips_by_distance(trips, Assignment::Current, &config.distance);
    let simulated = trips_by_distance(trips, Assignment::Simulation, &config.distance);

    write_json(&output_dir.join("unallocated_by_day.json"), &[unallocated_trips_by_day(trips)])?;
    write_json(&output_dir.join("distribution_current.json"), &current)?;
    write_json(&output_dir.join("distribution_simulation.json"), &simulated)?;
    write_json(
        &output_dir.join("fleet_changes.json"),
        &json!({
            "vehicles": results.vehicle_differences,
            "totals": results.fleet_change_totals,
        }),
    )?;
    write_json(
        &output_dir.join("summary.json"),
        &json!({
            "unallocated_trips": results.unallocated_trips,
            "total_trips": results.total_trips,
            "current_expense": results.current_expense,
            "simulation_expense": results.simulation_expense,
            "current_emission": results.current_emission,
            "simulation_emission": results.simulation_emission,
            "distribution_y_ticks": {
                "current": y_ticks(&bar_totals(&current), config.max_ticks),
                "simulation": y_ticks(&bar_totals(&simulated), config.max_ticks),
            },
            "simulation_options": results.simulation_options,
        }),
    )?;

    write_csv(&output_dir.join("usage_current.csv"), &results.vehicle_usage.current)?;
    write_csv(&output_dir.join("usage_simulation.csv"), &results.vehicle_usage.simulation)?;

    let filtered = filter_trips(trips, filter.unwrap_or(""));
    let compare = comparator::<Trip>(order, sort);
    let sorted = stable_sort(&filtered, |a, b| compare(*a, *b));
    write_csv(&output_dir.join("driving_book.csv"), sorted)?;

    info!(
        trips = trips.len(),
        written = filtered.len(),
        unallocated = results.unallocated_trips,
        "Report written"
    );
    Ok(())
}
