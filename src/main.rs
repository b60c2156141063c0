//! Carstat - Car Ownership-Population Ratio Analyzer
//!
//! A CLI tool that aggregates per-province car ownership statistics
//! for Indonesia (2019-2021) into Markdown/JSON reports and
//! choropleth-ready GeoJSON exports.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad input, missing files, invalid selection)

mod analysis;
mod cli;
mod config;
mod data;
mod errors;
mod map;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use models::{Direction, ProvinceSelection, Report, ReportMetadata};
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // Initialize logging
    init_logging(&args);

    info!("Carstat v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_analysis(args) {
        error!("Analysis failed: {}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: generate a default .carstat.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(".carstat.toml");

    if path.exists() {
        eprintln!("⚠️  .carstat.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .carstat.toml")?;

    println!("✅ Created .carstat.toml with default settings.");
    println!("   Edit it to customize dataset paths, ranking size, and map export.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete analysis workflow.
fn run_analysis(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // A map export needs a boundary file; the config may supply it, so
    // this is checked after the merge rather than in Args::validate.
    if config.map.export.is_some() && config.data.geojson.is_none() {
        anyhow::bail!(
            "map export requested but no boundary file given; \
             pass --geojson or set data.geojson in .carstat.toml"
        );
    }

    let data_path = Path::new(&config.data.path).to_path_buf();

    // Step 1: Load the dataset
    println!("📥 Loading dataset: {}", data_path.display());
    let dataset = data::load_dataset(&data_path)?;
    info!(
        "Dataset: {} records, years {:?}, {} provinces",
        dataset.len(),
        dataset.years(),
        dataset.provinces().len()
    );

    // Handle --list: show what the dataset offers and exit
    if args.list {
        return handle_list(&dataset);
    }

    let year = args.year;
    let selection = ProvinceSelection::from_option(args.provinces.clone());

    // Step 2: Aggregate
    println!("🔢 Aggregating year {} ({})...", year, selection);
    let summary = analysis::national_summary(&dataset, year)?;
    let filtered = analysis::filter(&dataset, year, &selection)?;
    let highest = analysis::rank(&dataset, year, config.report.top_n, Direction::Highest)?;
    let lowest = analysis::rank(&dataset, year, config.report.top_n, Direction::Lowest)?;

    // Step 3: Build the report
    let metadata = ReportMetadata {
        data_path: config.data.path.clone(),
        generated_at: Utc::now(),
        year,
        selection: selection.clone(),
        records_total: dataset.len(),
        records_selected: filtered.len(),
    };

    let records = if config.report.include_table {
        filtered.into_iter().cloned().collect()
    } else {
        Vec::new()
    };

    let report = Report {
        metadata,
        summary: summary.clone(),
        records,
        highest,
        lowest,
    };

    // Step 4: Generate and save the report
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    std::fs::write(&config.report.output, &output)
        .with_context(|| format!("Failed to write report to {}", config.report.output))?;

    // Step 5: Export the choropleth map if requested
    if let (Some(export), Some(geojson)) = (&config.map.export, &config.data.geojson) {
        println!("🗺️  Exporting choropleth map: {}", export);
        let matched = map::export_choropleth(
            Path::new(geojson),
            Path::new(export),
            &dataset,
            year,
            config.map.tooltip,
        )?;
        println!("   Matched {} boundary features", matched);
    }

    // Print summary
    println!("\n📊 National summary for {}:", year);
    println!("   Cars: {}", summary.total_cars);
    println!(
        "   Population: {:.0} thousand people",
        summary.total_population_thousands
    );
    println!("   Ratio: {:.2} cars per 1000 people", summary.cars_per_1000);
    println!(
        "\n✅ Analysis complete! Report saved to: {}",
        config.report.output
    );

    Ok(())
}

/// Handle --list: print available years and provinces, exit.
fn handle_list(dataset: &models::Dataset) -> Result<()> {
    println!("\n📅 Years: {:?}", dataset.years());
    println!("\n🗂️  Provinces ({}):", dataset.provinces().len());
    for province in dataset.provinces() {
        println!("   {}", province);
    }
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .carstat.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
