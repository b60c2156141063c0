//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Carstat - car ownership-to-population ratio analyzer
///
/// Analyze per-province car ownership statistics for Indonesia
/// (2019-2021): national summary, filtered data table, top/bottom
/// rankings, and an optional choropleth GeoJSON export.
///
/// Examples:
///   carstat --year 2021
///   carstat --year 2020 --provinces "Bali,DKI Jakarta" --format json
///   carstat --geojson indonesia-prov.geojson --export-map map.geojson
///   carstat --list
///   carstat --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the CSV dataset
    ///
    /// Defaults to the configured path (data/car_ownership.csv).
    #[arg(short, long, value_name = "FILE", env = "CARSTAT_DATA")]
    pub data: Option<PathBuf>,

    /// Year to analyze
    #[arg(short, long, default_value = "2021", value_name = "YEAR")]
    pub year: u16,

    /// Provinces to include in the data table (comma-separated)
    ///
    /// Omitted means all provinces; names must match the dataset exactly.
    #[arg(short, long, value_name = "NAMES", value_delimiter = ',')]
    pub provinces: Option<Vec<String>>,

    /// Ranking size for the highest/lowest bar charts
    #[arg(short, long, value_name = "N")]
    pub top: Option<usize>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to the province boundary GeoJSON
    #[arg(long, value_name = "FILE")]
    pub geojson: Option<PathBuf>,

    /// Write a choropleth-ready GeoJSON enriched with ratios
    ///
    /// Requires a boundary file via --geojson or the config file.
    #[arg(long, value_name = "FILE")]
    pub export_map: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .carstat.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List available years and provinces, then exit
    #[arg(short, long)]
    pub list: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .carstat.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(top) = self.top {
            if top == 0 {
                return Err("Ranking size must be at least 1".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref data) = self.data {
            if !data.exists() {
                return Err(format!("Dataset file does not exist: {}", data.display()));
            }
        }

        if let Some(ref provinces) = self.provinces {
            if provinces.iter().any(|p| p.trim().is_empty()) {
                return Err("Province names must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
