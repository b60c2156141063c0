//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.carstat.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dataset settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Map export settings.
    #[serde(default)]
    pub map: MapConfig,
}

/// Dataset input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the CSV dataset.
    #[serde(default = "default_data_path")]
    pub path: String,

    /// Path to the province boundary GeoJSON.
    #[serde(default)]
    pub geojson: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            geojson: None,
        }
    }
}

fn default_data_path() -> String {
    "data/car_ownership.csv".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default report output path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Ranking size for the bar charts.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Include the filtered data table in the report.
    #[serde(default = "default_true")]
    pub include_table: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            top_n: default_top_n(),
            include_table: true,
        }
    }
}

fn default_output() -> String {
    "carstat_report.md".to_string()
}

fn default_top_n() -> usize {
    5
}

fn default_true() -> bool {
    true
}

/// Choropleth export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Where to write the enriched GeoJSON.
    #[serde(default)]
    pub export: Option<String>,

    /// Attach the per-feature tooltip string.
    #[serde(default = "default_true")]
    pub tooltip: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            export: None,
            tooltip: true,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".carstat.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings;
    /// optional flags only override when explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.data.path = data.display().to_string();
        }
        if let Some(ref geojson) = args.geojson {
            self.data.geojson = Some(geojson.display().to_string());
        }
        if let Some(ref output) = args.output {
            self.report.output = output.display().to_string();
        }
        if let Some(top) = args.top {
            self.report.top_n = top;
        }
        if let Some(ref export) = args.export_map {
            self.map.export = Some(export.display().to_string());
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.path, "data/car_ownership.csv");
        assert_eq!(config.report.top_n, 5);
        assert!(config.report.include_table);
        assert!(config.map.tooltip);
        assert!(config.map.export.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[data]
path = "stats/provinces.csv"
geojson = "stats/indonesia-prov.geojson"

[report]
output = "custom_report.md"
top_n = 10

[map]
export = "out/map.geojson"
tooltip = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.data.path, "stats/provinces.csv");
        assert_eq!(
            config.data.geojson.as_deref(),
            Some("stats/indonesia-prov.geojson")
        );
        assert_eq!(config.report.output, "custom_report.md");
        assert_eq!(config.report.top_n, 10);
        assert_eq!(config.map.export.as_deref(), Some("out/map.geojson"));
        assert!(!config.map.tooltip);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[report]\ntop_n = 3\n").unwrap();
        assert_eq!(config.report.top_n, 3);
        assert_eq!(config.report.output, "carstat_report.md");
        assert_eq!(config.data.path, "data/car_ownership.csv");
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[data]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[map]"));
    }
}
