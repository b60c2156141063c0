//! Data models for the car ownership analyzer.
//!
//! This module contains all the core data structures used throughout
//! the application for representing records, summaries, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::errors::DatasetError;

/// One observation: a province's car ownership statistics for a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Province name (e.g. "DKI Jakarta").
    pub province: String,
    /// Identifier matching the boundary GeoJSON feature id.
    pub province_id: String,
    /// Population in thousands of people.
    pub population_thousands: f64,
    /// Number of registered cars.
    pub car_count: u64,
    /// Registered cars per 1000 inhabitants.
    pub cars_per_1000: f64,
    /// Observation year.
    pub year: u16,
}

/// The full dataset, immutable after construction.
///
/// Construction validates that every (province, year) pair appears exactly
/// once and that every population figure is a finite non-negative number.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Validate and wrap a list of records.
    pub fn new(records: Vec<Record>) -> Result<Self, DatasetError> {
        let mut seen: HashSet<(String, u16)> = HashSet::new();

        for (i, record) in records.iter().enumerate() {
            // Data rows are 1-indexed in error messages (header excluded).
            let row = i + 1;

            if !record.population_thousands.is_finite() || record.population_thousands < 0.0 {
                return Err(DatasetError::InvalidRecord {
                    row,
                    reason: format!(
                        "population_thousands must be finite and non-negative, got {}",
                        record.population_thousands
                    ),
                });
            }

            if !seen.insert((record.province.clone(), record.year)) {
                return Err(DatasetError::DuplicateRecord {
                    province: record.province.clone(),
                    year: record.year,
                });
            }
        }

        Ok(Self { records })
    }

    /// All records, in load order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The distinct years covered, ascending.
    pub fn years(&self) -> Vec<u16> {
        let mut years: Vec<u16> = self.records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// The distinct province names, sorted alphabetically.
    pub fn provinces(&self) -> Vec<String> {
        let mut provinces: Vec<String> =
            self.records.iter().map(|r| r.province.clone()).collect();
        provinces.sort();
        provinces.dedup();
        provinces
    }

    /// Whether any record carries the given year.
    pub fn has_year(&self, year: u16) -> bool {
        self.records.iter().any(|r| r.year == year)
    }

    /// Whether any record carries the given province name.
    pub fn has_province(&self, province: &str) -> bool {
        self.records.iter().any(|r| r.province == province)
    }
}

/// Which provinces a query applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProvinceSelection {
    /// The "All" sentinel: every province in the dataset.
    All,
    /// An explicit list of province names.
    Only(Vec<String>),
}

impl ProvinceSelection {
    /// Build a selection from an optional CLI list (absent means all).
    pub fn from_option(provinces: Option<Vec<String>>) -> Self {
        match provinces {
            Some(list) if !list.is_empty() => ProvinceSelection::Only(list),
            _ => ProvinceSelection::All,
        }
    }
}

impl fmt::Display for ProvinceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvinceSelection::All => write!(f, "All"),
            ProvinceSelection::Only(list) => write!(f, "{}", list.join(", ")),
        }
    }
}

/// Ranking direction for the bar charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Provinces with the highest ratios.
    Highest,
    /// Provinces with the lowest ratios.
    Lowest,
}

/// Countrywide totals and ratio for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalSummary {
    /// Year the summary covers.
    pub year: u16,
    /// Sum of registered cars over all provinces.
    pub total_cars: u64,
    /// Sum of population over all provinces, in thousands.
    pub total_population_thousands: f64,
    /// National cars per 1000 inhabitants.
    pub cars_per_1000: f64,
}

/// One entry of a top/bottom ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProvince {
    /// Province name.
    pub province: String,
    /// Cars per 1000 inhabitants for the ranked year.
    pub cars_per_1000: f64,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the dataset the report was built from.
    pub data_path: String,
    /// Date and time of generation.
    pub generated_at: DateTime<Utc>,
    /// Year the report covers.
    pub year: u16,
    /// Province selection applied to the data table.
    pub selection: ProvinceSelection,
    /// Total records in the dataset.
    pub records_total: usize,
    /// Records matching the year and selection.
    pub records_selected: usize,
}

/// The complete analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// National totals and ratio.
    pub summary: NationalSummary,
    /// The filtered rows shown in the data table.
    pub records: Vec<Record>,
    /// Provinces with the highest ratios, ascending by ratio.
    pub highest: Vec<RankedProvince>,
    /// Provinces with the lowest ratios, ascending by ratio.
    pub lowest: Vec<RankedProvince>,
}
