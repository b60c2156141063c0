//! CSV dataset loading.
//!
//! Reads the per-province statistics file and validates it into an
//! immutable [`Dataset`]. Expected headers: `province`, `province_id`,
//! `population_thousands`, `car_count`, `year`, and optionally
//! `cars_per_1000` (derived from the other columns when absent).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::errors::DatasetError;
use crate::models::{Dataset, Record};

/// Raw CSV row. `cars_per_1000` is optional in the file.
#[derive(Debug, Deserialize)]
struct CsvRow {
    province: String,
    province_id: String,
    population_thousands: f64,
    car_count: u64,
    #[serde(default)]
    cars_per_1000: Option<f64>,
    year: u16,
}

impl CsvRow {
    /// Convert to a [`Record`], deriving the ratio when the file omits it.
    ///
    /// `row` is the 1-indexed data row, used in error messages.
    fn into_record(self, row: usize) -> Result<Record, DatasetError> {
        let cars_per_1000 = match self.cars_per_1000 {
            Some(ratio) => ratio,
            None => {
                if self.population_thousands <= 0.0 {
                    return Err(DatasetError::InvalidRecord {
                        row,
                        reason: format!(
                            "cannot derive cars_per_1000 for '{}': population_thousands is {}",
                            self.province, self.population_thousands
                        ),
                    });
                }
                self.car_count as f64 / self.population_thousands
            }
        };

        Ok(Record {
            province: self.province,
            province_id: self.province_id,
            population_thousands: self.population_thousands,
            car_count: self.car_count,
            cars_per_1000,
            year: self.year,
        })
    }
}

/// Load and validate the dataset at `path`.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset: {}", path.display()))?;

    let mut reader = csv::Reader::from_reader(file);
    let mut records = Vec::new();

    for (i, result) in reader.deserialize().enumerate() {
        let row = i + 1;
        let raw: CsvRow = result
            .with_context(|| format!("Failed to parse data row {} of {}", row, path.display()))?;
        records.push(raw.into_record(row)?);
    }

    debug!("Loaded {} records from {}", records.len(), path.display());

    Dataset::new(records)
        .with_context(|| format!("Invalid dataset: {}", path.display()))
}
