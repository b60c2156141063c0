//! Choropleth GeoJSON export.
//!
//! Joins the province boundary features to the dataset by feature id and
//! writes a copy enriched with per-province ratio properties, ready for any
//! choropleth renderer.

use anyhow::{bail, Context, Result};
use geojson::{feature::Id, Feature, FeatureCollection, GeoJson};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

use crate::analysis;
use crate::models::{Dataset, ProvinceSelection, Record};

/// The feature id as a join key, if present.
fn feature_key(feature: &Feature) -> Option<String> {
    match &feature.id {
        Some(Id::String(s)) => Some(s.clone()),
        Some(Id::Number(n)) => Some(n.to_string()),
        None => None,
    }
}

/// Attach `cars_per_1000` (and optionally a `tooltip` string) to every
/// feature with a matching record for `year`. Features without a match are
/// kept untouched and logged. Returns the number of features enriched.
pub fn enrich_features(
    collection: &mut FeatureCollection,
    dataset: &Dataset,
    year: u16,
    tooltip: bool,
) -> Result<usize> {
    let records = analysis::filter(dataset, year, &ProvinceSelection::All)?;
    let by_id: HashMap<&str, &Record> = records
        .iter()
        .map(|r| (r.province_id.as_str(), *r))
        .collect();

    let mut matched = 0;

    for feature in &mut collection.features {
        let Some(key) = feature_key(feature) else {
            warn!("Boundary feature without an id, skipping");
            continue;
        };

        match by_id.get(key.as_str()) {
            Some(record) => {
                feature.set_property("cars_per_1000", record.cars_per_1000);
                if tooltip {
                    feature.set_property(
                        "tooltip",
                        format!("car ratio per 1000 pop : {:.2}", record.cars_per_1000),
                    );
                }
                matched += 1;
            }
            None => {
                warn!("No record for boundary feature '{}' in {}", key, year);
            }
        }
    }

    Ok(matched)
}

/// Read the boundary file, enrich it for `year`, and write the result.
pub fn export_choropleth(
    geojson_path: &Path,
    out_path: &Path,
    dataset: &Dataset,
    year: u16,
    tooltip: bool,
) -> Result<usize> {
    let file = File::open(geojson_path)
        .with_context(|| format!("Failed to open boundary file: {}", geojson_path.display()))?;
    let geojson = GeoJson::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse GeoJSON: {}", geojson_path.display()))?;

    let mut collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        _ => bail!(
            "{} is not a FeatureCollection",
            geojson_path.display()
        ),
    };

    let matched = enrich_features(&mut collection, dataset, year, tooltip)?;
    info!(
        "Matched {} of {} boundary features for {}",
        matched,
        collection.features.len(),
        year
    );

    std::fs::write(out_path, GeoJson::from(collection).to_string())
        .with_context(|| format!("Failed to write map to {}", out_path.display()))?;

    Ok(matched)
}
