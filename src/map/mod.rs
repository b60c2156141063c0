//! Province boundary handling.

pub mod choropleth;

pub use choropleth::{enrich_features, export_choropleth};
