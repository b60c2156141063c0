//! Markdown report generation.
//!
//! This module generates the analysis report from the aggregation results:
//! national summary, filtered data table, and the highest/lowest ranking
//! bar charts.

use anyhow::Result;
use std::fmt::Write as _;

use crate::models::{RankedProvince, Record, Report, ReportMetadata};

/// Width of the ranking bars, in characters.
const BAR_WIDTH: usize = 40;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Car Ownership-Population Ratio Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(report));

    if !report.records.is_empty() {
        output.push_str(&generate_table_section(&report.records));
    }

    output.push_str(&generate_ranking_section(
        &format!("Provinces with highest ratio in {}", report.summary.year),
        &report.highest,
    ));
    output.push_str(&generate_ranking_section(
        &format!("Provinces with lowest ratio in {}", report.summary.year),
        &report.lowest,
    ));

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    let _ = writeln!(section, "- **Dataset:** `{}`", metadata.data_path);
    let _ = writeln!(
        section,
        "- **Generated:** {}",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(section, "- **Year:** {}", metadata.year);
    let _ = writeln!(section, "- **Provinces:** {}", metadata.selection);
    let _ = writeln!(
        section,
        "- **Records:** {} selected of {} total",
        metadata.records_selected, metadata.records_total
    );
    section.push('\n');

    section
}

/// Generate the national summary section.
fn generate_summary_section(report: &Report) -> String {
    let summary = &report.summary;
    let mut section = String::new();

    let _ = writeln!(section, "## National summary for {}\n", summary.year);
    let _ = writeln!(section, "| Cars | Population | Cars per 1000 people |");
    section.push_str("|:---:|:---:|:---:|\n");
    let _ = writeln!(
        section,
        "| {} | {}000 | {:.2} |",
        summary.total_cars, summary.total_population_thousands, summary.cars_per_1000
    );
    section.push('\n');

    section
}

/// Generate the filtered data table.
fn generate_table_section(records: &[Record]) -> String {
    let mut section = String::new();

    section.push_str("## Data summary\n\n");
    section.push_str("| Province | Population (in thousands) | Cars per 1000 people |\n");
    section.push_str("|:---|---:|---:|\n");

    for record in records {
        let _ = writeln!(
            section,
            "| {} | {} | {:.2} |",
            record.province, record.population_thousands, record.cars_per_1000
        );
    }
    section.push('\n');

    section
}

/// Generate one ranking section as a horizontal bar chart.
///
/// Entries come in ascending ratio order; bars are scaled to the largest
/// ratio in the chart.
fn generate_ranking_section(title: &str, entries: &[RankedProvince]) -> String {
    let mut section = String::new();

    let _ = writeln!(section, "## {}\n", title);

    if entries.is_empty() {
        section.push_str("No records for this year.\n\n");
        return section;
    }

    let max_ratio = entries
        .iter()
        .map(|e| e.cars_per_1000)
        .fold(0.0_f64, f64::max);
    let name_width = entries
        .iter()
        .map(|e| e.province.chars().count())
        .max()
        .unwrap_or(0);

    section.push_str("```text\n");
    for entry in entries {
        let _ = writeln!(
            section,
            "{:<name_width$}  {} {:.2}",
            entry.province,
            bar(entry.cars_per_1000, max_ratio),
            entry.cars_per_1000
        );
    }
    section.push_str("```\n\n");

    section
}

/// A horizontal bar proportional to `value / max`, at least one cell wide
/// for any positive value.
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let cells = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(cells.max(1))
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
