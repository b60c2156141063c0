//! Filtering, national totals, and province rankings.
//!
//! All operations are pure reads over an immutable [`Dataset`]. Unknown
//! years and provinces surface as typed errors instead of silently
//! producing empty output.

use crate::errors::AggregateError;
use crate::models::{Dataset, Direction, NationalSummary, ProvinceSelection, RankedProvince, Record};

/// Check that `year` appears in the dataset.
fn ensure_year(dataset: &Dataset, year: u16) -> Result<(), AggregateError> {
    if dataset.has_year(year) {
        Ok(())
    } else {
        Err(AggregateError::InvalidYear {
            year,
            known: dataset.years(),
        })
    }
}

/// All records for `year` whose province is in `selection`.
///
/// `ProvinceSelection::All` matches every province. Result preserves
/// dataset order.
pub fn filter<'a>(
    dataset: &'a Dataset,
    year: u16,
    selection: &ProvinceSelection,
) -> Result<Vec<&'a Record>, AggregateError> {
    ensure_year(dataset, year)?;

    if let ProvinceSelection::Only(provinces) = selection {
        for province in provinces {
            if !dataset.has_province(province) {
                return Err(AggregateError::UnknownProvince(province.clone()));
            }
        }
    }

    let records = dataset
        .records()
        .iter()
        .filter(|r| r.year == year)
        .filter(|r| match selection {
            ProvinceSelection::All => true,
            ProvinceSelection::Only(provinces) => provinces.iter().any(|p| p == &r.province),
        })
        .collect();

    Ok(records)
}

/// National totals and cars-per-1000 ratio for `year`.
pub fn national_summary(dataset: &Dataset, year: u16) -> Result<NationalSummary, AggregateError> {
    ensure_year(dataset, year)?;

    let mut total_cars: u64 = 0;
    let mut total_population_thousands: f64 = 0.0;

    for record in dataset.records().iter().filter(|r| r.year == year) {
        total_cars += record.car_count;
        total_population_thousands += record.population_thousands;
    }

    if total_population_thousands == 0.0 {
        return Err(AggregateError::EmptyPopulation { year });
    }

    Ok(NationalSummary {
        year,
        total_cars,
        total_population_thousands,
        cars_per_1000: total_cars as f64 / total_population_thousands,
    })
}

/// The `n` provinces with the highest or lowest ratio for `year`.
///
/// Ties keep dataset order (stable sort). The result is ordered ascending
/// by ratio regardless of direction, which is how the bar charts display
/// both rankings. Fewer than `n` records for the year returns them all.
pub fn rank(
    dataset: &Dataset,
    year: u16,
    n: usize,
    direction: Direction,
) -> Result<Vec<RankedProvince>, AggregateError> {
    ensure_year(dataset, year)?;

    let mut records: Vec<&Record> = dataset.records().iter().filter(|r| r.year == year).collect();
    records.sort_by(|a, b| {
        a.cars_per_1000
            .partial_cmp(&b.cars_per_1000)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let selected: &[&Record] = match direction {
        Direction::Lowest => &records[..n.min(records.len())],
        Direction::Highest => &records[records.len().saturating_sub(n)..],
    };

    Ok(selected
        .iter()
        .map(|r| RankedProvince {
            province: r.province.clone(),
            cars_per_1000: r.cars_per_1000,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(province: &str, pop: f64, cars: u64, year: u16) -> Record {
        Record {
            province: province.to_string(),
            province_id: format!("ID-{}", &province[..2].to_uppercase()),
            population_thousands: pop,
            car_count: cars,
            cars_per_1000: if pop > 0.0 { cars as f64 / pop } else { 0.0 },
            year,
        }
    }

    fn seven_province_dataset() -> Dataset {
        // Ratios for 2021: Aceh 28.3, Bali 102.6, Jakarta 318.6,
        // Jambi 40.0, Papua 20.0, Riau 55.0, Maluku 15.0.
        Dataset::new(vec![
            record("Aceh", 5300.0, 150_000, 2021),
            record("Bali", 4317.0, 442_881, 2021),
            record("DKI Jakarta", 10562.0, 3_365_467, 2021),
            record("Jambi", 3600.0, 144_000, 2021),
            record("Papua", 4300.0, 86_000, 2021),
            record("Riau", 6400.0, 352_000, 2021),
            record("Maluku", 1860.0, 27_900, 2021),
            record("Aceh", 5270.0, 140_000, 2020),
            record("Bali", 4290.0, 430_000, 2020),
        ])
        .unwrap()
    }

    #[test]
    fn test_filter_all_matches_year_only() {
        let dataset = seven_province_dataset();
        let rows = filter(&dataset, 2021, &ProvinceSelection::All).unwrap();

        assert_eq!(rows.len(), 7);
        assert!(rows.iter().all(|r| r.year == 2021));
        // Dataset order is preserved.
        assert_eq!(rows[0].province, "Aceh");
        assert_eq!(rows[2].province, "DKI Jakarta");
    }

    #[test]
    fn test_filter_explicit_provinces() {
        let dataset = seven_province_dataset();
        let selection =
            ProvinceSelection::Only(vec!["Bali".to_string(), "Papua".to_string()]);
        let rows = filter(&dataset, 2021, &selection).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].province, "Bali");
        assert_eq!(rows[1].province, "Papua");
    }

    #[test]
    fn test_filter_all_equals_full_explicit_list() {
        let dataset = seven_province_dataset();
        let all = filter(&dataset, 2021, &ProvinceSelection::All).unwrap();
        let explicit = filter(
            &dataset,
            2021,
            &ProvinceSelection::Only(dataset.provinces()),
        )
        .unwrap();

        assert_eq!(all.len(), explicit.len());
    }

    #[test]
    fn test_filter_unknown_year() {
        let dataset = seven_province_dataset();
        let err = filter(&dataset, 2019, &ProvinceSelection::All).unwrap_err();

        assert_eq!(
            err,
            AggregateError::InvalidYear {
                year: 2019,
                known: vec![2020, 2021],
            }
        );
    }

    #[test]
    fn test_filter_unknown_province() {
        let dataset = seven_province_dataset();
        let selection = ProvinceSelection::Only(vec!["Atlantis".to_string()]);
        let err = filter(&dataset, 2021, &selection).unwrap_err();

        assert_eq!(err, AggregateError::UnknownProvince("Atlantis".to_string()));
    }

    #[test]
    fn test_national_summary_sums_and_ratio() {
        // Worked example: {(A,2021,1000,50),(B,2021,2000,80)} -> (130, 3000, 0.0433).
        let dataset = Dataset::new(vec![
            record("Alpha", 1000.0, 50, 2021),
            record("Beta", 2000.0, 80, 2021),
        ])
        .unwrap();

        let summary = national_summary(&dataset, 2021).unwrap();
        assert_eq!(summary.total_cars, 130);
        assert!((summary.total_population_thousands - 3000.0).abs() < 1e-9);
        assert!((summary.cars_per_1000 - 130.0 / 3000.0).abs() < 1e-9);
    }

    #[test]
    fn test_national_summary_ignores_other_years() {
        let dataset = seven_province_dataset();
        let summary = national_summary(&dataset, 2020).unwrap();

        assert_eq!(summary.total_cars, 140_000 + 430_000);
        assert!((summary.total_population_thousands - (5270.0 + 4290.0)).abs() < 1e-9);
    }

    #[test]
    fn test_national_summary_zero_population() {
        let dataset = Dataset::new(vec![Record {
            province: "Nowhere".to_string(),
            province_id: "ID-XX".to_string(),
            population_thousands: 0.0,
            car_count: 100,
            cars_per_1000: 0.0,
            year: 2021,
        }])
        .unwrap();

        let err = national_summary(&dataset, 2021).unwrap_err();
        assert_eq!(err, AggregateError::EmptyPopulation { year: 2021 });
    }

    #[test]
    fn test_rank_highest_is_ascending() {
        let dataset = seven_province_dataset();
        let top = rank(&dataset, 2021, 5, Direction::Highest).unwrap();

        assert_eq!(top.len(), 5);
        // Ascending: Aceh, Jambi, Riau, Bali, DKI Jakarta.
        let names: Vec<&str> = top.iter().map(|r| r.province.as_str()).collect();
        assert_eq!(names, vec!["Aceh", "Jambi", "Riau", "Bali", "DKI Jakarta"]);
        assert!(top.windows(2).all(|w| w[0].cars_per_1000 <= w[1].cars_per_1000));
    }

    #[test]
    fn test_rank_lowest_is_ascending() {
        let dataset = seven_province_dataset();
        let bottom = rank(&dataset, 2021, 5, Direction::Lowest).unwrap();

        assert_eq!(bottom.len(), 5);
        let names: Vec<&str> = bottom.iter().map(|r| r.province.as_str()).collect();
        assert_eq!(names, vec!["Maluku", "Papua", "Aceh", "Jambi", "Riau"]);
    }

    #[test]
    fn test_rank_highest_beats_everything_not_selected() {
        let dataset = seven_province_dataset();
        let top = rank(&dataset, 2021, 5, Direction::Highest).unwrap();
        let selected: Vec<&str> = top.iter().map(|r| r.province.as_str()).collect();

        let min_selected = top
            .iter()
            .map(|r| r.cars_per_1000)
            .fold(f64::INFINITY, f64::min);

        for record in dataset.records().iter().filter(|r| r.year == 2021) {
            if !selected.contains(&record.province.as_str()) {
                assert!(record.cars_per_1000 <= min_selected);
            }
        }
    }

    #[test]
    fn test_rank_with_fewer_records_than_n() {
        let dataset = seven_province_dataset();
        let top = rank(&dataset, 2020, 5, Direction::Highest).unwrap();

        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_rank_ties_keep_dataset_order() {
        let dataset = Dataset::new(vec![
            record("First", 1000.0, 50_000, 2021),
            record("Second", 2000.0, 100_000, 2021),
            record("Third", 1000.0, 10_000, 2021),
        ])
        .unwrap();

        // First and Second both sit at 50.0; stable sort keeps First ahead.
        let bottom = rank(&dataset, 2021, 3, Direction::Lowest).unwrap();
        let names: Vec<&str> = bottom.iter().map(|r| r.province.as_str()).collect();
        assert_eq!(names, vec!["Third", "First", "Second"]);
    }

    #[test]
    fn test_rank_unknown_year() {
        let dataset = seven_province_dataset();
        assert!(rank(&dataset, 1999, 5, Direction::Highest).is_err());
    }
}
