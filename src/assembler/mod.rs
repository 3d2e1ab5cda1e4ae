//! State time-series assembly.
//!
//! Turns one state's validated records into per-sector tables aligned on
//! the common 1960–2017 year index. Alignment is by year key: a series that
//! runs to 2018 loses its 2018 point, and anything that leaves a year of the
//! index uncovered is rejected rather than padded.

use crate::error::{AssemblyErrorKind, Result, SedsError};
use crate::model::{
    year_index, AnnualSeries, Column, SectorTable, SeriesRecord, StateProfile, TOTAL_ALL_SECTORS,
    YEAR_COUNT,
};
use indexmap::IndexMap;

/// Accepted series lengths: the full index, or the index plus one extra year.
const ACCEPTED_LENGTHS: [usize; 2] = [YEAR_COUNT, YEAR_COUNT + 1];

/// Build the table for one sector of one state.
///
/// Sector records for `sector` become one column each, keyed by energy type.
/// Population, when present, is attached to every sector. A sector with no
/// records degrades to an unreported table whose totals are all zero.
pub fn assemble_sector_table(
    state: &str,
    records: &[SeriesRecord],
    sector: &str,
) -> Result<SectorTable> {
    let mut columns: IndexMap<Column, Vec<f64>> = IndexMap::new();
    let mut reported = false;

    for record in records {
        let column = match record {
            SeriesRecord::Sector {
                sector: record_sector,
                energy_type,
                ..
            } if record_sector == sector => {
                reported = true;
                Column::Energy(energy_type.clone())
            }
            SeriesRecord::Population { .. } => Column::Population,
            _ => continue,
        };

        let values = align(state, &column, record.series())?;
        if columns.insert(column.clone(), values).is_some() {
            tracing::warn!(
                state,
                sector,
                column = %column,
                "Duplicate series; keeping the later one"
            );
        }
    }

    if !reported {
        tracing::warn!(state, sector, "Sector not reported; using zero totals");
    }

    Ok(SectorTable::from_columns(sector, reported, columns))
}

/// Build every sector table for one state.
///
/// Sectors appear in first-seen order. "Total All Sectors" is always
/// assembled, reported or not.
pub fn assemble_state_profile(state: &str, records: &[SeriesRecord]) -> Result<StateProfile> {
    let mut sector_names: Vec<&str> = Vec::new();
    for sector in records.iter().filter_map(SeriesRecord::sector) {
        if !sector_names.contains(&sector) {
            sector_names.push(sector);
        }
    }
    if !sector_names.contains(&TOTAL_ALL_SECTORS) {
        sector_names.push(TOTAL_ALL_SECTORS);
    }

    let mut sectors = IndexMap::with_capacity(sector_names.len());
    for sector in sector_names {
        let table = assemble_sector_table(state, records, sector)?;
        sectors.insert(sector.to_string(), table);
    }

    tracing::debug!(state, sectors = sectors.len(), "Assembled state profile");
    Ok(StateProfile {
        state: state.to_string(),
        sectors,
    })
}

/// Align one series onto the year index.
fn align(state: &str, column: &Column, series: &AnnualSeries) -> Result<Vec<f64>> {
    let len = series.len();
    if !ACCEPTED_LENGTHS.contains(&len) {
        return Err(SedsError::assembly(
            state,
            format!("aligning {column}"),
            AssemblyErrorKind::SeriesLengthMismatch {
                column: column.to_string(),
                len,
                expected: ACCEPTED_LENGTHS[0],
                expected_with_extra: ACCEPTED_LENGTHS[1],
            },
        ));
    }

    year_index()
        .map(|year| {
            series.value(year).ok_or_else(|| {
                SedsError::assembly(
                    state,
                    format!("aligning {column}"),
                    AssemblyErrorKind::YearCoverage {
                        column: column.to_string(),
                        year,
                    },
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnergySource, EnergyType, FIRST_YEAR, LAST_YEAR};

    fn series(first_year: i32, len: usize, f: impl Fn(usize) -> f64) -> AnnualSeries {
        let values: Vec<f64> = (0..len).map(f).collect();
        AnnualSeries::from_values(first_year, &values).expect("valid series")
    }

    fn sector_record(sector: &str, energy_type: EnergyType, series: AnnualSeries) -> SeriesRecord {
        SeriesRecord::Sector {
            state: "Ohio".to_string(),
            sector: sector.to_string(),
            energy_type,
            units: "Billion Btu".to_string(),
            series,
        }
    }

    fn population(series: AnnualSeries) -> SeriesRecord {
        SeriesRecord::Population {
            state: "Ohio".to_string(),
            units: "Thousand".to_string(),
            series,
        }
    }

    fn fixture() -> Vec<SeriesRecord> {
        vec![
            sector_record(
                TOTAL_ALL_SECTORS,
                EnergyType::Coal,
                series(FIRST_YEAR, YEAR_COUNT, |i| 100.0 + i as f64),
            ),
            sector_record(
                TOTAL_ALL_SECTORS,
                EnergyType::NaturalGas,
                series(FIRST_YEAR, YEAR_COUNT + 1, |i| 50.0 + i as f64),
            ),
            sector_record(
                TOTAL_ALL_SECTORS,
                EnergyType::WindEnergy,
                series(FIRST_YEAR, YEAR_COUNT, |i| i as f64 * 0.5),
            ),
            sector_record(
                TOTAL_ALL_SECTORS,
                EnergyType::Other("Wood and Waste".to_string()),
                series(FIRST_YEAR, YEAR_COUNT, |_| 999.0),
            ),
            sector_record(
                "Commercial Sector",
                EnergyType::Biomass,
                series(FIRST_YEAR, YEAR_COUNT, |_| 3.0),
            ),
            population(series(FIRST_YEAR, YEAR_COUNT, |i| 10_000.0 + i as f64)),
        ]
    }

    #[test]
    fn test_totals_equal_sum_of_present_columns() {
        let table = assemble_sector_table("Ohio", &fixture(), TOTAL_ALL_SECTORS).expect("table");
        assert!(table.is_reported());

        let coal = table.energy_column(&EnergyType::Coal).expect("coal");
        let gas = table.energy_column(&EnergyType::NaturalGas).expect("gas");
        let wind = table.energy_column(&EnergyType::WindEnergy).expect("wind");
        for i in 0..YEAR_COUNT {
            assert_eq!(table.nonrenewable_total()[i], coal[i] + gas[i]);
            assert_eq!(table.renewable_total()[i], wind[i]);
        }
        assert_eq!(table.total(EnergySource::Renewable), table.renewable_total());
    }

    #[test]
    fn test_population_attached_to_every_sector() {
        let profile = assemble_state_profile("Ohio", &fixture()).expect("profile");
        for table in profile.sectors.values() {
            assert!(table.column(&Column::Population).is_some());
        }
    }

    #[test]
    fn test_extra_2018_point_is_dropped() {
        let records = vec![sector_record(
            TOTAL_ALL_SECTORS,
            EnergyType::Coal,
            series(FIRST_YEAR, YEAR_COUNT + 1, |i| i as f64),
        )];
        let table = assemble_sector_table("Ohio", &records, TOTAL_ALL_SECTORS).expect("table");
        let coal = table.energy_column(&EnergyType::Coal).expect("coal");
        assert_eq!(coal.len(), YEAR_COUNT);
        assert_eq!(coal[0], 0.0);
        // 2017 keeps its own value; 2018 (index 58) is gone
        assert_eq!(coal[YEAR_COUNT - 1], (YEAR_COUNT - 1) as f64);
    }

    #[test]
    fn test_wrong_lengths_rejected() {
        for len in [YEAR_COUNT - 1, YEAR_COUNT + 2] {
            let records = vec![sector_record(
                TOTAL_ALL_SECTORS,
                EnergyType::Coal,
                series(FIRST_YEAR, len, |_| 1.0),
            )];
            let err = assemble_sector_table("Ohio", &records, TOTAL_ALL_SECTORS).unwrap_err();
            assert!(
                matches!(
                    err,
                    SedsError::Assembly {
                        source: AssemblyErrorKind::SeriesLengthMismatch { len: l, .. },
                        ..
                    } if l == len
                ),
                "{err}"
            );
            assert_eq!(err.state(), Some("Ohio"));
        }
    }

    #[test]
    fn test_shifted_series_fails_year_coverage() {
        // 58 points, but running 1961-2018: 1960 is missing
        let records = vec![sector_record(
            TOTAL_ALL_SECTORS,
            EnergyType::Coal,
            series(FIRST_YEAR + 1, YEAR_COUNT, |_| 1.0),
        )];
        let err = assemble_sector_table("Ohio", &records, TOTAL_ALL_SECTORS).unwrap_err();
        assert!(matches!(
            err,
            SedsError::Assembly {
                source: AssemblyErrorKind::YearCoverage { year: FIRST_YEAR, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_missing_sector_degrades_to_zero_table() {
        let records = vec![population(series(FIRST_YEAR, YEAR_COUNT, |_| 5.0))];
        let table =
            assemble_sector_table("Ohio", &records, "Transportation Sector").expect("table");
        assert!(!table.is_reported());
        assert!(table.renewable_total().iter().all(|&v| v == 0.0));
        assert!(table.nonrenewable_total().iter().all(|&v| v == 0.0));
        assert!(table.column(&Column::Population).is_some());
    }

    #[test]
    fn test_sector_without_known_types_has_zero_totals() {
        let records = vec![sector_record(
            "Industrial Sector",
            EnergyType::Other("Wood and Waste".to_string()),
            series(FIRST_YEAR, YEAR_COUNT, |_| 7.0),
        )];
        let table = assemble_sector_table("Ohio", &records, "Industrial Sector").expect("table");
        assert!(table.is_reported());
        assert!(table.renewable_total().iter().all(|&v| v == 0.0));
        assert!(table.nonrenewable_total().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let records = fixture();
        let first = assemble_state_profile("Ohio", &records).expect("first");
        let second = assemble_state_profile("Ohio", &records).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn test_profile_sector_order_and_total_always_present() {
        let records = vec![sector_record(
            "Residential Sector",
            EnergyType::Coal,
            series(FIRST_YEAR, YEAR_COUNT, |_| 1.0),
        )];
        let profile = assemble_state_profile("Ohio", &records).expect("profile");
        let names: Vec<&str> = profile.sector_names().collect();
        assert_eq!(names, vec!["Residential Sector", TOTAL_ALL_SECTORS]);
        assert!(!profile.total_all_sectors().expect("total").is_reported());

        let profile = assemble_state_profile("Ohio", &fixture()).expect("profile");
        let names: Vec<&str> = profile.sector_names().collect();
        assert_eq!(names, vec![TOTAL_ALL_SECTORS, "Commercial Sector"]);
    }

    #[test]
    fn test_duplicate_column_keeps_later_series() {
        let records = vec![
            sector_record(
                TOTAL_ALL_SECTORS,
                EnergyType::Coal,
                series(FIRST_YEAR, YEAR_COUNT, |_| 1.0),
            ),
            sector_record(
                TOTAL_ALL_SECTORS,
                EnergyType::Coal,
                series(FIRST_YEAR, YEAR_COUNT, |_| 2.0),
            ),
        ];
        let table = assemble_sector_table("Ohio", &records, TOTAL_ALL_SECTORS).expect("table");
        assert_eq!(table.columns().len(), 1);
        assert!(table.nonrenewable_total().iter().all(|&v| v == 2.0));
        assert_eq!(table.years().last(), Some(LAST_YEAR));
    }
}
