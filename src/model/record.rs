//! Series records at the repository boundary.
//!
//! [`RawRecord`] mirrors the loosely-typed document the store holds.
//! [`SeriesRecord`] is what the rest of the crate sees: every record is
//! validated and classified once, here.

use super::series::{AnnualSeries, Year};
use super::taxonomy::EnergyType;
use crate::error::{Result, SedsError, StoreErrorKind};
use serde::{Deserialize, Serialize};

/// Description of the population sidecar series.
pub const POPULATION_DESCRIPTION: &str = "Population";
/// Description of the temperature sidecar series.
pub const TEMPERATURE_DESCRIPTION: &str = "Temperature";

/// A year key as stored: either `"2017"` or `2017`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawYear {
    Number(i64),
    Text(String),
}

impl RawYear {
    fn to_year(&self) -> Option<Year> {
        match self {
            Self::Number(n) => Year::try_from(*n).ok(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// One stored series document. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub data: Vec<(RawYear, Option<f64>)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl RawRecord {
    fn identity(&self) -> String {
        self.series_id
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| "<unnamed series>".to_string())
    }

    fn series(&self) -> Result<AnnualSeries> {
        let identity = self.identity();
        let mut points = Vec::with_capacity(self.data.len());
        for (raw_year, value) in &self.data {
            let year = raw_year.to_year().ok_or_else(|| {
                SedsError::store(
                    identity.clone(),
                    StoreErrorKind::InvalidSeries(format!("unparseable year {raw_year:?}")),
                )
            })?;
            let value = value.ok_or_else(|| {
                SedsError::store(
                    identity.clone(),
                    StoreErrorKind::InvalidSeries(format!("null value for {year}")),
                )
            })?;
            points.push((year, value));
        }
        AnnualSeries::from_points(points).map_err(|e| {
            SedsError::store(identity, StoreErrorKind::InvalidSeries(e.to_string()))
        })
    }

    /// Validate and classify this record.
    ///
    /// Returns `Ok(None)` for records that are neither sector series nor a
    /// known sidecar; those are filtered out of the pipeline.
    pub fn into_series_record(self) -> Result<Option<SeriesRecord>> {
        let identity = self.identity();
        let Some(state) = self.state.clone().filter(|s| !s.trim().is_empty()) else {
            return Err(SedsError::missing_field("state", identity));
        };
        let units = self.units.clone().unwrap_or_default();

        if let Some(sector) = self.sector.clone() {
            let Some(label) = self.energy_type.clone() else {
                return Err(SedsError::missing_field("energy_type", identity));
            };
            return Ok(Some(SeriesRecord::Sector {
                state,
                sector,
                energy_type: EnergyType::from_label(&label),
                units,
                series: self.series()?,
            }));
        }

        match self.description.as_deref().map(str::trim) {
            Some(d) if d.eq_ignore_ascii_case(POPULATION_DESCRIPTION) => {
                Ok(Some(SeriesRecord::Population {
                    state,
                    units,
                    series: self.series()?,
                }))
            }
            Some(d) if d.eq_ignore_ascii_case(TEMPERATURE_DESCRIPTION) => {
                Ok(Some(SeriesRecord::Temperature {
                    state,
                    units,
                    series: self.series()?,
                }))
            }
            other => {
                tracing::debug!(
                    series = %identity,
                    description = ?other,
                    "Skipping record without sector or known description"
                );
                Ok(None)
            }
        }
    }
}

/// A validated series record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesRecord {
    /// Consumption of one energy type in one sector
    Sector {
        state: String,
        sector: String,
        energy_type: EnergyType,
        units: String,
        series: AnnualSeries,
    },
    /// Resident population
    Population {
        state: String,
        units: String,
        series: AnnualSeries,
    },
    /// Average temperature
    Temperature {
        state: String,
        units: String,
        series: AnnualSeries,
    },
}

impl SeriesRecord {
    /// Full name of the state this record belongs to.
    #[must_use]
    pub fn state(&self) -> &str {
        match self {
            Self::Sector { state, .. }
            | Self::Population { state, .. }
            | Self::Temperature { state, .. } => state,
        }
    }

    /// The annual values.
    #[must_use]
    pub const fn series(&self) -> &AnnualSeries {
        match self {
            Self::Sector { series, .. }
            | Self::Population { series, .. }
            | Self::Temperature { series, .. } => series,
        }
    }

    /// Sector name for sector records.
    #[must_use]
    pub fn sector(&self) -> Option<&str> {
        match self {
            Self::Sector { sector, .. } => Some(sector),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawRecord {
        serde_json::from_str(json).expect("valid raw record json")
    }

    #[test]
    fn test_sector_record_classified() {
        let rec = raw(
            r#"{"series_id":"SEDS.CLTCB.AL.A","sector":"Total All Sectors",
                "energy_type":"Coal","units":"Billion Btu","state":"Alabama",
                "data":[["2001", 2.0],["2000", 1.0]]}"#,
        );
        let record = rec.into_series_record().expect("valid").expect("kept");
        match &record {
            SeriesRecord::Sector {
                energy_type,
                sector,
                series,
                ..
            } => {
                assert_eq!(energy_type, &EnergyType::Coal);
                assert_eq!(sector, "Total All Sectors");
                assert_eq!(series.points(), &[(2000, 1.0), (2001, 2.0)]);
            }
            other => panic!("expected sector record, got {other:?}"),
        }
        assert_eq!(record.state(), "Alabama");
    }

    #[test]
    fn test_numeric_years_accepted() {
        let rec = raw(r#"{"description":"Population","state":"Ohio","data":[[2000, 5.0]]}"#);
        let record = rec.into_series_record().expect("valid").expect("kept");
        assert!(matches!(record, SeriesRecord::Population { .. }));
    }

    #[test]
    fn test_temperature_sidecar() {
        let rec = raw(r#"{"description":"temperature","state":"Ohio","data":[]}"#);
        let record = rec.into_series_record().expect("valid").expect("kept");
        assert!(matches!(record, SeriesRecord::Temperature { .. }));
    }

    #[test]
    fn test_unclassifiable_record_filtered() {
        let rec = raw(r#"{"description":"Price","state":"Ohio","data":[]}"#);
        assert!(rec.into_series_record().expect("valid").is_none());
    }

    #[test]
    fn test_missing_state_rejected() {
        let rec = raw(r#"{"sector":"Total All Sectors","energy_type":"Coal","data":[]}"#);
        let err = rec.into_series_record().unwrap_err();
        assert!(err.to_string().contains("missing"), "{err}");
    }

    #[test]
    fn test_sector_without_energy_type_rejected() {
        let rec = raw(r#"{"sector":"Residential Sector","state":"Ohio","data":[]}"#);
        assert!(matches!(
            rec.into_series_record(),
            Err(SedsError::Store {
                source: StoreErrorKind::MissingField { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_null_value_rejected() {
        let rec = raw(
            r#"{"sector":"Total All Sectors","energy_type":"Coal","state":"Ohio",
                "data":[["2000", null]]}"#,
        );
        assert!(matches!(
            rec.into_series_record(),
            Err(SedsError::Store {
                source: StoreErrorKind::InvalidSeries(_),
                ..
            })
        ));
    }

    #[test]
    fn test_bad_year_rejected() {
        let rec = raw(
            r#"{"sector":"Total All Sectors","energy_type":"Coal","state":"Ohio",
                "data":[["20x0", 1.0]]}"#,
        );
        assert!(rec.into_series_record().is_err());
    }
}
