//! Per-sector annual tables.

use super::series::{year_index, Year, FIRST_YEAR, YEAR_COUNT};
use super::taxonomy::{EnergySource, EnergyType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of the aggregate sector the indicators are computed from.
pub const TOTAL_ALL_SECTORS: &str = "Total All Sectors";

/// A named column of a [`SectorTable`].
///
/// Serializes as its label so tables can be written as JSON objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Column {
    Energy(EnergyType),
    Population,
}

impl Column {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Energy(energy_type) => energy_type.label(),
            Self::Population => "Population",
        }
    }
}

impl From<String> for Column {
    fn from(label: String) -> Self {
        if label == "Population" {
            Self::Population
        } else {
            Self::Energy(EnergyType::from_label(&label))
        }
    }
}

impl From<Column> for String {
    fn from(column: Column) -> Self {
        column.label().to_string()
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Annual table for one (state, sector) pair over the fixed year index.
///
/// Every column holds exactly [`YEAR_COUNT`] values, position `i` being
/// year `FIRST_YEAR + i`. The renewable and nonrenewable totals are derived
/// when the table is built and are always present. Deserialization checks
/// the column lengths and recomputes the totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSectorTable")]
pub struct SectorTable {
    sector: String,
    reported: bool,
    columns: IndexMap<Column, Vec<f64>>,
    renewable_total: Vec<f64>,
    nonrenewable_total: Vec<f64>,
}

impl SectorTable {
    /// Build a table from aligned columns and derive the totals.
    ///
    /// Columns must already hold one value per year of the index.
    pub(crate) fn from_columns(
        sector: impl Into<String>,
        reported: bool,
        columns: IndexMap<Column, Vec<f64>>,
    ) -> Self {
        debug_assert!(columns.values().all(|c| c.len() == YEAR_COUNT));
        let renewable_total = sum_source(&columns, EnergySource::Renewable);
        let nonrenewable_total = sum_source(&columns, EnergySource::Nonrenewable);
        Self {
            sector: sector.into(),
            reported,
            columns,
            renewable_total,
            nonrenewable_total,
        }
    }

    #[must_use]
    pub fn sector(&self) -> &str {
        &self.sector
    }

    /// Whether any energy series was reported for this sector.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        self.reported
    }

    /// The year index, ascending.
    pub fn years(&self) -> impl Iterator<Item = Year> {
        year_index()
    }

    #[must_use]
    pub const fn columns(&self) -> &IndexMap<Column, Vec<f64>> {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, column: &Column) -> Option<&[f64]> {
        self.columns.get(column).map(Vec::as_slice)
    }

    #[must_use]
    pub fn energy_column(&self, energy_type: &EnergyType) -> Option<&[f64]> {
        self.column(&Column::Energy(energy_type.clone()))
    }

    #[must_use]
    pub fn renewable_total(&self) -> &[f64] {
        &self.renewable_total
    }

    #[must_use]
    pub fn nonrenewable_total(&self) -> &[f64] {
        &self.nonrenewable_total
    }

    /// Derived total for one source.
    #[must_use]
    pub fn total(&self, source: EnergySource) -> &[f64] {
        match source {
            EnergySource::Renewable => &self.renewable_total,
            EnergySource::Nonrenewable => &self.nonrenewable_total,
        }
    }

    /// Position of `year` in the index.
    #[must_use]
    pub fn row(year: Year) -> Option<usize> {
        let offset = usize::try_from(year - FIRST_YEAR).ok()?;
        (offset < YEAR_COUNT).then_some(offset)
    }

    /// (year, renewable, nonrenewable) rows restricted to `start..=end`.
    pub fn totals_between(
        &self,
        start: Year,
        end: Year,
    ) -> impl Iterator<Item = (Year, f64, f64)> + '_ {
        year_index()
            .zip(self.renewable_total.iter().zip(&self.nonrenewable_total))
            .filter(move |(year, _)| (start..=end).contains(year))
            .map(|(year, (&rec, &nec))| (year, rec, nec))
    }
}

/// Serialized shape of a [`SectorTable`]. Stored totals are ignored.
#[derive(Deserialize)]
struct RawSectorTable {
    sector: String,
    reported: bool,
    columns: IndexMap<Column, Vec<f64>>,
}

impl TryFrom<RawSectorTable> for SectorTable {
    type Error = String;

    fn try_from(raw: RawSectorTable) -> Result<Self, Self::Error> {
        for (column, values) in &raw.columns {
            if values.len() != YEAR_COUNT {
                return Err(format!(
                    "column '{column}' of '{}' has {} values, expected {YEAR_COUNT}",
                    raw.sector,
                    values.len()
                ));
            }
            if let Some(i) = values.iter().position(|v| !v.is_finite()) {
                return Err(format!(
                    "column '{column}' of '{}' has a non-finite value for {}",
                    raw.sector,
                    FIRST_YEAR + i as Year
                ));
            }
        }
        Ok(Self::from_columns(raw.sector, raw.reported, raw.columns))
    }
}

fn sum_source(columns: &IndexMap<Column, Vec<f64>>, source: EnergySource) -> Vec<f64> {
    let mut total = vec![0.0; YEAR_COUNT];
    for (column, values) in columns {
        let Column::Energy(energy_type) = column else {
            continue;
        };
        if energy_type.source() != Some(source) {
            continue;
        }
        for (acc, value) in total.iter_mut().zip(values) {
            *acc += value;
        }
    }
    total
}

/// Sector tables for one state, keyed by sector name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateProfile {
    pub state: String,
    pub sectors: IndexMap<String, SectorTable>,
}

impl StateProfile {
    #[must_use]
    pub fn sector(&self, name: &str) -> Option<&SectorTable> {
        self.sectors.get(name)
    }

    /// The "Total All Sectors" table, if present.
    #[must_use]
    pub fn total_all_sectors(&self) -> Option<&SectorTable> {
        self.sector(TOTAL_ALL_SECTORS)
    }

    pub fn sector_names(&self) -> impl Iterator<Item = &str> {
        self.sectors.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: f64) -> Vec<f64> {
        vec![value; YEAR_COUNT]
    }

    #[test]
    fn test_totals_sum_present_columns() {
        let mut columns = IndexMap::new();
        columns.insert(Column::Energy(EnergyType::Coal), constant(5.0));
        columns.insert(Column::Energy(EnergyType::NuclearPower), constant(2.5));
        columns.insert(Column::Energy(EnergyType::WindEnergy), constant(1.0));
        columns.insert(
            Column::Energy(EnergyType::Other("Wood".to_string())),
            constant(100.0),
        );
        columns.insert(Column::Population, constant(1000.0));

        let table = SectorTable::from_columns(TOTAL_ALL_SECTORS, true, columns);
        assert!(table.nonrenewable_total().iter().all(|&v| v == 7.5));
        assert!(table.renewable_total().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_empty_table_has_zero_totals() {
        let table = SectorTable::from_columns("Commercial Sector", false, IndexMap::new());
        assert_eq!(table.renewable_total().len(), YEAR_COUNT);
        assert!(table.renewable_total().iter().all(|&v| v == 0.0));
        assert!(table.nonrenewable_total().iter().all(|&v| v == 0.0));
        assert!(!table.is_reported());
    }

    #[test]
    fn test_row_lookup() {
        assert_eq!(SectorTable::row(1960), Some(0));
        assert_eq!(SectorTable::row(2017), Some(57));
        assert_eq!(SectorTable::row(2018), None);
        assert_eq!(SectorTable::row(1959), None);
    }

    #[test]
    fn test_totals_between_window() {
        let mut columns = IndexMap::new();
        columns.insert(
            Column::Energy(EnergyType::Coal),
            (0..YEAR_COUNT).map(|i| i as f64).collect(),
        );
        let table = SectorTable::from_columns(TOTAL_ALL_SECTORS, true, columns);
        let rows: Vec<_> = table.totals_between(2015, 2017).collect();
        assert_eq!(rows, vec![(2015, 0.0, 55.0), (2016, 0.0, 56.0), (2017, 0.0, 57.0)]);
    }

    #[test]
    fn test_deserialize_recomputes_totals() {
        let mut columns = IndexMap::new();
        columns.insert(Column::Energy(EnergyType::Coal), constant(4.0));
        columns.insert(Column::Energy(EnergyType::SolarEnergy), constant(1.0));
        let table = SectorTable::from_columns(TOTAL_ALL_SECTORS, true, columns);

        let mut json = serde_json::to_value(&table).expect("serialize");
        json["renewable_total"] = serde_json::json!([99.0]);
        let back: SectorTable = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, table);
    }

    #[test]
    fn test_deserialize_rejects_short_columns() {
        let json = r#"{"sector":"Total All Sectors","reported":true,
            "columns":{"Coal":[1.0,2.0]},"renewable_total":[5.0],"nonrenewable_total":[]}"#;
        let err = serde_json::from_str::<SectorTable>(json).unwrap_err();
        assert!(err.to_string().contains("has 2 values, expected 58"), "{err}");
    }

    #[test]
    fn test_deserialize_requires_columns() {
        let json = r#"{"renewable_total":[5.0],"nonrenewable_total":[]}"#;
        assert!(serde_json::from_str::<SectorTable>(json).is_err());
    }
}
