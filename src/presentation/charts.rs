//! Time-series chart data.

use crate::error::{AssemblyErrorKind, Result, SedsError};
use crate::model::{year_index, EnergySource, SectorTable, StateProfile, Year, TOTAL_ALL_SECTORS};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column label of the derived renewable total.
pub const RENEWABLE_TOTAL_LABEL: &str = "Renewable Sources";
/// Column label of the derived nonrenewable total.
pub const NONRENEWABLE_TOTAL_LABEL: &str = "Nonrenewable Sources";

const X_AXIS_TITLE: &str = "Year";
const Y_AXIS_TITLE: &str = "Energy Consumption (Billion Btu)";
const NONRENEWABLE_COLOR: &str = "rgb(255,128,0)";
const RENEWABLE_COLOR: &str = "rgb(0,168,84)";

/// The three chart layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "case", content = "source", rename_all = "snake_case")]
pub enum ChartCase {
    /// Both totals of "Total All Sectors" over the full index
    AtAGlance,
    /// One source's total in every sector
    BySector(EnergySource),
    /// One source's total and its constituent fuels, all sectors combined
    ByFuel(EnergySource),
}

impl ChartCase {
    #[must_use]
    pub const fn height(&self) -> u32 {
        match self {
            Self::AtAGlance => 350,
            Self::BySector(_) | Self::ByFuel(_) => 300,
        }
    }

    /// Visible x axis range.
    #[must_use]
    pub const fn x_range(&self) -> [Year; 2] {
        match self {
            Self::AtAGlance => [1960, 2017],
            Self::BySector(_) | Self::ByFuel(_) => [2000, 2017],
        }
    }

    #[must_use]
    pub fn title(&self, state: &str) -> String {
        match self {
            Self::AtAGlance => format!("{state} Energy Consumption at a Glance"),
            Self::BySector(source) => format!("{state} {source} Energy Consumption by Sector"),
            Self::ByFuel(source) => {
                format!("{state} {source} Energy Consumption for All Sectors by Fuel")
            }
        }
    }
}

/// One line of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    pub x: Vec<Year>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_color: Option<String>,
}

impl Trace {
    fn new(name: impl Into<String>, values: &[f64]) -> Self {
        Self {
            name: name.into(),
            x: year_index().collect(),
            y: values.to_vec(),
            line_color: None,
        }
    }

    fn colored(mut self, color: &str) -> Self {
        self.line_color = Some(color.to_string());
        self
    }
}

/// A line chart and its layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub height: u32,
    pub x_title: String,
    pub y_title: String,
    pub x_range: [Year; 2],
    pub traces: Vec<Trace>,
}

/// Build the chart for `case` from a state's sector tables.
pub fn timeseries(profile: &StateProfile, case: ChartCase) -> Result<Chart> {
    let total = profile.total_all_sectors().ok_or_else(|| {
        SedsError::assembly(
            &profile.state,
            "chart data",
            AssemblyErrorKind::MissingSector(TOTAL_ALL_SECTORS.to_string()),
        )
    })?;

    let traces = match case {
        ChartCase::AtAGlance => vec![
            Trace::new("Nonrenewable", total.nonrenewable_total()).colored(NONRENEWABLE_COLOR),
            Trace::new("Renewable", total.renewable_total()).colored(RENEWABLE_COLOR),
        ],
        ChartCase::BySector(source) => profile
            .sectors
            .iter()
            .map(|(sector, table)| Trace::new(sector_legend(sector), table.total(source)))
            .collect(),
        ChartCase::ByFuel(source) => {
            let mut traces = vec![Trace::new(format!("All {source}"), total.total(source))];
            traces.extend(source.energy_types().iter().filter_map(|energy_type| {
                total
                    .energy_column(energy_type)
                    .map(|values| Trace::new(energy_type.short_name(), values))
            }));
            traces
        }
    };

    Ok(Chart {
        title: case.title(&profile.state),
        height: case.height(),
        x_title: X_AXIS_TITLE.to_string(),
        y_title: Y_AXIS_TITLE.to_string(),
        x_range: case.x_range(),
        traces,
    })
}

/// Sector name without its trailing "Sector"/"Sectors" word.
fn sector_legend(sector: &str) -> &str {
    match sector.rsplit_once(' ') {
        Some((head, "Sector" | "Sectors")) => head,
        _ => sector,
    }
}

/// One year of a sector table, every column flattened by label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    pub year: Year,
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

/// Rows of `table` keyed by year, including the derived totals.
#[must_use]
pub fn table_by_year(table: &SectorTable) -> Vec<YearRow> {
    year_index()
        .enumerate()
        .map(|(i, year)| {
            let mut values: IndexMap<String, f64> = table
                .columns()
                .iter()
                .map(|(column, series)| (column.label().to_string(), series[i]))
                .collect();
            values.insert(
                RENEWABLE_TOTAL_LABEL.to_string(),
                table.renewable_total()[i],
            );
            values.insert(
                NONRENEWABLE_TOTAL_LABEL.to_string(),
                table.nonrenewable_total()[i],
            );
            YearRow { year, values }
        })
        .collect()
}
