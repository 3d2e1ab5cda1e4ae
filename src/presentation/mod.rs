//! Presentation adapter.
//!
//! Maps pipeline output into the shapes a dashboard renders: a score table
//! keyed by postal code, a choropleth frame per index weight, per-state time
//! series charts, and the short text blocks shown next to them.

mod charts;

pub use charts::{table_by_year, timeseries, Chart, ChartCase, Trace, YearRow};

use crate::blend::SiWeight;
use crate::model::state_code;
use crate::pipeline::PipelineOutput;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Title of the choropleth map.
pub const MAP_TITLE: &str = "Sustainability Indexes of U.S. States";
/// Colorscale of the choropleth map.
pub const MAP_COLORSCALE: &str = "Greens";

/// Scores of one state as the dashboard consumes them.
///
/// Index values are flattened into `SI_0.0` … `SI_1.0` keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub code: String,
    pub state: String,
    pub effort_score: f64,
    pub green_score: f64,
    #[serde(flatten)]
    pub indices: IndexMap<SiWeight, f64>,
}

/// Scores of every scored state, keyed by postal code.
///
/// States without a known postal code are skipped with a warning.
#[must_use]
pub fn score_table(output: &PipelineOutput) -> IndexMap<String, ScoreRecord> {
    let mut table = IndexMap::with_capacity(output.scores.len());
    for (state, profile) in &output.scores {
        let Some(code) = state_code(state) else {
            tracing::warn!(state = %state, "No postal code; leaving state off the score table");
            continue;
        };
        table.insert(
            code.to_string(),
            ScoreRecord {
                code: code.to_string(),
                state: state.clone(),
                effort_score: profile.effort_score,
                green_score: profile.green_score,
                indices: profile.indices.clone(),
            },
        );
    }
    table
}

/// One choropleth frame: a value per state for one index weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFrame {
    pub title: String,
    /// Score column shown, e.g. `SI_0.4`
    pub column: String,
    pub colorscale: String,
    /// Postal codes
    pub locations: Vec<String>,
    pub z: Vec<f64>,
}

/// Map frame for the slider position `weight`.
#[must_use]
pub fn choropleth(scores: &IndexMap<String, ScoreRecord>, weight: SiWeight) -> MapFrame {
    let (locations, z): (Vec<String>, Vec<f64>) = scores
        .values()
        .filter_map(|record| {
            record
                .indices
                .get(&weight)
                .map(|&value| (record.code.clone(), value))
        })
        .unzip();
    MapFrame {
        title: MAP_TITLE.to_string(),
        column: weight.label(),
        colorscale: MAP_COLORSCALE.to_string(),
        locations,
        z,
    }
}

/// Caption under the index slider.
///
/// ```
/// use seds_index::blend::SiWeight;
/// use seds_index::presentation::slider_caption;
///
/// let weight: SiWeight = "0.3".parse().unwrap();
/// assert_eq!(
///     slider_caption(weight),
///     "Sustainability Index: Green Score: 70.0% | Effort Score: 30.0%"
/// );
/// ```
#[must_use]
pub fn slider_caption(weight: SiWeight) -> String {
    let effort = f64::from(weight.tenths()) * 10.0;
    let green = 100.0 - effort;
    format!("Sustainability Index: Green Score: {green:.1}% | Effort Score: {effort:.1}%")
}

/// Markdown card with a state's scaled scores.
#[must_use]
pub fn score_card(record: &ScoreRecord) -> String {
    format!(
        "##### {} Sustainability Scores\nEffort Score: {:.3}\n\nGreen Score: {:.3}\n",
        record.state, record.effort_score, record.green_score
    )
}
