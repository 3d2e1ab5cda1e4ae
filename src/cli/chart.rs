//! Chart command handler.
//!
//! Implements the `chart` subcommand: time-series chart data for one state
//! as JSON. Only that state's records are assembled; nothing is scored.

use super::{ensure_valid, load_repository};
use crate::config::AppConfig;
use crate::model::{resolve_state, EnergySource};
use crate::pipeline::{exit_codes, write_output, OutputTarget, SustainabilityPipeline};
use crate::presentation::{timeseries, ChartCase};
use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;

/// Chart layout selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    /// Renewable and nonrenewable totals, all sectors combined
    #[default]
    Glance,
    /// One source's total in every sector
    Sector,
    /// One source's total and its fuels, all sectors combined
    Fuel,
}

impl ChartKind {
    /// The chart case for this layout and `source`.
    #[must_use]
    pub const fn case(self, source: EnergySource) -> ChartCase {
        match self {
            Self::Glance => ChartCase::AtAGlance,
            Self::Sector => ChartCase::BySector(source),
            Self::Fuel => ChartCase::ByFuel(source),
        }
    }
}

/// Run the chart command for `state` (full name or postal code).
#[allow(clippy::needless_pass_by_value)]
pub fn run_chart(
    config: AppConfig,
    state: &str,
    kind: ChartKind,
    source: EnergySource,
) -> Result<i32> {
    ensure_valid(&config)?;
    let name = resolve_state(state).ok_or_else(|| anyhow!("Unknown state '{state}'"))?;

    let repo = load_repository(&config)?;
    let pipeline = SustainabilityPipeline::new(repo, config.pipeline());
    let profile = pipeline
        .assemble(name)
        .with_context(|| format!("failed to assemble {name}"))?;

    let chart = timeseries(&profile, kind.case(source))?;
    tracing::debug!("Chart '{}' has {} traces", chart.title, chart.traces.len());

    let json = serde_json::to_string_pretty(&chart)?;
    let target = OutputTarget::from_option(config.output.file.clone());
    write_output(&json, &target, config.behavior.quiet)?;
    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_to_case() {
        assert_eq!(
            ChartKind::Glance.case(EnergySource::Renewable),
            ChartCase::AtAGlance
        );
        assert_eq!(
            ChartKind::Sector.case(EnergySource::Nonrenewable),
            ChartCase::BySector(EnergySource::Nonrenewable)
        );
        assert_eq!(
            ChartKind::Fuel.case(EnergySource::Renewable),
            ChartCase::ByFuel(EnergySource::Renewable)
        );
    }
}
