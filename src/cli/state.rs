//! State command handler.
//!
//! Implements the `state` subcommand: the score card, index values and
//! sector tables of one state.

use super::{ensure_valid, load_repository, score_all};
use crate::blend::SiWeight;
use crate::config::AppConfig;
use crate::model::resolve_state;
use crate::pipeline::{exit_codes, write_output, OutputTarget, PipelineOutput};
use crate::presentation::{score_card, score_table, slider_caption, table_by_year, ScoreRecord, YearRow};
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write as _;

/// Output format of the `state` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StateFormat {
    /// Markdown score card followed by tab-separated tables
    #[default]
    Text,
    /// A single JSON document
    Json,
}

#[derive(Serialize)]
struct StateReport<'a> {
    record: &'a ScoreRecord,
    captions: IndexMap<SiWeight, String>,
    tables: IndexMap<&'a str, Vec<YearRow>>,
}

/// Run the state command for `state` (full name or postal code).
#[allow(clippy::needless_pass_by_value)]
pub fn run_state(config: AppConfig, state: &str, format: StateFormat) -> Result<i32> {
    ensure_valid(&config)?;
    let name = resolve_state(state).ok_or_else(|| anyhow!("Unknown state '{state}'"))?;

    let repo = load_repository(&config)?;
    let output = score_all(&config, repo)?;
    let content = render_state(&output, name, format)?;

    let target = OutputTarget::from_option(config.output.file.clone());
    write_output(&content, &target, config.behavior.quiet)?;
    Ok(exit_codes::SUCCESS)
}

/// Render one scored state of a run.
fn render_state(output: &PipelineOutput, name: &str, format: StateFormat) -> Result<String> {
    if let Some(failure) = output.failures.iter().find(|f| f.state == name) {
        bail!(
            "{name} could not be scored ({} stage): {}",
            failure.stage,
            failure.reason
        );
    }
    let scores = score_table(output);
    let Some(record) = scores.values().find(|record| record.state == name) else {
        bail!("No records for {name} in the data file");
    };
    let tables: IndexMap<&str, Vec<YearRow>> = output
        .profiles
        .get(name)
        .map(|profile| {
            profile
                .sectors
                .iter()
                .map(|(sector, table)| (sector.as_str(), table_by_year(table)))
                .collect()
        })
        .unwrap_or_default();

    match format {
        StateFormat::Json => {
            let report = StateReport {
                record,
                captions: SiWeight::all().map(|w| (w, slider_caption(w))).collect(),
                tables,
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        StateFormat::Text => Ok(render_text(record, &tables)?),
    }
}

fn render_text(
    record: &ScoreRecord,
    tables: &IndexMap<&str, Vec<YearRow>>,
) -> Result<String, std::fmt::Error> {
    let mut text = score_card(record);

    text.push('\n');
    for weight in SiWeight::all() {
        if let Some(value) = record.indices.get(&weight) {
            writeln!(text, "{weight}\t{value:.3}\t{}", slider_caption(weight))?;
        }
    }

    for (sector, rows) in tables {
        let Some(first) = rows.first() else {
            continue;
        };
        write!(text, "\n## {sector}\nYear")?;
        for label in first.values.keys() {
            write!(text, "\t{label}")?;
        }
        text.push('\n');
        for row in rows {
            write!(text, "{}", row.year)?;
            for value in row.values.values() {
                write!(text, "\t{value}")?;
            }
            text.push('\n');
        }
    }
    Ok(text)
}
