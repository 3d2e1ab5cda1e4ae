//! CSV report generator.
//!
//! One row per scored state with scaled scores, raw indicators and every
//! index value, suitable for spreadsheet import. Excluded states follow in
//! their own section.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::blend::SiWeight;
use crate::pipeline::PipelineOutput;
use crate::presentation::score_table;
use std::fmt::Write as _;

/// CSV report generator.
pub struct CsvReporter;

impl CsvReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for CsvReporter {
    fn generate(
        &self,
        output: &PipelineOutput,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut content = String::new();

        content.push_str("# Scores\n");
        content.push_str("Code,State,Effort Score,Green Score,Raw Effort Score,Raw Green Score");
        for weight in SiWeight::all() {
            write!(content, ",{weight}")?;
        }
        content.push('\n');

        for record in score_table(output).values() {
            let raw = output.indicators.get(&record.state);
            write!(
                content,
                "{},\"{}\",{},{},{},{}",
                record.code,
                escape_csv(&record.state),
                record.effort_score,
                record.green_score,
                raw.map_or_else(String::new, |p| p.effort_score.to_string()),
                raw.map_or_else(String::new, |p| p.green_score.to_string()),
            )?;
            for weight in SiWeight::all() {
                match record.indices.get(&weight) {
                    Some(value) => write!(content, ",{value}")?,
                    None => content.push(','),
                }
            }
            content.push('\n');
        }

        if !output.failures.is_empty() {
            content.push_str("\n# Failures\n");
            content.push_str("State,Stage,Reason\n");
            for failure in &output.failures {
                writeln!(
                    content,
                    "\"{}\",{},\"{}\"",
                    escape_csv(&failure.state),
                    failure.stage,
                    escape_csv(&failure.reason)
                )?;
            }
        }

        Ok(content)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }
}

/// Escape a value for placement inside double quotes.
fn escape_csv(s: &str) -> String {
    s.replace('"', "\"\"")
}
