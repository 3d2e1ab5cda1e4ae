//! JSON report generator.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::indicators::IndicatorPair;
use crate::model::StateProfile;
use crate::pipeline::{PipelineOutput, StateFailure};
use crate::presentation::{score_table, ScoreRecord};
use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(
        &self,
        output: &PipelineOutput,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let report = JsonScoreReport {
            metadata: JsonReportMetadata {
                tool: ToolInfo {
                    name: "seds-index".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
                generated_at: Utc::now().to_rfc3339(),
                data_file: config.metadata.data_file.clone(),
                snapshot_hash: format!("{:016x}", output.snapshot_hash),
            },
            summary: JsonSummary {
                states_scored: output.scores.len(),
                states_failed: output.failures.len(),
            },
            scores: score_table(output),
            raw_indicators: &output.indicators,
            failures: &output.failures,
            tables: config.include_tables.then_some(&output.profiles),
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        Ok(json)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

// JSON structures for serialization

#[derive(Serialize)]
struct JsonScoreReport<'a> {
    metadata: JsonReportMetadata,
    summary: JsonSummary,
    scores: IndexMap<String, ScoreRecord>,
    raw_indicators: &'a IndexMap<String, IndicatorPair>,
    failures: &'a [StateFailure],
    #[serde(skip_serializing_if = "Option::is_none")]
    tables: Option<&'a IndexMap<String, StateProfile>>,
}

#[derive(Serialize)]
struct JsonReportMetadata {
    tool: ToolInfo,
    generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_file: Option<String>,
    snapshot_hash: String,
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    version: String,
}

#[derive(Serialize)]
struct JsonSummary {
    states_scored: usize,
    states_failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::{SiWeight, SustainabilityProfile};
    use crate::pipeline::PipelineStage;

    fn output() -> PipelineOutput {
        let mut output = PipelineOutput {
            snapshot_hash: 0xabc,
            ..PipelineOutput::default()
        };
        output.scores.insert(
            "Ohio".to_string(),
            SustainabilityProfile {
                effort_score: 1.0,
                green_score: 0.0,
                indices: SiWeight::all().map(|w| (w, w.value())).collect(),
            },
        );
        output.indicators.insert(
            "Ohio".to_string(),
            IndicatorPair {
                effort_score: 2.5,
                green_score: 0.1,
            },
        );
        output.failures.push(StateFailure {
            state: "Iowa".to_string(),
            stage: PipelineStage::Indicators,
            reason: "window too short".to_string(),
        });
        output
    }

    #[test]
    fn test_json_report_shape() {
        let json = JsonReporter::new()
            .generate(&output(), &ReportConfig::default())
            .expect("report");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["metadata"]["tool"]["name"], "seds-index");
        assert_eq!(value["metadata"]["snapshot_hash"], "0000000000000abc");
        assert_eq!(value["summary"]["states_scored"], 1);
        assert_eq!(value["summary"]["states_failed"], 1);
        assert_eq!(value["scores"]["OH"]["SI_1.0"], 1.0);
        assert_eq!(value["raw_indicators"]["Ohio"]["effort_score"], 2.5);
        assert_eq!(value["failures"][0]["stage"], "indicators");
        assert!(value.get("tables").is_none());
    }

    #[test]
    fn test_compact_output_is_single_line() {
        let json = JsonReporter::new()
            .pretty(false)
            .generate(&output(), &ReportConfig::default())
            .expect("report");
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_tables_included_on_request() {
        let config = ReportConfig {
            include_tables: true,
            ..ReportConfig::default()
        };
        let json = JsonReporter::new()
            .generate(&output(), &config)
            .expect("report");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert!(value["tables"].is_object());
    }
}
