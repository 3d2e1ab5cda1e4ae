//! Summary report generator for shell output.
//!
//! Provides a compact, ranked, human-readable view of a run.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::model::state_code;
use crate::pipeline::PipelineOutput;
use crate::presentation::slider_caption;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate(
        &self,
        output: &PipelineOutput,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        // Header
        lines.push(self.color("Sustainability Index Summary", "bold"));
        lines.push(self.color("─".repeat(48).as_str(), "dim"));

        if let Some(file) = &config.metadata.data_file {
            lines.push(format!("{}  {}", self.color("Data:", "cyan"), file));
        }
        lines.push(format!(
            "{}  {:016x}",
            self.color("Snapshot:", "cyan"),
            output.snapshot_hash
        ));
        lines.push(format!(
            "{}  {} scored, {} excluded",
            self.color("States:", "cyan"),
            output.scores.len(),
            output.failures.len()
        ));
        lines.push(String::new());

        // Ranking
        let weight = config.rank_weight;
        lines.push(self.color(&format!("Ranking by {weight}"), "bold"));
        lines.push(self.color(&slider_caption(weight), "dim"));

        let ranking = output.ranking(weight);
        let shown = config.top.unwrap_or(ranking.len()).min(ranking.len());
        for (position, (state, value)) in ranking.iter().take(shown).enumerate() {
            let profile = &output.scores[*state];
            let code = state_code(state).unwrap_or("--");
            lines.push(format!(
                "  {:>2}. {:<22} {}  {}  effort {:.3}  green {:.3}",
                position + 1,
                state,
                code,
                self.color(&format!("{value:.3}"), "green"),
                profile.effort_score,
                profile.green_score
            ));
        }
        if shown < ranking.len() {
            lines.push(self.color(
                &format!("  … {} more", ranking.len() - shown),
                "dim",
            ));
        }

        // Failures
        if !output.failures.is_empty() {
            lines.push(String::new());
            lines.push(self.color("Excluded states", "yellow"));
            for failure in &output.failures {
                lines.push(format!(
                    "  {} [{}] {}",
                    self.color(&failure.state, "red"),
                    failure.stage,
                    failure.reason
                ));
            }
        }

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::{SiWeight, SustainabilityProfile};
    use crate::pipeline::{PipelineStage, StateFailure};

    fn output() -> PipelineOutput {
        let mut output = PipelineOutput::default();
        for (state, value) in [("Ohio", 0.2), ("Iowa", 0.9), ("Utah", 0.5)] {
            output.scores.insert(
                state.to_string(),
                SustainabilityProfile {
                    effort_score: value,
                    green_score: value,
                    indices: SiWeight::all().map(|w| (w, value)).collect(),
                },
            );
        }
        output.failures.push(StateFailure {
            state: "Maine".to_string(),
            stage: PipelineStage::Store,
            reason: "Unknown state".to_string(),
        });
        output
    }

    #[test]
    fn test_summary_ranks_and_lists_failures() {
        let text = SummaryReporter::new()
            .no_color()
            .generate(&output(), &ReportConfig::default())
            .expect("summary");
        assert!(text.contains("3 scored, 1 excluded"));
        assert!(text.contains("Ranking by SI_0.5"));
        let iowa = text.find("Iowa").expect("iowa");
        let utah = text.find("Utah").expect("utah");
        let ohio = text.find("Ohio").expect("ohio");
        assert!(iowa < utah && utah < ohio);
        assert!(text.contains("Maine [store] Unknown state"));
        assert!(!text.contains("\x1b["));
    }

    #[test]
    fn test_summary_top_limit() {
        let config = ReportConfig {
            top: Some(1),
            ..ReportConfig::default()
        };
        let text = SummaryReporter::new()
            .no_color()
            .generate(&output(), &config)
            .expect("summary");
        assert!(text.contains("Iowa"));
        assert!(!text.contains("Ohio"));
        assert!(text.contains("2 more"));
    }
}
