//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand
//! and returns the process exit code.

mod chart;
mod score;
mod state;

pub use chart::{run_chart, ChartKind};
pub use score::run_score;
pub use state::{run_state, StateFormat};

use crate::config::{AppConfig, Validatable};
use crate::pipeline::{PipelineOutput, SustainabilityPipeline};
use crate::store::{load_records, InMemoryRepository};
use anyhow::{bail, Context, Result};

/// Reject a configuration that fails validation, listing every problem.
fn ensure_valid(config: &AppConfig) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
    bail!("Invalid configuration:\n  {}", details.join("\n  "))
}

/// Load the record file named by the configuration.
fn load_repository(config: &AppConfig) -> Result<InMemoryRepository> {
    let Some(path) = config.store.data_file.as_deref() else {
        bail!("No data file given. Pass one on the command line or set store.data_file");
    };
    load_records(path, config.store.format)
        .with_context(|| format!("failed to load records from {}", path.display()))
}

/// Score every state once.
fn score_all(config: &AppConfig, repo: InMemoryRepository) -> Result<PipelineOutput> {
    Ok(SustainabilityPipeline::new(repo, config.pipeline()).run()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_data_file_is_an_error() {
        let err = load_repository(&AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("No data file"));
    }

    #[test]
    fn test_invalid_config_lists_fields() {
        let config = AppConfig::builder().window(2010, 2000).scale_divisor(0.0).build();
        let message = ensure_valid(&config).unwrap_err().to_string();
        assert!(message.contains("indicators.window_start"));
        assert!(message.contains("indicators.scale_divisor"));
    }
}
