//! Configuration types for seds-index operations.
//!
//! Provides structured configuration for the scoring pipeline, its cache and
//! report output.

use super::defaults::{
    DEFAULT_CACHE_ENTRIES, DEFAULT_DECIMALS, DEFAULT_SCALE_DIVISOR, DEFAULT_WINDOW_END,
    DEFAULT_WINDOW_START,
};
use crate::model::Year;
use crate::reports::ReportFormat;
use crate::store::DataFileFormat;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// This is the top-level configuration struct that aggregates all configuration
/// options. It can be constructed from CLI arguments, config files, or both
/// (with CLI overriding file settings).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Record store configuration (data file, format)
    pub store: StoreConfig,
    /// Indicator computation (window, scaling divisor, rounding)
    pub indicators: IndicatorConfig,
    /// Normalization and blending
    pub blending: BlendConfig,
    /// Memoization of completed runs
    pub cache: CacheConfig,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// The part of the configuration that determines computed scores.
    #[must_use]
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            indicators: self.indicators.clone(),
            blending: self.blending.clone(),
        }
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the record file.
    pub fn data_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.store.data_file = file;
        self
    }

    /// Set the record file layout.
    pub const fn data_format(mut self, format: DataFileFormat) -> Self {
        self.config.store.format = format;
        self
    }

    /// Set the analysis window.
    pub const fn window(mut self, start: Year, end: Year) -> Self {
        self.config.indicators.window_start = start;
        self.config.indicators.window_end = end;
        self
    }

    /// Set the consumption scale divisor.
    pub const fn scale_divisor(mut self, divisor: f64) -> Self {
        self.config.indicators.scale_divisor = divisor;
        self
    }

    /// Set the degenerate scaling policy.
    pub const fn degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.config.blending.degenerate_policy = policy;
        self
    }

    /// Set how many runs a [`ScoreCache`](crate::pipeline::ScoreCache) keeps.
    pub const fn cache_entries(mut self, max_entries: usize) -> Self {
        self.config.cache.max_entries = max_entries;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Exit non-zero when any state fails.
    pub const fn fail_on_state_errors(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_state_errors = fail;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Command-specific Configuration Types
// ============================================================================

/// Configuration consumed by the scoring pipeline.
///
/// Two runs with equal `PipelineConfig` over the same snapshot produce the
/// same output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub indicators: IndicatorConfig,
    pub blending: BlendConfig,
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Record store configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StoreConfig {
    /// Default record file, used when no path is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// Record file layout
    pub format: DataFileFormat,
}

/// Indicator computation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IndicatorConfig {
    /// First year of the analysis window (inclusive)
    #[schemars(range(min = 1960, max = 2017))]
    pub window_start: Year,
    /// Last year of the analysis window (inclusive)
    #[schemars(range(min = 1960, max = 2017))]
    pub window_end: Year,
    /// Consumption values are divided by this before scoring
    pub scale_divisor: f64,
    /// Decimal places kept in raw scores
    #[schemars(range(max = 10))]
    pub decimals: u32,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            window_start: DEFAULT_WINDOW_START,
            window_end: DEFAULT_WINDOW_END,
            scale_divisor: DEFAULT_SCALE_DIVISOR,
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl IndicatorConfig {
    /// The analysis window as an inclusive year range.
    #[must_use]
    pub const fn window(&self) -> RangeInclusive<Year> {
        self.window_start..=self.window_end
    }
}

/// What to do when every state ties on a scaled metric
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    /// Give every state the fallback value and warn
    #[default]
    Constant,
    /// Abort the run
    Fail,
}

impl std::fmt::Display for DegeneratePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant => write!(f, "constant"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Normalization and blending configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BlendConfig {
    /// Degenerate scaling policy
    pub degenerate_policy: DegeneratePolicy,
    /// Value assigned to every state under the `constant` policy
    #[schemars(range(min = 0.0, max = 1.0))]
    pub fallback_value: f64,
    /// Decimal places kept in scaled values
    #[schemars(range(max = 10))]
    pub decimals: u32,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            degenerate_policy: DegeneratePolicy::Constant,
            fallback_value: 0.0,
            decimals: DEFAULT_DECIMALS,
        }
    }
}

/// Run memoization configuration.
///
/// Sizes the [`ScoreCache`](crate::pipeline::ScoreCache) of a long-lived
/// embedder. One-shot CLI commands run once per process and never cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of runs kept
    #[schemars(range(min = 1))]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_ENTRIES,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
    /// Index weight used to rank states in the summary
    #[schemars(range(min = 0.0, max = 1.0))]
    pub rank_weight: f64,
    /// Limit the summary ranking to this many states
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,
    /// Include per-state sector tables in JSON reports
    pub include_tables: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Auto,
            file: None,
            no_color: false,
            rank_weight: 0.5,
            top: None,
            include_tables: false,
        }
    }
}

/// Behavior flags for scoring runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 1 if any state failed to score
    pub fail_on_state_errors: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.indicators.window(), 2000..=2017);
        assert_eq!(config.indicators.scale_divisor, 100_000.0);
        assert_eq!(config.indicators.decimals, 3);
        assert_eq!(config.blending.degenerate_policy, DegeneratePolicy::Constant);
        assert_eq!(config.blending.fallback_value, 0.0);
        assert_eq!(config.cache.max_entries, DEFAULT_CACHE_ENTRIES);
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .window(1960, 2000)
            .degenerate_policy(DegeneratePolicy::Fail)
            .fail_on_state_errors(true)
            .build();
        assert_eq!(config.indicators.window_start, 1960);
        assert_eq!(config.indicators.window_end, 2000);
        assert_eq!(config.blending.degenerate_policy, DegeneratePolicy::Fail);
        assert!(config.behavior.fail_on_state_errors);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "indicators:\n  window_start: 1990\n";
        let config: AppConfig = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(config.indicators.window_start, 1990);
        assert_eq!(config.indicators.window_end, 2017);
        assert_eq!(config.output.rank_weight, 0.5);
    }

    #[test]
    fn test_pipeline_config_carries_scoring_sections() {
        let config = AppConfig::builder().scale_divisor(1.0).build();
        let pipeline = config.pipeline();
        assert_eq!(pipeline.indicators.scale_divisor, 1.0);
        assert_eq!(pipeline.blending, BlendConfig::default());
    }
}
