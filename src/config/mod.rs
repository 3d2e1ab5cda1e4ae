//! Configuration module for seds-index.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust
//! use seds_index::config::{AppConfig, ConfigPreset, DegeneratePolicy};
//!
//! // Use defaults
//! let config = AppConfig::default();
//! assert_eq!(config.indicators.window(), 2000..=2017);
//!
//! // Use a preset
//! let legacy = AppConfig::from_preset(ConfigPreset::LegacyWindow);
//! assert_eq!(legacy.indicators.window(), 1960..=2000);
//!
//! // Use builder
//! let strict = AppConfig::builder()
//!     .window(1990, 2017)
//!     .degenerate_policy(DegeneratePolicy::Fail)
//!     .build();
//! assert_eq!(strict.blending.degenerate_policy, DegeneratePolicy::Fail);
//! ```
//!
//! # Configuration File
//!
//! Place a `.seds-index.yaml` file in your project root or `~/.config/seds-index/`:
//!
//! ```yaml
//! store:
//!   data_file: ./data/seds.json
//! indicators:
//!   window_start: 1990
//! blending:
//!   degenerate_policy: fail
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

// Re-export main types
pub use defaults::{
    ConfigPreset, DEFAULT_CACHE_ENTRIES, DEFAULT_DECIMALS, DEFAULT_SCALE_DIVISOR,
    DEFAULT_WINDOW_END, DEFAULT_WINDOW_START, LEGACY_WINDOW_END, LEGACY_WINDOW_START,
};
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, BlendConfig, CacheConfig, DegeneratePolicy,
    IndicatorConfig, OutputConfig, PipelineConfig, StoreConfig,
};
pub use validation::{ConfigError, Validatable};

// Re-export file utilities
pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError, ConfigOverrides,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.seds-index.yaml` config files. It can be used by editors for
/// validation and autocompletion.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
