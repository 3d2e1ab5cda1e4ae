//! Default configurations and presets for seds-index.
//!
//! Provides named presets for common use cases and default values.

use super::types::{AppConfig, BehaviorConfig, BlendConfig, DegeneratePolicy, IndicatorConfig, OutputConfig};
use crate::model::Year;
use clap::ValueEnum;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigPreset {
    /// Default settings: 2000-2017 window, tolerant scaling
    Default,
    /// The 1960-2000 window scored by the first published dashboard
    LegacyWindow,
    /// CI: JSON output, strict scaling, fail on excluded states
    Ci,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::LegacyWindow => "legacy-window",
            Self::Ci => "ci",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "legacy-window" | "legacy" => Some(Self::LegacyWindow),
            "ci" | "ci-cd" | "pipeline" => Some(Self::Ci),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Scores trends from 2000 onward; ties scale to a constant",
            Self::LegacyWindow => "Scores the 1960-2000 window",
            Self::Ci => "JSON output, fails on degenerate scaling and excluded states",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::LegacyWindow, Self::Ci]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::LegacyWindow => Self::legacy_window_preset(),
            ConfigPreset::Ci => Self::ci_preset(),
        }
    }

    /// Legacy window preset.
    ///
    /// - Window 1960-2000
    #[must_use]
    pub fn legacy_window_preset() -> Self {
        Self {
            indicators: IndicatorConfig {
                window_start: LEGACY_WINDOW_START,
                window_end: LEGACY_WINDOW_END,
                ..IndicatorConfig::default()
            },
            ..Self::default()
        }
    }

    /// CI pipeline preset.
    ///
    /// - JSON output for machine parsing
    /// - Degenerate scaling is an error
    /// - Exit 1 when any state was excluded
    #[must_use]
    pub fn ci_preset() -> Self {
        use crate::reports::ReportFormat;

        Self {
            blending: BlendConfig {
                degenerate_policy: DegeneratePolicy::Fail,
                ..BlendConfig::default()
            },
            output: OutputConfig {
                format: ReportFormat::Json,
                no_color: true,
                ..OutputConfig::default()
            },
            behavior: BehaviorConfig {
                fail_on_state_errors: true,
                quiet: true,
            },
            ..Self::default()
        }
    }
}

// ============================================================================
// Default Value Constants
// ============================================================================

/// Default first year of the analysis window.
pub const DEFAULT_WINDOW_START: Year = 2000;

/// Default last year of the analysis window.
pub const DEFAULT_WINDOW_END: Year = 2017;

/// First year of the legacy analysis window.
pub const LEGACY_WINDOW_START: Year = 1960;

/// Last year of the legacy analysis window.
pub const LEGACY_WINDOW_END: Year = 2000;

/// Default divisor applied to consumption before scoring.
pub const DEFAULT_SCALE_DIVISOR: f64 = 100_000.0;

/// Default decimal places kept in scores.
pub const DEFAULT_DECIMALS: u32 = 3;

/// Default number of memoized runs.
pub const DEFAULT_CACHE_ENTRIES: usize = 16;

// ============================================================================
// Tests
// ============================================================================
