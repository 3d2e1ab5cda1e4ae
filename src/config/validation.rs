//! Configuration validation for seds-index.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{
    AppConfig, BehaviorConfig, BlendConfig, CacheConfig, IndicatorConfig, OutputConfig,
    StoreConfig,
};
use crate::blend::SiWeight;
use crate::indicators::MIN_WINDOW_YEARS;
use crate::model::{FIRST_YEAR, LAST_YEAR};

/// Largest number of decimal places accepted for rounding.
const MAX_DECIMALS: u32 = 10;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.store.validate());
        errors.extend(self.indicators.validate());
        errors.extend(self.blending.validate());
        errors.extend(self.cache.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for StoreConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(ref data_file) = self.data_file {
            if !data_file.exists() {
                errors.push(ConfigError {
                    field: "store.data_file".to_string(),
                    message: format!("Data file not found: {}", data_file.display()),
                });
            }
        }
        errors
    }
}

impl Validatable for IndicatorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let covered = FIRST_YEAR..=LAST_YEAR;

        for (field, year) in [
            ("indicators.window_start", self.window_start),
            ("indicators.window_end", self.window_end),
        ] {
            if !covered.contains(&year) {
                errors.push(ConfigError {
                    field: field.to_string(),
                    message: format!(
                        "Year must be between {FIRST_YEAR} and {LAST_YEAR}, got {year}"
                    ),
                });
            }
        }

        if self.window_start > self.window_end {
            errors.push(ConfigError {
                field: "indicators.window_start".to_string(),
                message: format!(
                    "Window start {} is after window end {}",
                    self.window_start, self.window_end
                ),
            });
        } else {
            let years = usize::try_from(self.window_end - self.window_start + 1).unwrap_or(0);
            if years < MIN_WINDOW_YEARS {
                errors.push(ConfigError {
                    field: "indicators.window_end".to_string(),
                    message: format!(
                        "Window must span at least {MIN_WINDOW_YEARS} years, got {years}"
                    ),
                });
            }
        }

        if !self.scale_divisor.is_finite() || self.scale_divisor <= 0.0 {
            errors.push(ConfigError {
                field: "indicators.scale_divisor".to_string(),
                message: format!(
                    "Scale divisor must be a positive number, got {}",
                    self.scale_divisor
                ),
            });
        }

        if self.decimals > MAX_DECIMALS {
            errors.push(ConfigError {
                field: "indicators.decimals".to_string(),
                message: format!("Decimals must be at most {MAX_DECIMALS}, got {}", self.decimals),
            });
        }

        errors
    }
}

impl Validatable for BlendConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !(0.0..=1.0).contains(&self.fallback_value) {
            errors.push(ConfigError {
                field: "blending.fallback_value".to_string(),
                message: format!(
                    "Fallback value must be between 0.0 and 1.0, got {}",
                    self.fallback_value
                ),
            });
        }

        if self.decimals > MAX_DECIMALS {
            errors.push(ConfigError {
                field: "blending.decimals".to_string(),
                message: format!("Decimals must be at most {MAX_DECIMALS}, got {}", self.decimals),
            });
        }

        errors
    }
}

impl Validatable for CacheConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.max_entries == 0 {
            errors.push(ConfigError {
                field: "cache.max_entries".to_string(),
                message: "Cache must hold at least 1 run".to_string(),
            });
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // Validate output file path if specified
        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError {
                        field: "output.file".to_string(),
                        message: format!("Parent directory does not exist: {}", parent.display()),
                    });
                }
            }
        }

        if SiWeight::from_f64(self.rank_weight).is_none() {
            errors.push(ConfigError {
                field: "output.rank_weight".to_string(),
                message: format!(
                    "Rank weight must be one of 0.0, 0.1, ..., 1.0, got {}",
                    self.rank_weight
                ),
            });
        }

        if self.top == Some(0) {
            errors.push(ConfigError {
                field: "output.top".to_string(),
                message: "Top must show at least 1 state".to_string(),
            });
        }

        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        // BehaviorConfig contains only boolean flags that don't need validation
        Vec::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigPreset;

    #[test]
    fn test_presets_are_valid() {
        for preset in ConfigPreset::all() {
            let config = AppConfig::from_preset(*preset);
            assert!(config.is_valid(), "{preset}: {:?}", config.validate());
        }
    }

    #[test]
    fn test_window_outside_index() {
        let config = IndicatorConfig {
            window_start: 1950,
            window_end: 2018,
            ..IndicatorConfig::default()
        };
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["indicators.window_start", "indicators.window_end"]
        );
    }

    #[test]
    fn test_window_reversed_and_short() {
        let reversed = IndicatorConfig {
            window_start: 2010,
            window_end: 2000,
            ..IndicatorConfig::default()
        };
        assert!(!reversed.is_valid());

        let short = IndicatorConfig {
            window_start: 2016,
            window_end: 2017,
            ..IndicatorConfig::default()
        };
        let errors = short.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("at least 3 years"));

        let minimal = IndicatorConfig {
            window_start: 2015,
            window_end: 2017,
            ..IndicatorConfig::default()
        };
        assert!(minimal.is_valid());
    }

    #[test]
    fn test_scale_divisor_must_be_positive() {
        for divisor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = IndicatorConfig {
                scale_divisor: divisor,
                ..IndicatorConfig::default()
            };
            assert!(!config.is_valid(), "divisor {divisor}");
        }
    }

    #[test]
    fn test_blend_fallback_range() {
        let invalid = BlendConfig {
            fallback_value: 1.5,
            ..BlendConfig::default()
        };
        assert!(!invalid.is_valid());
        let valid = BlendConfig {
            fallback_value: 0.5,
            ..BlendConfig::default()
        };
        assert!(valid.is_valid());
    }

    #[test]
    fn test_cache_capacity() {
        let invalid = CacheConfig {
            max_entries: 0,
            ..CacheConfig::default()
        };
        assert!(!invalid.is_valid());
    }

    #[test]
    fn test_rank_weight_grid() {
        let off_grid = OutputConfig {
            rank_weight: 0.55,
            ..OutputConfig::default()
        };
        assert!(!off_grid.is_valid());
        let on_grid = OutputConfig {
            rank_weight: 0.7,
            ..OutputConfig::default()
        };
        assert!(on_grid.is_valid());
    }

    #[test]
    fn test_missing_data_file() {
        let config = StoreConfig {
            data_file: Some("/nonexistent/seds.json".into()),
            ..StoreConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors[0].field, "store.data_file");
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError {
            field: "test_field".to_string(),
            message: "test error message".to_string(),
        };
        assert_eq!(error.to_string(), "test_field: test error message");
    }
}
