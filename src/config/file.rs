//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::defaults::{ConfigPreset, DEFAULT_WINDOW_END, DEFAULT_WINDOW_START};
use super::types::{AppConfig, DegeneratePolicy};
use crate::model::Year;
use crate::reports::ReportFormat;
use crate::store::DataFileFormat;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".seds-index.yaml",
    ".seds-index.yml",
    "seds-index.yaml",
    "seds-index.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/seds-index/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    // 1. Use explicit path if provided
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    // 2. Search current directory
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(path) = find_config_in_dir(&cwd) {
            return Some(path);
        }
    }

    // 3. Search git root (if in a repo)
    if let Some(git_root) = find_git_root() {
        if let Some(path) = find_config_in_dir(&git_root) {
            return Some(path);
        }
    }

    // 4. Search user config directory
    if let Some(config_dir) = dirs::config_dir() {
        if let Some(path) = find_config_in_dir(&config_dir.join("seds-index")) {
            return Some(path);
        }
    }

    // 5. Search home directory
    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

/// Values given explicitly on the command line.
///
/// `Some` always wins over the config file, even when it equals the
/// built-in default. Flags can only switch a setting on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub data_file: Option<PathBuf>,
    pub data_format: Option<DataFileFormat>,
    pub window_start: Option<Year>,
    pub window_end: Option<Year>,
    pub scale_divisor: Option<f64>,
    pub degenerate_policy: Option<DegeneratePolicy>,
    pub output_format: Option<ReportFormat>,
    pub output_file: Option<PathBuf>,
    pub rank_weight: Option<f64>,
    pub top: Option<usize>,
    pub include_tables: bool,
    pub fail_on_state_errors: bool,
    pub quiet: bool,
    pub no_color: bool,
}

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only values that differ from the defaults are taken from `other`. This
    /// layers presets over a file; explicit CLI values go through
    /// [`AppConfig::apply_overrides`].
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        // Store config
        if other.store.data_file.is_some() {
            self.store.data_file.clone_from(&other.store.data_file);
        }
        if other.store.format != defaults.store.format {
            self.store.format = other.store.format;
        }

        // Indicator config
        if other.indicators.window_start != DEFAULT_WINDOW_START {
            self.indicators.window_start = other.indicators.window_start;
        }
        if other.indicators.window_end != DEFAULT_WINDOW_END {
            self.indicators.window_end = other.indicators.window_end;
        }
        if other.indicators.scale_divisor != defaults.indicators.scale_divisor {
            self.indicators.scale_divisor = other.indicators.scale_divisor;
        }
        if other.indicators.decimals != defaults.indicators.decimals {
            self.indicators.decimals = other.indicators.decimals;
        }

        // Blend config
        if other.blending.degenerate_policy != DegeneratePolicy::Constant {
            self.blending.degenerate_policy = other.blending.degenerate_policy;
        }
        if other.blending.fallback_value != defaults.blending.fallback_value {
            self.blending.fallback_value = other.blending.fallback_value;
        }
        if other.blending.decimals != defaults.blending.decimals {
            self.blending.decimals = other.blending.decimals;
        }

        // Cache config
        if other.cache.max_entries != defaults.cache.max_entries {
            self.cache.max_entries = other.cache.max_entries;
        }

        // Output config - only override if explicitly set
        if other.output.format != defaults.output.format {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.no_color {
            self.output.no_color = true;
        }
        if other.output.rank_weight != defaults.output.rank_weight {
            self.output.rank_weight = other.output.rank_weight;
        }
        if other.output.top.is_some() {
            self.output.top = other.output.top;
        }
        if other.output.include_tables {
            self.output.include_tables = true;
        }

        // Behavior config (booleans - if set to true, override)
        if other.behavior.fail_on_state_errors {
            self.behavior.fail_on_state_errors = true;
        }
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
    }

    /// Apply explicit command-line values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(path) = &overrides.data_file {
            self.store.data_file = Some(path.clone());
        }
        if let Some(format) = overrides.data_format {
            self.store.format = format;
        }
        if let Some(start) = overrides.window_start {
            self.indicators.window_start = start;
        }
        if let Some(end) = overrides.window_end {
            self.indicators.window_end = end;
        }
        if let Some(divisor) = overrides.scale_divisor {
            self.indicators.scale_divisor = divisor;
        }
        if let Some(policy) = overrides.degenerate_policy {
            self.blending.degenerate_policy = policy;
        }
        if let Some(format) = overrides.output_format {
            self.output.format = format;
        }
        if let Some(path) = &overrides.output_file {
            self.output.file = Some(path.clone());
        }
        if let Some(weight) = overrides.rank_weight {
            self.output.rank_weight = weight;
        }
        if let Some(top) = overrides.top {
            self.output.top = Some(top);
        }
        self.output.include_tables |= overrides.include_tables;
        self.behavior.fail_on_state_errors |= overrides.fail_on_state_errors;
        self.behavior.quiet |= overrides.quiet;
        self.output.no_color |= overrides.no_color;
    }

    /// Load from file, layer the preset over it, then apply CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        preset: Option<ConfigPreset>,
        cli_overrides: &ConfigOverrides,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        if let Some(preset) = preset {
            config.merge(&Self::from_preset(preset));
        }
        config.apply_overrides(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# seds-index configuration
# Place this file at .seds-index.yaml in your project root or ~/.config/seds-index/

{}
",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# seds-index Configuration File
# ==============================
#
# This file configures seds-index behavior. Place it at:
#   - .seds-index.yaml in your project root
#   - ~/.config/seds-index/seds-index.yaml for global config
#
# CLI arguments always override file settings.

# Record store
store:
  # Default record file (omit to require --data on the command line)
  # data_file: ./data/seds.json
  # Layout: auto, json (one array) or json-lines (one record per line)
  format: auto

# Indicator computation
indicators:
  # Analysis window, inclusive, within 1960-2017
  window_start: 2000
  window_end: 2017
  # Consumption is divided by this before scoring
  scale_divisor: 100000.0
  # Decimal places kept in raw scores
  decimals: 3

# Normalization and blending
blending:
  # When every state ties on a metric: constant or fail
  degenerate_policy: constant
  # Scaled value assigned under the constant policy
  fallback_value: 0.0
  decimals: 3

# Memoization of completed runs (library embedders only)
cache:
  max_entries: 16

# Output configuration
output:
  # Format: auto, summary, json, csv
  format: auto
  # Output file path (omit for stdout)
  # file: scores.json
  # Disable colored output
  no_color: false
  # Index weight used to rank states in the summary
  rank_weight: 0.5
  # Show only the first N states
  # top: 10
  # Include per-state sector tables in JSON reports
  include_tables: false

# Behavior flags
behavior:
  # Exit with code 1 if any state could not be scored
  fail_on_state_errors: false
  # Suppress non-essential output
  quiet: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".seds-index.yaml");
        std::fs::write(&config_path, "indicators:\n  window_start: 1990\n").unwrap();

        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert!(find_config_in_dir(tmp.path()).is_none());
    }

    #[test]
    fn test_explicit_path_wins() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom.yaml");
        std::fs::write(&config_path, "behavior:\n  quiet: true\n").unwrap();

        assert_eq!(discover_config_file(Some(&config_path)), Some(config_path));
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            "indicators:\n  window_start: 1960\n  window_end: 2000\nblending:\n  degenerate_policy: fail\noutput:\n  format: csv"
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.indicators.window(), 1960..=2000);
        assert_eq!(config.blending.degenerate_policy, DegeneratePolicy::Fail);
        assert_eq!(config.output.format, ReportFormat::Csv);
    }

    #[test]
    fn test_load_empty_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("empty.yaml");
        std::fs::write(&config_path, "\n").unwrap();

        assert_eq!(load_config_file(&config_path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config_file(Path::new("/nonexistent/seds-index.yaml")).unwrap_err();
        assert!(matches!(err, ConfigFileError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("bad.yaml");
        std::fs::write(&config_path, "indicators: [unclosed").unwrap();

        let err = load_config_file(&config_path).unwrap_err();
        assert!(matches!(err, ConfigFileError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_explicit_default_value_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(".seds-index.yaml");
        std::fs::write(
            &config_path,
            "indicators:\n  window_start: 1990\n  window_end: 2010\noutput:\n  format: csv\n",
        )
        .unwrap();

        let overrides = ConfigOverrides {
            window_start: Some(DEFAULT_WINDOW_START),
            output_format: Some(ReportFormat::Auto),
            ..ConfigOverrides::default()
        };
        let (config, loaded_from) =
            AppConfig::from_file_with_overrides(Some(&config_path), None, &overrides);

        assert_eq!(loaded_from, Some(config_path));
        assert_eq!(config.indicators.window(), DEFAULT_WINDOW_START..=2010);
        assert_eq!(config.output.format, ReportFormat::Auto);
    }

    #[test]
    fn test_preset_layers_between_file_and_cli() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(".seds-index.yaml");
        std::fs::write(&config_path, "output:\n  top: 5\n").unwrap();

        let overrides = ConfigOverrides {
            window_end: Some(1995),
            ..ConfigOverrides::default()
        };
        let (config, _) = AppConfig::from_file_with_overrides(
            Some(&config_path),
            Some(ConfigPreset::LegacyWindow),
            &overrides,
        );

        assert_eq!(config.indicators.window(), 1960..=1995);
        assert_eq!(config.output.top, Some(5));
    }

    #[test]
    fn test_override_flags_only_switch_on() {
        let mut config = AppConfig::builder().fail_on_state_errors(true).build();
        config.apply_overrides(&ConfigOverrides {
            quiet: true,
            ..ConfigOverrides::default()
        });
        assert!(config.behavior.fail_on_state_errors);
        assert!(config.behavior.quiet);
        assert!(!config.output.no_color);
    }

    #[test]
    fn test_merge_prefers_explicit_overrides() {
        let mut base = AppConfig::builder()
            .window(1960, 2000)
            .output_format(ReportFormat::Csv)
            .build();
        let overrides = AppConfig::builder()
            .degenerate_policy(DegeneratePolicy::Fail)
            .output_format(ReportFormat::Json)
            .quiet(true)
            .build();

        base.merge(&overrides);

        // File window survives, explicit CLI values win
        assert_eq!(base.indicators.window(), 1960..=2000);
        assert_eq!(base.blending.degenerate_policy, DegeneratePolicy::Fail);
        assert_eq!(base.output.format, ReportFormat::Json);
        assert!(base.behavior.quiet);
    }

    #[test]
    fn test_merge_cache_capacity() {
        let mut base = AppConfig::default();
        base.merge(&AppConfig::builder().cache_entries(4).build());
        assert_eq!(base.cache.max_entries, 4);
    }

    #[test]
    fn test_generate_example_config() {
        let example = generate_example_config();
        assert!(example.contains("seds-index"));
        assert!(example.contains("window_start"));
    }

    #[test]
    fn test_full_example_config_parses() {
        let config: AppConfig = serde_yaml::from_str(&generate_full_example_config()).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
