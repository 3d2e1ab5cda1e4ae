//! Unified error types for seds-index.
//!
//! Errors are grouped by pipeline stage. Assembly and computation errors
//! always carry the state they belong to, so the pipeline can isolate a
//! failing state instead of aborting the whole run. Scaling errors describe
//! the cohort as a whole and are fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for seds-index operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SedsError {
    /// Errors reading or validating records at the repository boundary
    #[error("Record store error: {context}")]
    Store {
        context: String,
        #[source]
        source: StoreErrorKind,
    },

    /// Errors building a state's sector tables
    #[error("Assembly failed for {state}: {context}")]
    Assembly {
        state: String,
        context: String,
        #[source]
        source: AssemblyErrorKind,
    },

    /// Errors computing a state's indicator pair
    #[error("Indicator computation failed for {state}: {context}")]
    Computation {
        state: String,
        context: String,
        #[source]
        source: ComputationErrorKind,
    },

    /// Errors scaling a metric across the state cohort
    #[error("Scaling failed for {metric}: {context}")]
    Scaling {
        metric: String,
        context: String,
        #[source]
        source: ScalingErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific store error kinds
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum StoreErrorKind {
    #[error("Missing required field: {field} in {context}")]
    MissingField { field: String, context: String },

    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    #[error("Unknown state: {0}")]
    UnknownState(String),

    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),
}

/// Specific assembly error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AssemblyErrorKind {
    #[error("Sector '{0}' not reported")]
    MissingSector(String),

    #[error("Series '{column}' has {len} points (expected {expected} or {expected_with_extra})")]
    SeriesLengthMismatch {
        column: String,
        len: usize,
        expected: usize,
        expected_with_extra: usize,
    },

    #[error("Series '{column}' has no value for year {year}")]
    YearCoverage { column: String, year: i32 },
}

/// Specific computation error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ComputationErrorKind {
    #[error("Window {start}-{end} holds {years} years; the trend regression needs at least 3")]
    InsufficientWindow { start: i32, end: i32, years: usize },

    #[error("Nonrenewable consumption is zero for every year in {start}-{end}")]
    UndefinedGreenScore { start: i32, end: i32 },

    #[error("Non-finite value in {0}")]
    NonFinite(String),
}

/// Specific scaling error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScalingErrorKind {
    #[error("All {count} values equal {value}; min-max scaling is undefined")]
    Degenerate { count: usize, value: f64 },

    #[error("No values to scale")]
    EmptyCohort,

    #[error("Non-finite value for {0}")]
    NonFinite(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for seds-index operations
pub type Result<T> = std::result::Result<T, SedsError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl SedsError {
    /// Create a store error with context
    pub fn store(context: impl Into<String>, source: StoreErrorKind) -> Self {
        Self::Store {
            context: context.into(),
            source,
        }
    }

    /// Create a store error for a missing field
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::store(
            "missing required field",
            StoreErrorKind::MissingField {
                field: field.into(),
                context: context.into(),
            },
        )
    }

    /// Create an assembly error for a state
    pub fn assembly(
        state: impl Into<String>,
        context: impl Into<String>,
        source: AssemblyErrorKind,
    ) -> Self {
        Self::Assembly {
            state: state.into(),
            context: context.into(),
            source,
        }
    }

    /// Create a computation error for a state
    pub fn computation(
        state: impl Into<String>,
        context: impl Into<String>,
        source: ComputationErrorKind,
    ) -> Self {
        Self::Computation {
            state: state.into(),
            context: context.into(),
            source,
        }
    }

    /// Create a scaling error for a metric
    pub fn scaling(
        metric: impl Into<String>,
        context: impl Into<String>,
        source: ScalingErrorKind,
    ) -> Self {
        Self::Scaling {
            metric: metric.into(),
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The state this error belongs to, for per-state failures.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        match self {
            Self::Assembly { state, .. } | Self::Computation { state, .. } => Some(state),
            _ => None,
        }
    }

    /// Whether this error only invalidates one state of the cohort.
    #[must_use]
    pub const fn is_state_local(&self) -> bool {
        matches!(self, Self::Assembly { .. } | Self::Computation { .. })
    }

    /// This error and its sources, outermost first, joined by ": ".
    #[must_use]
    pub fn describe(&self) -> String {
        let mut text = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            text.push_str(": ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        text
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for SedsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for SedsError {
    fn from(err: serde_json::Error) -> Self {
        Self::store(
            "JSON deserialization",
            StoreErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain, outermost first:
///
/// ```ignore
/// use seds_index::error::ErrorContext;
///
/// let records = load_records(path)
///     .with_context(|| format!("loading {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SedsError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: SedsError, new_ctx: &str) -> SedsError {
    match err {
        SedsError::Store {
            context: existing,
            source,
        } => SedsError::Store {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SedsError::Assembly {
            state,
            context: existing,
            source,
        } => SedsError::Assembly {
            state,
            context: chain_context(new_ctx, &existing),
            source,
        },
        SedsError::Computation {
            state,
            context: existing,
            source,
        } => SedsError::Computation {
            state,
            context: chain_context(new_ctx, &existing),
            source,
        },
        SedsError::Scaling {
            metric,
            context: existing,
            source,
        } => SedsError::Scaling {
            metric,
            context: chain_context(new_ctx, &existing),
            source,
        },
        SedsError::Io {
            path,
            message,
            source,
        } => SedsError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        SedsError::Config(msg) => SedsError::Config(chain_context(new_ctx, &msg)),
        SedsError::Validation(msg) => SedsError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| SedsError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| SedsError::Validation(f().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_state() {
        let err = SedsError::computation(
            "Ohio",
            "effort score",
            ComputationErrorKind::InsufficientWindow {
                start: 2016,
                end: 2017,
                years: 2,
            },
        );
        let display = err.to_string();
        assert!(display.contains("Ohio"), "{display}");
        assert_eq!(err.state(), Some("Ohio"));
        assert!(err.is_state_local());
    }

    #[test]
    fn test_scaling_error_is_fatal() {
        let err = SedsError::scaling(
            "effort_score",
            "cohort",
            ScalingErrorKind::Degenerate {
                count: 3,
                value: 1.0,
            },
        );
        assert!(!err.is_state_local());
        assert_eq!(err.state(), None);
        assert!(err.to_string().contains("effort_score"));
    }

    #[test]
    fn test_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = SedsError::io("/path/to/records.json", io_err);

        assert!(err.to_string().contains("/path/to/records.json"));
    }

    #[test]
    fn test_context_chaining() {
        let initial_err: Result<()> = Err(SedsError::assembly(
            "Texas",
            "initial context",
            AssemblyErrorKind::MissingSector("Total All Sectors".to_string()),
        ));

        match initial_err.context("outer context") {
            Err(SedsError::Assembly { state, context, .. }) => {
                assert_eq!(state, "Texas");
                assert_eq!(context, "outer context: initial context");
            }
            _ => panic!("Expected Assembly error"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(SedsError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_option_context() {
        let none_value: Option<i32> = None;
        match none_value.context_none("missing value") {
            Err(SedsError::Validation(msg)) => assert_eq!(msg, "missing value"),
            _ => panic!("Expected Validation error"),
        }
        assert_eq!(Some(7).context_none("unused").ok(), Some(7));
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
