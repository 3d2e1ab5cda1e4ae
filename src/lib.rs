//! **Sustainability Index of U.S. state energy consumption.**
//!
//! `seds-index` turns the EIA State Energy Data System consumption series
//! into two indicators per state and eleven blends of them:
//!
//! - **Effort Score**: how fast the state closes the gap between
//!   nonrenewable and renewable consumption over the analysis window.
//! - **Green Score**: the mean renewable-to-nonrenewable ratio over the
//!   same window.
//! - **Sustainability Index** `SI_0.0` … `SI_1.0`: both scores min-max
//!   scaled across the states, blended with the effort weight running from
//!   0 to 1 in tenths.
//!
//! ## Core Concepts & Modules
//!
//! - **[`store`]**: The [`EnergyRepository`] trait and a validated
//!   in-memory implementation loaded from JSON record files.
//! - **[`model`]**: Series records, the year index, fuel taxonomy, state
//!   codes and per-sector tables.
//! - **[`assembler`]**: Builds each state's sector tables from its records.
//! - **[`indicators`]**: The [`IndicatorEngine`] computing raw effort and
//!   green scores.
//! - **[`blend`]**: Min-max scaling across the cohort and the index blends.
//! - **[`pipeline`]**: Runs every state in parallel, isolates per-state
//!   failures and memoizes completed runs.
//! - **[`presentation`]** and **[`reports`]**: Dashboard shapes and
//!   summary, JSON and CSV reports.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use seds_index::{load_records, AppConfig, DataFileFormat, SiWeight, SustainabilityPipeline};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = load_records(Path::new("seds.json"), DataFileFormat::Auto)?;
//!     let pipeline = SustainabilityPipeline::new(repo, AppConfig::default().pipeline());
//!     let output = pipeline.run()?;
//!
//!     for (state, value) in output.ranking(SiWeight::default()).iter().take(5) {
//!         println!("{state}: {value:.3}");
//!     }
//!     for failure in &output.failures {
//!         eprintln!("excluded {}: {}", failure.state, failure.reason);
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Year counts and tenths are small; the casts cannot lose anything
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Scores are compared exactly after rounding
    clippy::float_cmp
)]

pub mod assembler;
pub mod blend;
pub mod cli;
pub mod config;
pub mod error;
pub mod indicators;
pub mod model;
pub mod pipeline;
pub mod presentation;
pub mod reports;
pub mod store;

// Re-export main types for convenience
pub use assembler::{assemble_sector_table, assemble_state_profile};
pub use blend::{min_max_scale, IndexBlender, SiWeight, SustainabilityProfile};
pub use config::{AppConfig, ConfigPreset, DegeneratePolicy, PipelineConfig};
pub use error::{ErrorContext, OptionContext, Result, SedsError};
pub use indicators::{IndicatorEngine, IndicatorPair};
pub use model::{
    resolve_state, state_code, state_name, AnnualSeries, EnergySource, EnergyType, SectorTable,
    SeriesRecord, StateProfile, Year,
};
pub use pipeline::{CachedPipeline, PipelineOutput, ScoreCache, StateFailure, SustainabilityPipeline};
pub use presentation::{choropleth, score_card, score_table, slider_caption, ScoreRecord};
pub use reports::{ReportFormat, ReportGenerator};
pub use store::{load_records, parse_records_str, DataFileFormat, EnergyRepository, InMemoryRepository};
