//! Pipeline orchestration for sustainability scoring.
//!
//! Store → Assembler → Indicators run per state on the rayon pool; blending
//! waits for every state's indicators, then scales the cohort at once.
//!
//! A state whose records cannot be fetched, assembled or scored is dropped
//! from the cohort and reported as a [`StateFailure`]. Failing to list the
//! states or to scale the cohort aborts the run.

mod cache;
mod output;

pub use cache::{
    config_fingerprint, CacheStats, CachedPipeline, CachedRun, RunCacheKey, ScoreCache,
};
pub use output::{auto_detect_format, should_use_color, write_output, OutputTarget};

use crate::assembler::assemble_state_profile;
use crate::blend::{IndexBlender, SiWeight, SustainabilityProfile};
use crate::config::PipelineConfig;
use crate::error::{ErrorContext, Result, SedsError};
use crate::indicators::{IndicatorEngine, IndicatorPair};
use crate::model::StateProfile;
use crate::store::EnergyRepository;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Stage at which a state dropped out of the cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Store,
    Assembly,
    Indicators,
}

impl PipelineStage {
    /// Stage an error originated from.
    #[must_use]
    pub const fn of(error: &SedsError) -> Self {
        match error {
            SedsError::Store { .. } | SedsError::Io { .. } => Self::Store,
            SedsError::Computation { .. } => Self::Indicators,
            _ => Self::Assembly,
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store => write!(f, "store"),
            Self::Assembly => write!(f, "assembly"),
            Self::Indicators => write!(f, "indicators"),
        }
    }
}

/// A state excluded from the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFailure {
    pub state: String,
    pub stage: PipelineStage,
    pub reason: String,
}

/// Everything a run produced.
///
/// All maps are in cohort order, which is the repository's state order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineOutput {
    /// Content hash of the snapshot the run was computed from
    pub snapshot_hash: u64,
    /// Sector tables of every scored state
    pub profiles: IndexMap<String, StateProfile>,
    /// Raw indicator pairs of every scored state
    pub indicators: IndexMap<String, IndicatorPair>,
    /// Scaled scores and index values of every scored state
    pub scores: IndexMap<String, SustainabilityProfile>,
    /// States that dropped out
    pub failures: Vec<StateFailure>,
}

impl PipelineOutput {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// States ordered by index value at `weight`, highest first.
    ///
    /// Ties keep cohort order.
    #[must_use]
    pub fn ranking(&self, weight: SiWeight) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .scores
            .iter()
            .filter_map(|(state, profile)| Some((state.as_str(), profile.index(weight)?)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Orchestrates one scoring run over an injected repository.
pub struct SustainabilityPipeline<R> {
    repo: R,
    config: PipelineConfig,
    engine: IndicatorEngine,
    blender: IndexBlender,
}

impl<R: EnergyRepository> SustainabilityPipeline<R> {
    #[must_use]
    pub fn new(repo: R, config: PipelineConfig) -> Self {
        Self {
            engine: IndicatorEngine::new(config.indicators.clone()),
            blender: IndexBlender::new(config.blending.clone()),
            repo,
            config,
        }
    }

    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repo
    }

    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Assemble every sector table for one state.
    pub fn assemble(&self, state: &str) -> Result<StateProfile> {
        let records = self
            .repo
            .records_for_state(state)
            .with_context(|| format!("fetching records for {state}"))?;
        assemble_state_profile(state, &records)
    }

    /// Assemble and compute indicators for one state.
    pub fn score_state(&self, state: &str) -> Result<(StateProfile, IndicatorPair)> {
        let profile = self.assemble(state)?;
        let pair = self.engine.compute(&profile)?;
        Ok((profile, pair))
    }

    /// Run the whole pipeline.
    pub fn run(&self) -> Result<PipelineOutput> {
        let states = self.repo.states().context("listing states")?;
        let snapshot_hash = self.repo.snapshot_hash().context("hashing snapshot")?;
        tracing::info!("Scoring {} states", states.len());

        let results: Vec<(String, Result<(StateProfile, IndicatorPair)>)> = states
            .into_par_iter()
            .map(|state| {
                let result = self.score_state(&state);
                (state, result)
            })
            .collect();

        let mut output = PipelineOutput {
            snapshot_hash,
            ..PipelineOutput::default()
        };
        for (state, result) in results {
            match result {
                Ok((profile, pair)) => {
                    output.profiles.insert(state.clone(), profile);
                    output.indicators.insert(state, pair);
                }
                Err(err) => {
                    tracing::warn!("Excluding {}: {}", state, err);
                    output.failures.push(StateFailure {
                        stage: PipelineStage::of(&err),
                        reason: err.describe(),
                        state,
                    });
                }
            }
        }

        output.scores = self.blender.blend(&output.indicators)?;
        tracing::info!(
            "Scored {} states ({} excluded)",
            output.scores.len(),
            output.failures.len()
        );
        Ok(output)
    }
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// Some states failed and `--fail-on-state-errors` was set
    pub const STATE_FAILURES: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 2;
}
