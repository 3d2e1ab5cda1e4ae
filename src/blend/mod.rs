//! Index blending and normalization.
//!
//! Raw indicator pairs are min-max scaled across the cohort, then blended
//! into eleven Sustainability Index variants:
//!
//! ```text
//! SI(w) = (w * effort + (1 - w) * green) / 2,   w = 0.0, 0.1, ..., 1.0
//! ```
//!
//! and each variant is min-max scaled across the cohort on its own.

mod weight;

pub use weight::SiWeight;

use crate::config::{BlendConfig, DegeneratePolicy};
use crate::error::{Result, ScalingErrorKind, SedsError};
use crate::indicators::{round_to, IndicatorPair};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Scaled scores and index values for one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityProfile {
    /// Scaled effort score in [0, 1]
    pub effort_score: f64,
    /// Scaled green score in [0, 1]
    pub green_score: f64,
    /// Normalized index per weight, ascending by weight
    pub indices: IndexMap<SiWeight, f64>,
}

impl SustainabilityProfile {
    /// Index value at `weight`.
    #[must_use]
    pub fn index(&self, weight: SiWeight) -> Option<f64> {
        self.indices.get(&weight).copied()
    }
}

/// Min-max scales indicator pairs and blends them.
#[derive(Debug, Clone, Default)]
pub struct IndexBlender {
    config: BlendConfig,
}

impl IndexBlender {
    #[must_use]
    pub const fn new(config: BlendConfig) -> Self {
        Self { config }
    }

    /// Blend every state's pair.
    ///
    /// The output keeps the cohort order of `pairs`. Scaling failures are
    /// fatal to the whole cohort.
    pub fn blend(
        &self,
        pairs: &IndexMap<String, IndicatorPair>,
    ) -> Result<IndexMap<String, SustainabilityProfile>> {
        let effort: Vec<f64> = pairs.values().map(|p| p.effort_score).collect();
        let green: Vec<f64> = pairs.values().map(|p| p.green_score).collect();
        let effort = self.scale("effort_score", &effort)?;
        let green = self.scale("green_score", &green)?;

        let mut per_weight: Vec<(SiWeight, Vec<f64>)> = Vec::with_capacity(SiWeight::COUNT);
        for weight in SiWeight::all() {
            let w = weight.value();
            let raw: Vec<f64> = effort
                .iter()
                .zip(&green)
                .map(|(e, g)| (w * e + (1.0 - w) * g) / 2.0)
                .collect();
            per_weight.push((weight, self.scale(&weight.label(), &raw)?));
        }

        let profiles = pairs
            .keys()
            .enumerate()
            .map(|(i, state)| {
                let indices = per_weight
                    .iter()
                    .map(|(weight, values)| (*weight, values[i]))
                    .collect();
                (
                    state.clone(),
                    SustainabilityProfile {
                        effort_score: effort[i],
                        green_score: green[i],
                        indices,
                    },
                )
            })
            .collect();

        tracing::info!("Blended {} states across {} weights", pairs.len(), SiWeight::COUNT);
        Ok(profiles)
    }

    fn scale(&self, metric: &str, values: &[f64]) -> Result<Vec<f64>> {
        min_max_scale(metric, values, &self.config)
    }
}

/// Min-max scale `values` to [0, 1], rounded to the configured decimals.
///
/// When every value is equal the configured [`DegeneratePolicy`] decides:
/// a constant vector of `fallback_value`, or a [`ScalingErrorKind::Degenerate`]
/// error.
pub fn min_max_scale(metric: &str, values: &[f64], config: &BlendConfig) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(SedsError::scaling(
            metric,
            "min-max scaling",
            ScalingErrorKind::EmptyCohort,
        ));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(SedsError::scaling(
            metric,
            "min-max scaling",
            ScalingErrorKind::NonFinite(metric.to_string()),
        ));
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range == 0.0 {
        return match config.degenerate_policy {
            DegeneratePolicy::Constant => {
                tracing::warn!(
                    metric,
                    value = min,
                    fallback = config.fallback_value,
                    "All states tie; assigning the fallback value"
                );
                Ok(vec![config.fallback_value; values.len()])
            }
            DegeneratePolicy::Fail => Err(SedsError::scaling(
                metric,
                "min-max scaling",
                ScalingErrorKind::Degenerate {
                    count: values.len(),
                    value: min,
                },
            )),
        };
    }

    Ok(values
        .iter()
        .map(|v| round_to((v - min) / range, config.decimals))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(values: &[(&str, f64, f64)]) -> IndexMap<String, IndicatorPair> {
        values
            .iter()
            .map(|&(state, effort_score, green_score)| {
                (
                    state.to_string(),
                    IndicatorPair {
                        effort_score,
                        green_score,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_scaled_range_is_unit_interval() {
        let scaled =
            min_max_scale("x", &[3.0, -1.0, 7.0, 2.5], &BlendConfig::default()).expect("scale");
        assert_eq!(scaled.iter().copied().fold(f64::INFINITY, f64::min), 0.0);
        assert_eq!(scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max), 1.0);
        assert_eq!(scaled, vec![0.5, 0.0, 1.0, 0.438]);
    }

    #[test]
    fn test_ties_scale_identically() {
        let scaled = min_max_scale("x", &[4.0, 1.0, 4.0], &BlendConfig::default()).expect("scale");
        assert_eq!(scaled[0], scaled[2]);
    }

    #[test]
    fn test_degenerate_constant_policy() {
        let config = BlendConfig {
            fallback_value: 0.5,
            ..BlendConfig::default()
        };
        let scaled = min_max_scale("x", &[2.0, 2.0], &config).expect("scale");
        assert_eq!(scaled, vec![0.5, 0.5]);
    }

    #[test]
    fn test_degenerate_fail_policy() {
        let config = BlendConfig {
            degenerate_policy: DegeneratePolicy::Fail,
            ..BlendConfig::default()
        };
        let err = min_max_scale("effort_score", &[2.0, 2.0, 2.0], &config).unwrap_err();
        assert!(matches!(
            err,
            SedsError::Scaling {
                source: ScalingErrorKind::Degenerate { count: 3, .. },
                ..
            }
        ));
        assert!(!err.is_state_local());
    }

    #[test]
    fn test_empty_and_non_finite_rejected() {
        let config = BlendConfig::default();
        assert!(matches!(
            min_max_scale("x", &[], &config),
            Err(SedsError::Scaling {
                source: ScalingErrorKind::EmptyCohort,
                ..
            })
        ));
        assert!(matches!(
            min_max_scale("x", &[1.0, f64::NAN], &config),
            Err(SedsError::Scaling {
                source: ScalingErrorKind::NonFinite(_),
                ..
            })
        ));
    }

    #[test]
    fn test_endpoint_weights_reproduce_scaled_scores() {
        let input = pairs(&[
            ("Ohio", 3.2, 0.11),
            ("Iowa", -1.4, 0.73),
            ("Utah", 0.9, 0.29),
            ("Maine", 2.0, 1.2),
        ]);
        let profiles = IndexBlender::default().blend(&input).expect("blend");
        for profile in profiles.values() {
            assert_eq!(profile.index(SiWeight::GREEN_ONLY), Some(profile.green_score));
            assert_eq!(profile.index(SiWeight::EFFORT_ONLY), Some(profile.effort_score));
            assert_eq!(profile.indices.len(), SiWeight::COUNT);
        }
    }

    #[test]
    fn test_effort_leaning_state_never_drops_in_rank() {
        let input = pairs(&[("Leader", 10.0, 0.0), ("Green", 0.0, 10.0), ("Mixed", 2.0, 6.0)]);
        let profiles = IndexBlender::default().blend(&input).expect("blend");
        let leader = &profiles["Leader"];
        assert!(leader.effort_score > leader.green_score);

        let mut previous_rank = usize::MAX;
        for weight in SiWeight::all() {
            let own = leader.index(weight).expect("index");
            let rank = profiles
                .values()
                .filter(|p| p.index(weight).expect("index") > own)
                .count();
            assert!(rank <= previous_rank, "rank rose at {weight}");
            previous_rank = rank;
        }
    }

    #[test]
    fn test_output_preserves_cohort_order() {
        let input = pairs(&[("Utah", 1.0, 0.2), ("Alabama", 2.0, 0.1), ("Ohio", 0.5, 0.4)]);
        let profiles = IndexBlender::default().blend(&input).expect("blend");
        let order: Vec<&str> = profiles.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["Utah", "Alabama", "Ohio"]);
    }

    #[test]
    fn test_single_state_is_degenerate() {
        let input = pairs(&[("Ohio", 1.0, 0.5)]);
        let profiles = IndexBlender::default().blend(&input).expect("blend");
        assert_eq!(profiles["Ohio"].effort_score, 0.0);

        let strict = IndexBlender::new(BlendConfig {
            degenerate_policy: DegeneratePolicy::Fail,
            ..BlendConfig::default()
        });
        assert!(strict.blend(&input).is_err());
    }
}
