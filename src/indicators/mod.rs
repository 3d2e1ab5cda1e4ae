//! Sustainability indicators.
//!
//! Both indicators are computed from a state's "Total All Sectors" table
//! over the configured analysis window:
//!
//! - **Effort Score**: the nonrenewable-minus-renewable gap is integrated
//!   year over year with the trapezoid rule, and a least-squares line is fit
//!   to those integrals against calendar year. The score is the negated
//!   slope, so a shrinking gap scores positive.
//! - **Green Score**: the mean of the renewable-to-nonrenewable ratio.
//!
//! Consumption is divided by the configured scale divisor first.

use crate::config::IndicatorConfig;
use crate::error::{AssemblyErrorKind, ComputationErrorKind, Result, SedsError};
use crate::model::{SectorTable, StateProfile, Year, TOTAL_ALL_SECTORS};
use serde::{Deserialize, Serialize};

/// Fewest window years that yield a meaningful slope.
pub const MIN_WINDOW_YEARS: usize = 3;

/// Raw (unscaled) indicator values for one state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPair {
    pub effort_score: f64,
    pub green_score: f64,
}

/// Computes indicator pairs.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

/// One window year of scaled totals.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WindowRow {
    year: Year,
    rec: f64,
    nec: f64,
}

impl IndicatorEngine {
    #[must_use]
    pub const fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Compute the pair for a state from its "Total All Sectors" table.
    ///
    /// A state whose aggregate sector was never reported fails with
    /// [`AssemblyErrorKind::MissingSector`].
    pub fn compute(&self, profile: &StateProfile) -> Result<IndicatorPair> {
        let table = profile
            .total_all_sectors()
            .filter(|table| table.is_reported())
            .ok_or_else(|| {
                SedsError::assembly(
                    &profile.state,
                    "indicator input",
                    AssemblyErrorKind::MissingSector(TOTAL_ALL_SECTORS.to_string()),
                )
            })?;
        self.compute_table(&profile.state, table)
    }

    /// Compute the pair from an explicit table.
    pub fn compute_table(&self, state: &str, table: &SectorTable) -> Result<IndicatorPair> {
        let rows = self.window_rows(state, table)?;
        let effort_score = self.effort(state, &rows)?;
        let green_score = self.green(state, &rows)?;
        tracing::debug!(state, effort_score, green_score, "Computed indicators");
        Ok(IndicatorPair {
            effort_score,
            green_score,
        })
    }

    fn window_rows(&self, state: &str, table: &SectorTable) -> Result<Vec<WindowRow>> {
        let (start, end) = (self.config.window_start, self.config.window_end);
        let divisor = self.config.scale_divisor;
        let rows: Vec<WindowRow> = table
            .totals_between(start, end)
            .map(|(year, rec, nec)| WindowRow {
                year,
                rec: rec / divisor,
                nec: nec / divisor,
            })
            .collect();

        if rows.len() < MIN_WINDOW_YEARS {
            return Err(SedsError::computation(
                state,
                "analysis window",
                ComputationErrorKind::InsufficientWindow {
                    start,
                    end,
                    years: rows.len(),
                },
            ));
        }
        if let Some(row) = rows
            .iter()
            .find(|row| !row.rec.is_finite() || !row.nec.is_finite())
        {
            return Err(SedsError::computation(
                state,
                "analysis window",
                ComputationErrorKind::NonFinite(format!("totals for {}", row.year)),
            ));
        }
        Ok(rows)
    }

    fn effort(&self, state: &str, rows: &[WindowRow]) -> Result<f64> {
        let years: Vec<Year> = rows.iter().map(|row| row.year).collect();
        let diff: Vec<f64> = rows.iter().map(|row| row.nec - row.rec).collect();
        let integrals = trapezoid_integrals(&years, &diff);

        let slope = ols_slope(&integrals)
            .filter(|slope| slope.is_finite())
            .ok_or_else(|| {
                SedsError::computation(
                    state,
                    "effort score",
                    ComputationErrorKind::NonFinite("trend slope".to_string()),
                )
            })?;

        Ok(normalize_zero(round_to(-slope, self.config.decimals)))
    }

    fn green(&self, state: &str, rows: &[WindowRow]) -> Result<f64> {
        let ratios: Vec<f64> = rows
            .iter()
            .filter(|row| row.nec != 0.0)
            .map(|row| row.rec / row.nec)
            .collect();

        let excluded = rows.len() - ratios.len();
        if excluded > 0 {
            tracing::debug!(
                state,
                excluded,
                "Excluded years with zero nonrenewable consumption from green score"
            );
        }
        if ratios.is_empty() {
            return Err(SedsError::computation(
                state,
                "green score",
                ComputationErrorKind::UndefinedGreenScore {
                    start: self.config.window_start,
                    end: self.config.window_end,
                },
            ));
        }

        let mean = ratios.iter().sum::<f64>() / ratios.len() as f64;
        if !mean.is_finite() {
            return Err(SedsError::computation(
                state,
                "green score",
                ComputationErrorKind::NonFinite("renewable ratio".to_string()),
            ));
        }
        Ok(normalize_zero(round_to(mean, self.config.decimals)))
    }
}

/// Two-point trapezoid integrals of `values` over consecutive `years`.
///
/// Each integral is keyed by the later year of its pair, so `n` points give
/// `n - 1` integrals.
#[must_use]
pub fn trapezoid_integrals(years: &[Year], values: &[f64]) -> Vec<(f64, f64)> {
    years
        .windows(2)
        .zip(values.windows(2))
        .map(|(y, v)| {
            let width = f64::from(y[1] - y[0]);
            (f64::from(y[1]), (v[0] + v[1]) / 2.0 * width)
        })
        .collect()
}

/// Ordinary least-squares slope of `y` on `x`.
///
/// `None` with fewer than two points or when every `x` is equal.
#[must_use]
pub fn ols_slope(points: &[(f64, f64)]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let (num, den) = points.iter().fold((0.0, 0.0), |(num, den), &(x, y)| {
        let dx = x - mean_x;
        (num + dx * (y - mean_y), den + dx * dx)
    });
    (den != 0.0).then(|| num / den)
}

/// Round half away from zero to `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(15) as i32);
    (value * factor).round() / factor
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}
