//! Blend weights.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Weight given to the effort score in a Sustainability Index blend.
///
/// Held as whole tenths so the eleven weights compare and hash exactly.
/// Serializes as its label, `SI_0.0` through `SI_1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SiWeight(u8);

impl SiWeight {
    /// Number of weights.
    pub const COUNT: usize = 11;
    /// Weight 0.0: the index is the green score alone.
    pub const GREEN_ONLY: Self = Self(0);
    /// Weight 1.0: the index is the effort score alone.
    pub const EFFORT_ONLY: Self = Self(10);

    #[must_use]
    pub const fn from_tenths(tenths: u8) -> Option<Self> {
        if tenths <= 10 {
            Some(Self(tenths))
        } else {
            None
        }
    }

    /// The weight nearest `value`, if `value` is a multiple of 0.1 in [0, 1].
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        let tenths = (value * 10.0).round();
        if !(0.0..=10.0).contains(&tenths) || (value * 10.0 - tenths).abs() > 1e-6 {
            return None;
        }
        Self::from_tenths(tenths as u8)
    }

    #[must_use]
    pub const fn tenths(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn value(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// Column label, e.g. `SI_0.3`.
    #[must_use]
    pub fn label(self) -> String {
        format!("SI_{}.{}", self.0 / 10, self.0 % 10)
    }

    /// All eleven weights, ascending.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=10).map(Self)
    }
}

impl Default for SiWeight {
    fn default() -> Self {
        Self(5)
    }
}

impl std::fmt::Display for SiWeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for SiWeight {
    type Err = String;

    /// Accepts a label (`SI_0.3`) or a bare number (`0.3`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let number = s.strip_prefix("SI_").unwrap_or(s);
        number
            .parse::<f64>()
            .ok()
            .and_then(Self::from_f64)
            .ok_or_else(|| format!("invalid index weight '{s}': expected 0.0, 0.1, ..., 1.0"))
    }
}

impl From<SiWeight> for String {
    fn from(weight: SiWeight) -> Self {
        weight.label()
    }
}

impl TryFrom<String> for SiWeight {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
