//! Annual series with explicit year keys.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Calendar year.
pub type Year = i32;

/// First year of the common index.
pub const FIRST_YEAR: Year = 1960;
/// Last year of the common index.
pub const LAST_YEAR: Year = 2017;
/// Number of years in the common index.
pub const YEAR_COUNT: usize = (LAST_YEAR - FIRST_YEAR + 1) as usize;

/// The fixed year index every sector table is aligned to.
#[must_use]
pub const fn year_index() -> RangeInclusive<Year> {
    FIRST_YEAR..=LAST_YEAR
}

/// Error produced when building an [`AnnualSeries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesShapeError {
    /// The same year appears twice
    DuplicateYear(Year),
    /// A year between the first and last point is absent
    Gap { after: Year, next: Year },
    /// A value is NaN or infinite
    NonFinite(Year),
}

impl std::fmt::Display for SeriesShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateYear(year) => write!(f, "year {year} appears more than once"),
            Self::Gap { after, next } => write!(f, "gap between {after} and {next}"),
            Self::NonFinite(year) => write!(f, "non-finite value for {year}"),
        }
    }
}

impl std::error::Error for SeriesShapeError {}

/// Ordered sequence of (year, value) points, one per year.
///
/// Years are contiguous and strictly increasing. Points can be supplied in
/// any order; construction sorts them ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(Year, f64)>", into = "Vec<(Year, f64)>")]
pub struct AnnualSeries {
    points: Vec<(Year, f64)>,
}

impl AnnualSeries {
    /// Build a series from points in any order.
    pub fn from_points(
        points: impl IntoIterator<Item = (Year, f64)>,
    ) -> Result<Self, SeriesShapeError> {
        let mut points: Vec<(Year, f64)> = points.into_iter().collect();
        points.sort_by_key(|&(year, _)| year);

        for &(year, value) in &points {
            if !value.is_finite() {
                return Err(SeriesShapeError::NonFinite(year));
            }
        }
        for pair in points.windows(2) {
            let (prev, next) = (pair[0].0, pair[1].0);
            if prev == next {
                return Err(SeriesShapeError::DuplicateYear(prev));
            }
            if next != prev + 1 {
                return Err(SeriesShapeError::Gap { after: prev, next });
            }
        }

        Ok(Self { points })
    }

    /// Build a series from consecutive values starting at `first_year`.
    pub fn from_values(first_year: Year, values: &[f64]) -> Result<Self, SeriesShapeError> {
        Self::from_points(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (first_year + i as Year, v)),
        )
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in ascending year order.
    #[must_use]
    pub fn points(&self) -> &[(Year, f64)] {
        &self.points
    }

    #[must_use]
    pub fn first_year(&self) -> Option<Year> {
        self.points.first().map(|&(year, _)| year)
    }

    #[must_use]
    pub fn last_year(&self) -> Option<Year> {
        self.points.last().map(|&(year, _)| year)
    }

    /// Value recorded for `year`.
    #[must_use]
    pub fn value(&self, year: Year) -> Option<f64> {
        let first = self.first_year()?;
        let offset = usize::try_from(year - first).ok()?;
        self.points.get(offset).map(|&(_, v)| v)
    }

    /// Copy of the series restricted to `years`.
    #[must_use]
    pub fn restricted_to(&self, years: &RangeInclusive<Year>) -> Self {
        Self {
            points: self
                .points
                .iter()
                .copied()
                .filter(|(year, _)| years.contains(year))
                .collect(),
        }
    }

    /// Year-keyed view of the series.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<Year, f64> {
        self.points.iter().copied().collect()
    }
}

impl TryFrom<Vec<(Year, f64)>> for AnnualSeries {
    type Error = SeriesShapeError;

    fn try_from(points: Vec<(Year, f64)>) -> Result<Self, Self::Error> {
        Self::from_points(points)
    }
}

impl From<AnnualSeries> for Vec<(Year, f64)> {
    fn from(series: AnnualSeries) -> Self {
        series.points
    }
}
