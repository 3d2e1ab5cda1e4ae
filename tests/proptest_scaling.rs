//! Property-based tests for scaling, blending weights and the indicator math.
//!
//! Ensures the numeric core holds its invariants across random cohorts and
//! that the record parser never panics on arbitrary input.

use proptest::prelude::*;
use seds_index::blend::{min_max_scale, SiWeight};
use seds_index::config::BlendConfig;
use seds_index::indicators::{ols_slope, round_to, trapezoid_integrals};
use seds_index::store::{parse_records_str, DataFileFormat};

fn cohort() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e3f64..1.0e3, 2..60)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn scaled_values_stay_in_unit_interval(values in cohort()) {
        let scaled = min_max_scale("metric", &values, &BlendConfig::default()).unwrap();
        prop_assert_eq!(scaled.len(), values.len());
        prop_assert!(scaled.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn non_degenerate_cohort_hits_both_ends(values in cohort()) {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assume!(max > min);

        let scaled = min_max_scale("metric", &values, &BlendConfig::default()).unwrap();
        let lo = scaled.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(lo, 0.0);
        prop_assert_eq!(hi, 1.0);
    }

    #[test]
    fn scaling_preserves_order(values in cohort()) {
        let scaled = min_max_scale("metric", &values, &BlendConfig::default()).unwrap();
        for i in 0..values.len() {
            for j in 0..values.len() {
                if values[i] == values[j] {
                    prop_assert_eq!(scaled[i], scaled[j]);
                } else if values[i] < values[j] {
                    prop_assert!(scaled[i] <= scaled[j]);
                }
            }
        }
    }

    #[test]
    fn tied_cohort_gets_fallback(value in -1.0e3f64..1.0e3, n in 1usize..20) {
        let values = vec![value; n];
        let scaled = min_max_scale("metric", &values, &BlendConfig::default()).unwrap();
        prop_assert!(scaled.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn weight_label_parses_back(tenths in 0u8..=10) {
        let weight = SiWeight::from_tenths(tenths).unwrap();
        prop_assert_eq!(weight.label().parse::<SiWeight>(), Ok(weight));
        prop_assert_eq!(SiWeight::from_f64(weight.value()), Some(weight));
    }

    #[test]
    fn weights_off_the_tenths_grid_are_rejected(value in 0.0f64..1.0) {
        let tenths = value * 10.0;
        prop_assume!((tenths - tenths.round()).abs() > 1e-3);
        prop_assert_eq!(SiWeight::from_f64(value), None);
    }

    #[test]
    fn ols_recovers_linear_slope(
        intercept in -1.0e4f64..1.0e4,
        slope in -100.0f64..100.0,
        n in 3usize..40,
    ) {
        let points: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let x = 2000.0 + i as f64;
                (x, intercept + slope * (x - 2000.0))
            })
            .collect();
        let fitted = ols_slope(&points).unwrap();
        prop_assert!((fitted - slope).abs() < 1e-6, "fitted {} vs {}", fitted, slope);
    }

    #[test]
    fn trapezoids_of_constant_series_equal_the_constant(
        value in -1.0e3f64..1.0e3,
        n in 2usize..30,
    ) {
        let years: Vec<i32> = (0..n as i32).map(|i| 1990 + i).collect();
        let values = vec![value; n];
        let integrals = trapezoid_integrals(&years, &values);

        prop_assert_eq!(integrals.len(), n - 1);
        prop_assert_eq!(integrals[0].0, 1991.0);
        prop_assert!(integrals.iter().all(|&(_, area)| area == value));
    }

    #[test]
    fn rounding_is_idempotent(value in -1.0e6f64..1.0e6, decimals in 0u32..6) {
        let once = round_to(value, decimals);
        prop_assert_eq!(round_to(once, decimals), once);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn record_parser_doesnt_panic(s in "\\PC{0,300}") {
        let _ = parse_records_str(&s, DataFileFormat::Auto);
        let _ = parse_records_str(&s, DataFileFormat::JsonLines);
    }
}
