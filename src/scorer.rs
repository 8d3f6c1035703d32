//! Composite KSLS scoring
//!
//! Weights the normalized factors into a single 0-100 Kidney Stress Load
//! Score and a categorical band. Factors without a measurement are dropped
//! and the remaining weights renormalized proportionally, so a sparse
//! observation is scored on what it actually contains rather than on
//! zero-substituted placeholders.

use crate::normalizer::MetricNormalizer;
use crate::types::{Band, Factor, HealthObservation, KslsResult, NormalizedFactors, UserProfile};

/// KSLS band boundaries: [0,33) stable, [33,66) elevated, [66,100] high.
pub const ELEVATED_THRESHOLD: f64 = 33.0;
pub const HIGH_THRESHOLD: f64 = 66.0;

/// Fixed policy weights over the six factors; sum to 1.0 when all are present.
pub const FACTOR_WEIGHTS: [(Factor, f64); 6] = [
    (Factor::Bp, 0.30),
    (Factor::Hydration, 0.20),
    (Factor::Fatigue, 0.15),
    (Factor::Pain, 0.15),
    (Factor::Stress, 0.10),
    (Factor::Weight, 0.10),
];

/// Policy weight for one factor.
pub fn weight_for(factor: Factor) -> f64 {
    FACTOR_WEIGHTS
        .iter()
        .find(|(f, _)| *f == factor)
        .map(|(_, w)| *w)
        .unwrap_or(0.0)
}

/// Composite scorer producing [`KslsResult`]s
pub struct CompositeScorer;

impl CompositeScorer {
    /// Score one observation, normalizing its factors first.
    pub fn score(obs: &HealthObservation, profile: &UserProfile) -> KslsResult {
        let factors = MetricNormalizer::normalize(obs, profile);
        let bmi = MetricNormalizer::bmi(
            obs.weight_kg.or(profile.weight_kg),
            obs.height_cm.or(profile.height_cm),
        );
        Self::score_factors(factors, bmi)
    }

    /// Score pre-normalized factors.
    ///
    /// Weights of absent factors are redistributed proportionally across
    /// the present ones; with no factors at all the score is 0.
    pub fn score_factors(factors: NormalizedFactors, bmi: Option<f64>) -> KslsResult {
        let present: Vec<(f64, f64)> = factors
            .iter()
            .filter_map(|(factor, value)| value.map(|v| (v, weight_for(factor))))
            .collect();

        let weight_sum: f64 = present.iter().map(|(_, w)| w).sum();

        let ksls = if weight_sum > 0.0 {
            let weighted: f64 = present.iter().map(|(v, w)| v * (w / weight_sum)).sum();
            (weighted * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        KslsResult {
            ksls,
            band: Self::classify_band(ksls),
            factors,
            bmi,
        }
    }

    /// Band classification; lower bound of each band is inclusive.
    pub fn classify_band(ksls: f64) -> Band {
        if ksls < ELEVATED_THRESHOLD {
            Band::Stable
        } else if ksls < HIGH_THRESHOLD {
            Band::Elevated
        } else {
            Band::High
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn full_observation() -> HealthObservation {
        let mut obs =
            HealthObservation::new(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(), "user-1");
        obs.systolic_bp = Some(138.0);
        obs.diastolic_bp = Some(85.0);
        obs.hydration_liters = Some(1.0);
        obs.weight_kg = Some(78.0);
        obs.height_cm = Some(162.0);
        obs.pain_level = Some(4.0);
        obs.stress_level = Some(6.0);
        obs.fatigue_level = Some(7.0);
        obs
    }

    fn profile() -> UserProfile {
        UserProfile::new("user-1")
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum: f64 = FACTOR_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_observation_in_range() {
        let result = CompositeScorer::score(&full_observation(), &profile());
        assert!(result.ksls >= 0.0 && result.ksls <= 100.0);
        assert_eq!(result.factors.present_count(), 6);
        assert!(result.bmi.is_some());
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(CompositeScorer::classify_band(0.0), Band::Stable);
        assert_eq!(CompositeScorer::classify_band(32.9), Band::Stable);
        assert_eq!(CompositeScorer::classify_band(33.0), Band::Elevated);
        assert_eq!(CompositeScorer::classify_band(65.9), Band::Elevated);
        assert_eq!(CompositeScorer::classify_band(66.0), Band::High);
        assert_eq!(CompositeScorer::classify_band(100.0), Band::High);
    }

    #[test]
    fn test_monotone_in_systolic() {
        let mut low = full_observation();
        low.systolic_bp = Some(120.0);
        let mut high = full_observation();
        high.systolic_bp = Some(190.0);

        let score_low = CompositeScorer::score(&low, &profile()).ksls;
        let score_high = CompositeScorer::score(&high, &profile()).ksls;
        assert!(score_high >= score_low);
    }

    #[test]
    fn test_monotone_in_each_symptom_factor() {
        for set in [
            |o: &mut HealthObservation, v| o.pain_level = Some(v),
            |o: &mut HealthObservation, v| o.stress_level = Some(v),
            |o: &mut HealthObservation, v| o.fatigue_level = Some(v),
        ] {
            let mut prev = -1.0;
            for level in [0.0, 2.0, 5.0, 8.0, 10.0] {
                let mut obs = full_observation();
                set(&mut obs, level);
                let ksls = CompositeScorer::score(&obs, &profile()).ksls;
                assert!(ksls >= prev, "raising a symptom level lowered the score");
                prev = ksls;
            }
        }
    }

    #[test]
    fn test_renormalization_differs_from_zero_substitution() {
        // bp 0.75 and hydration 1/3 measured, symptoms unmeasured
        let mut obs = HealthObservation::new(
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            "user-1",
        );
        obs.systolic_bp = Some(150.0);
        obs.diastolic_bp = Some(85.0);
        obs.hydration_liters = Some(1.0);

        let result = CompositeScorer::score(&obs, &profile());

        // renormalized: (0.75*0.30 + (1/3)*0.20) / 0.50 * 100 = 58.33
        let expected = (0.75 * 0.30 + (1.0 / 3.0) * 0.20) / 0.50 * 100.0;
        assert!((result.ksls - expected).abs() < 0.01);

        // zero-substitution over all six weights would have given 28.17
        let zero_substituted = (0.75 * 0.30 + (1.0 / 3.0) * 0.20) * 100.0;
        assert!((result.ksls - zero_substituted).abs() > 1.0);
    }

    #[test]
    fn test_missing_factors_are_excluded_not_zeroed() {
        let mut with_nulls = full_observation();
        with_nulls.pain_level = None;
        with_nulls.stress_level = None;
        with_nulls.fatigue_level = None;

        let mut with_zeros = full_observation();
        with_zeros.pain_level = Some(0.0);
        with_zeros.stress_level = Some(0.0);
        with_zeros.fatigue_level = Some(0.0);

        let nulls = CompositeScorer::score(&with_nulls, &profile());
        let zeros = CompositeScorer::score(&with_zeros, &profile());

        assert_eq!(nulls.factors.pain, None);
        assert_eq!(zeros.factors.pain, Some(0.0));
        assert!((nulls.ksls - zeros.ksls).abs() > 1.0);
    }

    #[test]
    fn test_empty_observation_scores_zero() {
        let obs = HealthObservation::new(
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            "user-1",
        );
        let result = CompositeScorer::score(&obs, &profile());
        assert_eq!(result.ksls, 0.0);
        assert_eq!(result.band, Band::Stable);
        assert_eq!(result.factors.present_count(), 0);
        assert_eq!(result.bmi, None);
    }

    #[test]
    fn test_single_factor_carries_full_weight() {
        let mut obs = HealthObservation::new(
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            "user-1",
        );
        obs.stress_level = Some(8.0);

        let result = CompositeScorer::score(&obs, &profile());
        // only stress present: renormalized weight 1.0 -> 0.8 * 100
        assert!((result.ksls - 80.0).abs() < 1e-9);
        assert_eq!(result.band, Band::High);
    }

    #[test]
    fn test_deterministic() {
        let obs = full_observation();
        let a = CompositeScorer::score(&obs, &profile());
        let b = CompositeScorer::score(&obs, &profile());
        assert_eq!(a, b);
    }
}
