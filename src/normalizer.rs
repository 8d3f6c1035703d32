//! Metric normalization
//!
//! This module maps each raw clinical measurement to a stress contribution
//! in [0,1]:
//! - Blood pressure against standard clinical bands, systolic and diastolic
//!   combined with `max`
//! - Hydration as a U-shaped penalty around a target band
//! - Symptom levels linearly
//! - Weight through BMI bands
//!
//! A missing measurement never gets a default: missing in, `None` out, and
//! downstream stages exclude the factor.

use crate::types::{Factor, HealthObservation, NormalizedFactors, UserProfile};

/// Daily hydration target band (liters).
pub const HYDRATION_TARGET_MIN_L: f64 = 1.5;
pub const HYDRATION_TARGET_MAX_L: f64 = 2.5;

/// Distance outside the hydration band (liters) at which the penalty saturates.
const HYDRATION_SATURATION_L: f64 = 1.5;

/// Normalizer converting raw observation fields to stress contributions
pub struct MetricNormalizer;

impl MetricNormalizer {
    /// Normalize all factors of one observation.
    ///
    /// The profile supplies height/weight fallbacks for observations that
    /// do not carry their own.
    pub fn normalize(obs: &HealthObservation, profile: &UserProfile) -> NormalizedFactors {
        let weight_kg = obs.weight_kg.or(profile.weight_kg);
        let height_cm = obs.height_cm.or(profile.height_cm);

        let mut factors = NormalizedFactors::default();
        factors.set(Factor::Bp, normalize_bp(obs.systolic_bp, obs.diastolic_bp));
        factors.set(Factor::Hydration, obs.hydration_liters.map(normalize_hydration));
        factors.set(Factor::Fatigue, obs.fatigue_level.map(normalize_symptom_level));
        factors.set(Factor::Pain, obs.pain_level.map(normalize_symptom_level));
        factors.set(Factor::Stress, obs.stress_level.map(normalize_symptom_level));
        factors.set(Factor::Weight, Self::bmi(weight_kg, height_cm).map(normalize_bmi));
        factors
    }

    /// Body mass index from weight and height; `None` unless both are
    /// present and the height is positive.
    pub fn bmi(weight_kg: Option<f64>, height_cm: Option<f64>) -> Option<f64> {
        match (weight_kg, height_cm) {
            (Some(w), Some(h)) if h > 0.0 && w > 0.0 => {
                let meters = h / 100.0;
                Some(w / (meters * meters))
            }
            _ => None,
        }
    }
}

/// Combined blood pressure stress: systolic and diastolic are normalized
/// independently and the worse of the two wins, since either elevated
/// reading signals risk.
pub fn normalize_bp(systolic: Option<f64>, diastolic: Option<f64>) -> Option<f64> {
    match (systolic, diastolic) {
        (None, None) => None,
        (sys, dia) => {
            let s = sys.map(normalize_systolic).unwrap_or(0.0);
            let d = dia.map(normalize_diastolic).unwrap_or(0.0);
            Some(s.max(d))
        }
    }
}

/// Systolic stress against clinical bands:
/// normal <120, elevated 120-129, stage 1 130-139, stage 2 140-179, crisis >=180.
pub fn normalize_systolic(systolic: f64) -> f64 {
    if systolic < 120.0 {
        0.0
    } else if systolic < 130.0 {
        0.25
    } else if systolic < 140.0 {
        0.5
    } else if systolic < 180.0 {
        0.75
    } else {
        1.0
    }
}

/// Diastolic stress against clinical bands:
/// normal <80, stage 1 80-89, stage 2 90-119, crisis >=120.
pub fn normalize_diastolic(diastolic: f64) -> f64 {
    if diastolic < 80.0 {
        0.0
    } else if diastolic < 90.0 {
        0.5
    } else if diastolic < 120.0 {
        0.75
    } else {
        1.0
    }
}

/// U-shaped hydration penalty: 0 inside the target band, growing linearly
/// with distance outside it, capped at 1.
pub fn normalize_hydration(liters: f64) -> f64 {
    let distance = if liters < HYDRATION_TARGET_MIN_L {
        HYDRATION_TARGET_MIN_L - liters
    } else if liters > HYDRATION_TARGET_MAX_L {
        liters - HYDRATION_TARGET_MAX_L
    } else {
        return 0.0;
    };
    (distance / HYDRATION_SATURATION_L).clamp(0.0, 1.0)
}

/// Linear mapping of a 0-10 self-reported level to [0,1].
pub fn normalize_symptom_level(level: f64) -> f64 {
    (level / 10.0).clamp(0.0, 1.0)
}

/// BMI stress against standard bands: 0 for the normal range, increasing
/// outward in both directions.
pub fn normalize_bmi(bmi: f64) -> f64 {
    if bmi < 16.0 {
        0.8
    } else if bmi < 18.5 {
        0.4
    } else if bmi < 25.0 {
        0.0
    } else if bmi < 30.0 {
        0.3
    } else if bmi < 35.0 {
        0.6
    } else {
        0.9
    }
}
