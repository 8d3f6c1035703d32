//! Core types for the Nephra scoring pipeline
//!
//! This module defines the data structures that flow through each stage of
//! the pipeline: raw observations, normalized factors, the composite KSLS
//! result, its interpretation, trend records, and symptom estimates.
//!
//! Every derived entity here is a pure function of its inputs; nothing is
//! persisted by this crate.

use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Biological sex, used by the eGFR equation coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }

    /// Lenient parsing of free-form gender strings from user profiles.
    ///
    /// Accepts common variants in several formats; anything unrecognized
    /// (including `None`) falls back to `Male`, matching the upstream
    /// profile handling.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Sex::Male;
        };
        match raw.trim().to_lowercase().as_str() {
            "female" | "f" | "woman" | "girl" | "feminine" | "mujer" => Sex::Female,
            _ => Sex::Male,
        }
    }
}

impl Default for Sex {
    fn default() -> Self {
        Sex::Male
    }
}

/// User profile supplied by the storage collaborator.
///
/// Height and weight act as fallbacks when an observation does not carry
/// its own; age and sex feed the eGFR estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default)]
    pub age_years: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            sex: Sex::Male,
            age_years: None,
            height_cm: None,
            weight_kg: None,
        }
    }
}

/// One day's health measurements for one user.
///
/// Numeric fields are nullable, meaning "not measured" - never coerced
/// to 0. At most one logical observation exists per user per calendar day;
/// later writes for the same day supersede earlier ones (see
/// [`crate::pipeline::dedupe_daily`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthObservation {
    pub date: NaiveDate,
    pub user_id: String,
    #[serde(rename = "systolicBP", default)]
    pub systolic_bp: Option<f64>,
    #[serde(rename = "diastolicBP", default)]
    pub diastolic_bp: Option<f64>,
    #[serde(default)]
    pub hydration_liters: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    /// Self-reported pain, 0-10
    #[serde(default)]
    pub pain_level: Option<f64>,
    /// Self-reported stress, 0-10
    #[serde(default)]
    pub stress_level: Option<f64>,
    /// Self-reported fatigue, 0-10
    #[serde(default)]
    pub fatigue_level: Option<f64>,
}

impl HealthObservation {
    /// Create an empty observation for the given user and day.
    pub fn new(date: NaiveDate, user_id: impl Into<String>) -> Self {
        Self {
            date,
            user_id: user_id.into(),
            systolic_bp: None,
            diastolic_bp: None,
            hydration_liters: None,
            weight_kg: None,
            height_cm: None,
            pain_level: None,
            stress_level: None,
            fatigue_level: None,
        }
    }

    /// Range-check an observation at the input boundary.
    ///
    /// The analysis functions assume validated input; this is for callers
    /// parsing untrusted JSON. Missing fields are always acceptable.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, value) in [
            ("painLevel", self.pain_level),
            ("stressLevel", self.stress_level),
            ("fatigueLevel", self.fatigue_level),
        ] {
            if let Some(v) = value {
                if !(0.0..=10.0).contains(&v) {
                    return Err(CoreError::InvalidObservation(format!(
                        "{name} must be within 0-10, got {v}"
                    )));
                }
            }
        }

        if let Some(h) = self.hydration_liters {
            if h < 0.0 {
                return Err(CoreError::InvalidObservation(format!(
                    "hydrationLiters must be non-negative, got {h}"
                )));
            }
        }

        for (name, value) in [
            ("weightKg", self.weight_kg),
            ("heightCm", self.height_cm),
            ("systolicBP", self.systolic_bp),
            ("diastolicBP", self.diastolic_bp),
        ] {
            if let Some(v) = value {
                if v <= 0.0 {
                    return Err(CoreError::InvalidObservation(format!(
                        "{name} must be positive, got {v}"
                    )));
                }
            }
        }

        if let (Some(sys), Some(dia)) = (self.systolic_bp, self.diastolic_bp) {
            if sys < dia {
                return Err(CoreError::InvalidObservation(format!(
                    "systolicBP ({sys}) below diastolicBP ({dia})"
                )));
            }
        }

        Ok(())
    }
}

/// The six stress factors feeding the composite score.
///
/// `ALL` lists them in fixed priority order, which also serves as the
/// tie-break order when ranking factors of equal normalized value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    Bp,
    Hydration,
    Fatigue,
    Pain,
    Stress,
    Weight,
}

impl Factor {
    /// All factors in priority order: bp > hydration > fatigue > pain > stress > weight.
    pub const ALL: [Factor; 6] = [
        Factor::Bp,
        Factor::Hydration,
        Factor::Fatigue,
        Factor::Pain,
        Factor::Stress,
        Factor::Weight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::Bp => "bp",
            Factor::Hydration => "hydration",
            Factor::Fatigue => "fatigue",
            Factor::Pain => "pain",
            Factor::Stress => "stress",
            Factor::Weight => "weight",
        }
    }

    /// Human-readable label used in interpretation templates.
    pub fn label(&self) -> &'static str {
        match self {
            Factor::Bp => "blood pressure",
            Factor::Hydration => "hydration",
            Factor::Fatigue => "fatigue",
            Factor::Pain => "pain",
            Factor::Stress => "stress",
            Factor::Weight => "weight",
        }
    }

    /// Position in the fixed priority order (0 = highest priority).
    pub fn priority(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(usize::MAX)
    }
}

/// Per-factor stress contributions in [0,1], `None` where the underlying
/// measurement is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFactors {
    pub bp: Option<f64>,
    pub hydration: Option<f64>,
    pub fatigue: Option<f64>,
    pub pain: Option<f64>,
    pub stress: Option<f64>,
    pub weight: Option<f64>,
}

impl NormalizedFactors {
    pub fn get(&self, factor: Factor) -> Option<f64> {
        match factor {
            Factor::Bp => self.bp,
            Factor::Hydration => self.hydration,
            Factor::Fatigue => self.fatigue,
            Factor::Pain => self.pain,
            Factor::Stress => self.stress,
            Factor::Weight => self.weight,
        }
    }

    pub fn set(&mut self, factor: Factor, value: Option<f64>) {
        match factor {
            Factor::Bp => self.bp = value,
            Factor::Hydration => self.hydration = value,
            Factor::Fatigue => self.fatigue = value,
            Factor::Pain => self.pain = value,
            Factor::Stress => self.stress = value,
            Factor::Weight => self.weight = value,
        }
    }

    /// Iterate factors in priority order with their normalized values.
    pub fn iter(&self) -> impl Iterator<Item = (Factor, Option<f64>)> + '_ {
        Factor::ALL.iter().map(move |&f| (f, self.get(f)))
    }

    /// Number of factors with a measured value.
    pub fn present_count(&self) -> usize {
        self.iter().filter(|(_, v)| v.is_some()).count()
    }
}

/// Categorical classification of a KSLS value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Stable,
    Elevated,
    High,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Stable => "stable",
            Band::Elevated => "elevated",
            Band::High => "high",
        }
    }
}

/// Composite Kidney Stress Load Score result.
///
/// Computed fresh on each request; explicitly a wellness index, not a
/// clinical measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KslsResult {
    /// Composite score, 0-100
    pub ksls: f64,
    pub band: Band,
    pub factors: NormalizedFactors,
    /// Body mass index, if weight and height were available
    pub bmi: Option<f64>,
}

/// Templated explanatory text for a [`KslsResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub summary: String,
    /// At most 3 factors, descending by normalized value
    pub top_factors: Vec<Factor>,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personalized_context: Option<String>,
    pub safety_note: String,
}

/// Trend classification buckets for a scored metric series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GfrTrend {
    Stable,
    PossibleImprovement,
    PossibleDecline,
    ModerateImprovement,
    ModerateDecline,
    SignificantImprovement,
    SignificantDecline,
    /// Insufficient history or zero baseline - never guessed
    Undefined,
}

impl GfrTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            GfrTrend::Stable => "stable",
            GfrTrend::PossibleImprovement => "possible_improvement",
            GfrTrend::PossibleDecline => "possible_decline",
            GfrTrend::ModerateImprovement => "moderate_improvement",
            GfrTrend::ModerateDecline => "moderate_decline",
            GfrTrend::SignificantImprovement => "significant_improvement",
            GfrTrend::SignificantDecline => "significant_decline",
            GfrTrend::Undefined => "undefined",
        }
    }
}

/// Long-term direction across weekly aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LongTermTrend {
    Improving,
    Stable,
    Declining,
}

/// Change classification over an ordered window of prior scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRecord {
    pub gfr_trend: GfrTrend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gfr_change_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gfr_absolute_change: Option<f64>,
    /// `None` when weekly history is insufficient or ambiguous
    pub gfr_long_term_trend: Option<LongTermTrend>,
    pub gfr_stability: String,
}

/// Symptom categories recognized by the free-text extractor.
///
/// Hydration and urination are context categories: they raise confidence
/// but contribute no score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymptomCategory {
    Fatigue,
    Pain,
    Stress,
    Hydration,
    Urination,
}

impl SymptomCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymptomCategory::Fatigue => "fatigue",
            SymptomCategory::Pain => "pain",
            SymptomCategory::Stress => "stress",
            SymptomCategory::Hydration => "hydration",
            SymptomCategory::Urination => "urination",
        }
    }

    /// Whether matches in this category contribute a symptom score.
    pub fn is_scoring(&self) -> bool {
        matches!(
            self,
            SymptomCategory::Fatigue | SymptomCategory::Pain | SymptomCategory::Stress
        )
    }
}

/// Symptom intensities estimated from free text, independent of any
/// structured metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomEstimate {
    /// 0-10
    pub fatigue_score: f64,
    /// 0-10
    pub pain_score: f64,
    /// 0-10
    pub stress_score: f64,
    /// 0-1
    pub confidence: f64,
    /// Matched categories, once each, in first-match order
    pub detected_triggers: Vec<SymptomCategory>,
}

/// Suggestion payload produced when a symptom estimate warrants a KSLS
/// check-in. Carries synthesized levels the scorer can consume when
/// structured measurements are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KslsSuggestion {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatigue_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pain_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<f64>,
}
