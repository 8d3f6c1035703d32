//! Assessment report encoding
//!
//! Wraps an [`Assessment`] in a versioned envelope with producer identity,
//! provenance, and a data-quality block, then serializes it to JSON for
//! downstream consumers. The envelope schema is versioned independently of
//! the crate so consumers can pin against it.

use crate::error::CoreError;
use crate::pipeline::Assessment;
use crate::types::HealthObservation;
use crate::{CORE_VERSION, PRODUCER_NAME};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope schema version.
pub const REPORT_VERSION: &str = "1.0.0";

/// Confidence bonus for a week or more of history.
const HISTORY_DEPTH_BONUS: f64 = 0.1;
const HISTORY_DEPTH_DAYS: usize = 7;

/// Identity of the producing library instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Where the underlying observations came from and when the report was
/// computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportProvenance {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_observed: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_observed: Option<NaiveDate>,
    pub computed_at_utc: DateTime<Utc>,
}

/// How much signal backed the assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuality {
    /// Fraction of the six factors measured on the scored day, 0-1
    pub factor_coverage: f64,
    /// Distinct observation days available
    pub days_of_history: usize,
    /// 0-1, coverage plus a depth bonus for a week or more of history
    pub confidence: f64,
}

/// Versioned assessment envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub provenance: ReportProvenance,
    pub quality: ReportQuality,
    pub assessment: Assessment,
}

/// Encoder stamping assessments into [`AssessmentReport`] envelopes.
#[derive(Debug, Clone)]
pub struct ReportEncoder {
    instance_id: String,
}

impl ReportEncoder {
    /// Encoder with a random instance id.
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Encoder with a caller-supplied instance id, for reproducible output.
    pub fn with_instance_id(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
        }
    }

    /// Build the envelope for an assessment over the given daily history.
    ///
    /// `daily` must be the deduplicated, chronologically ordered history the
    /// assessment was computed from.
    pub fn encode(
        &self,
        assessment: Assessment,
        daily: &[HealthObservation],
        user_id: &str,
    ) -> AssessmentReport {
        let factor_coverage =
            assessment.ksls.factors.present_count() as f64 / 6.0;
        let days_of_history = daily.len();
        let mut confidence = factor_coverage;
        if days_of_history >= HISTORY_DEPTH_DAYS {
            confidence += HISTORY_DEPTH_BONUS;
        }

        AssessmentReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: CORE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            provenance: ReportProvenance {
                user_id: user_id.to_string(),
                first_observed: daily.first().map(|o| o.date),
                last_observed: daily.last().map(|o| o.date),
                computed_at_utc: Utc::now(),
            },
            quality: ReportQuality {
                factor_coverage,
                days_of_history,
                confidence: confidence.min(1.0),
            },
            assessment,
        }
    }

    /// Encode to a pretty-printed JSON string.
    pub fn encode_to_json(
        &self,
        assessment: Assessment,
        daily: &[HealthObservation],
        user_id: &str,
    ) -> Result<String, CoreError> {
        let report = self.encode(assessment, daily, user_id);
        Ok(serde_json::to_string_pretty(&report)?)
    }
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{assess, dedupe_daily};
    use crate::types::UserProfile;
    use chrono::NaiveDate;

    fn history() -> Vec<HealthObservation> {
        (1..=8)
            .map(|day| {
                let mut obs = HealthObservation::new(
                    NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
                    "user-1",
                );
                obs.stress_level = Some(4.0);
                obs.fatigue_level = Some(3.0);
                obs
            })
            .collect()
    }

    #[test]
    fn test_encode_envelope_fields() {
        let profile = UserProfile::new("user-1");
        let daily = dedupe_daily(&history());
        let assessment = assess(&daily, &profile).unwrap();

        let encoder = ReportEncoder::with_instance_id("inst-1");
        let report = encoder.encode(assessment, &daily, "user-1");

        assert_eq!(report.report_version, REPORT_VERSION);
        assert_eq!(report.producer.name, PRODUCER_NAME);
        assert_eq!(report.producer.instance_id, "inst-1");
        assert_eq!(report.provenance.user_id, "user-1");
        assert_eq!(
            report.provenance.first_observed,
            Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
        );
        assert_eq!(
            report.provenance.last_observed,
            Some(NaiveDate::from_ymd_opt(2025, 6, 8).unwrap())
        );
    }

    #[test]
    fn test_quality_coverage_and_depth_bonus() {
        let profile = UserProfile::new("user-1");
        let daily = dedupe_daily(&history());
        let assessment = assess(&daily, &profile).unwrap();

        let report =
            ReportEncoder::with_instance_id("inst-1").encode(assessment, &daily, "user-1");

        // 2 of 6 factors measured, 8 days of history
        assert_eq!(report.quality.factor_coverage, 2.0 / 6.0);
        assert_eq!(report.quality.days_of_history, 8);
        assert_eq!(report.quality.confidence, 2.0 / 6.0 + 0.1);
    }

    #[test]
    fn test_short_history_gets_no_bonus() {
        let profile = UserProfile::new("user-1");
        let daily: Vec<_> = history().into_iter().take(3).collect();
        let assessment = assess(&daily, &profile).unwrap();

        let report =
            ReportEncoder::with_instance_id("inst-1").encode(assessment, &daily, "user-1");

        assert_eq!(report.quality.days_of_history, 3);
        assert_eq!(report.quality.confidence, report.quality.factor_coverage);
    }

    #[test]
    fn test_json_uses_camel_case() {
        let profile = UserProfile::new("user-1");
        let daily = dedupe_daily(&history());
        let assessment = assess(&daily, &profile).unwrap();

        let json = ReportEncoder::with_instance_id("inst-1")
            .encode_to_json(assessment, &daily, "user-1")
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["reportVersion"], REPORT_VERSION);
        assert!(value["provenance"]["computedAtUtc"].is_string());
        assert!(value["quality"]["factorCoverage"].is_number());
    }

    #[test]
    fn test_random_instance_ids_differ() {
        let a = ReportEncoder::new();
        let b = ReportEncoder::new();
        let profile = UserProfile::new("user-1");
        let daily = dedupe_daily(&history());

        let ra = a.encode(assess(&daily, &profile).unwrap(), &daily, "user-1");
        let rb = b.encode(assess(&daily, &profile).unwrap(), &daily, "user-1");
        assert_ne!(ra.producer.instance_id, rb.producer.instance_id);
    }
}
