//! End-to-end assessment pipeline
//!
//! Ties the stages together: parse and validate raw observations, collapse
//! them to one logical observation per day, score the latest day, interpret
//! the score, and classify the trend across the deduplicated history.
//!
//! Every function here is pure; callers own I/O and persistence.

use crate::error::CoreError;
use crate::interpreter::Interpreter;
use crate::scorer::CompositeScorer;
use crate::trend::{MetricDirection, ScorePoint, TrendAnalyzer};
use crate::types::{HealthObservation, Interpretation, KslsResult, TrendRecord, UserProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete assessment for one user: today's score, its explanation, and
/// the trend over recorded history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub ksls: KslsResult,
    pub interpretation: Interpretation,
    pub trend: TrendRecord,
}

/// Parse newline-delimited JSON observations, validating each record.
///
/// Blank lines are skipped. The first malformed or out-of-range record
/// aborts the parse.
pub fn parse_observations_ndjson(input: &str) -> Result<Vec<HealthObservation>, CoreError> {
    let mut observations = Vec::new();
    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let obs: HealthObservation = serde_json::from_str(line)?;
        obs.validate()?;
        observations.push(obs);
    }
    Ok(observations)
}

/// Parse a JSON array of observations, validating each record.
pub fn parse_observations_json(input: &str) -> Result<Vec<HealthObservation>, CoreError> {
    let observations: Vec<HealthObservation> = serde_json::from_str(input)?;
    for obs in &observations {
        obs.validate()?;
    }
    Ok(observations)
}

/// Collapse a history to at most one observation per calendar day.
///
/// Within a day the last record in input order wins, matching
/// last-write-wins upsert semantics. Output is sorted chronologically.
pub fn dedupe_daily(history: &[HealthObservation]) -> Vec<HealthObservation> {
    let mut by_date = BTreeMap::new();
    for obs in history {
        by_date.insert(obs.date, obs.clone());
    }
    by_date.into_values().collect()
}

/// Run the full pipeline over a user's observation history.
///
/// The latest day's observation is scored and interpreted; the daily KSLS
/// series feeds trend analysis with lower-is-better semantics. Returns
/// [`CoreError::EmptyHistory`] when no observations are supplied.
pub fn assess(
    history: &[HealthObservation],
    profile: &UserProfile,
) -> Result<Assessment, CoreError> {
    let daily = dedupe_daily(history);
    let Some(latest) = daily.last() else {
        return Err(CoreError::EmptyHistory);
    };

    let ksls = CompositeScorer::score(latest, profile);
    let interpretation = Interpreter::interpret(&ksls);

    let series: Vec<ScorePoint> = daily
        .iter()
        .map(|obs| ScorePoint::new(obs.date, CompositeScorer::score(obs, profile).ksls))
        .collect();
    let trend = TrendAnalyzer::analyze(&series, MetricDirection::LowerIsBetter);

    Ok(Assessment {
        ksls,
        interpretation,
        trend,
    })
}
