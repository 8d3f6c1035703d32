//! Trend classification
//!
//! Classifies the change of a daily metric series against a trailing
//! baseline. The baseline is the mean of the up-to-7 entries preceding the
//! latest one - a single-point comparison is too noisy for day-to-day
//! health data. A zero baseline or insufficient history yields the explicit
//! `Undefined` marker rather than an error or NaN.
//!
//! The analyzer is direction-aware: GFR is a higher-is-better metric, the
//! KSLS a lower-is-better one; the same percent change classifies as
//! improvement in one and decline in the other.

use crate::types::{GfrTrend, LongTermTrend, TrendRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of trailing entries used for the baseline.
pub const BASELINE_WINDOW: usize = 7;

/// Weekly aggregates required for a long-term trend call.
pub const WEEKS_REQUIRED: usize = 3;

/// Percent-change bucket boundaries.
const STABLE_PCT: f64 = 5.0;
const MODERATE_PCT: f64 = 15.0;
const SIGNIFICANT_PCT: f64 = 30.0;

/// Weekly aggregates within this fraction of their mean count as stable.
const LONG_TERM_TOLERANCE: f64 = 0.05;

/// Domain meaning of a metric's direction of change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricDirection {
    /// e.g. GFR - an increase is favorable
    HigherIsBetter,
    /// e.g. KSLS - an increase is unfavorable
    LowerIsBetter,
}

/// One dated value in a metric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl ScorePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Trend analyzer over ordered (oldest to newest) daily series
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    /// Classify the latest entry of a series against its trailing baseline.
    ///
    /// The series must be ordered oldest to newest. Total: any input,
    /// including an empty series, produces a defined record.
    pub fn analyze(series: &[ScorePoint], direction: MetricDirection) -> TrendRecord {
        let Some((latest, prior)) = series.split_last() else {
            return undefined_record("No history available to establish a trend.");
        };

        if prior.is_empty() {
            return undefined_record("Not enough history to establish a trend.");
        }

        let window_start = prior.len().saturating_sub(BASELINE_WINDOW);
        let window = &prior[window_start..];
        let baseline: f64 =
            window.iter().map(|p| p.value).sum::<f64>() / window.len() as f64;

        if baseline == 0.0 {
            return undefined_record(
                "Baseline readings are zero; the trend cannot be established.",
            );
        }

        let absolute_change = latest.value - baseline;
        let change_percent = round2(100.0 * absolute_change / baseline);

        let trend = classify(change_percent, direction);
        let long_term = long_term_trend(series, direction);

        TrendRecord {
            gfr_trend: trend,
            gfr_change_percent: Some(change_percent),
            gfr_absolute_change: Some(round2(absolute_change)),
            gfr_long_term_trend: long_term,
            gfr_stability: stability_text(trend, change_percent),
        }
    }

    /// Convenience for GFR readings (higher is better).
    pub fn analyze_gfr(series: &[ScorePoint]) -> TrendRecord {
        Self::analyze(series, MetricDirection::HigherIsBetter)
    }
}

/// Bucket a percent change by magnitude and sign.
fn classify(change_percent: f64, direction: MetricDirection) -> GfrTrend {
    let magnitude = change_percent.abs();
    if magnitude < STABLE_PCT {
        return GfrTrend::Stable;
    }

    let favorable = match direction {
        MetricDirection::HigherIsBetter => change_percent > 0.0,
        MetricDirection::LowerIsBetter => change_percent < 0.0,
    };

    if magnitude < MODERATE_PCT {
        if favorable {
            GfrTrend::PossibleImprovement
        } else {
            GfrTrend::PossibleDecline
        }
    } else if magnitude <= SIGNIFICANT_PCT {
        if favorable {
            GfrTrend::ModerateImprovement
        } else {
            GfrTrend::ModerateDecline
        }
    } else if favorable {
        GfrTrend::SignificantImprovement
    } else {
        GfrTrend::SignificantDecline
    }
}

/// Long-term direction over the last three consecutive weekly aggregates.
///
/// Returns `None` when fewer than three weeks have data or the aggregates
/// are neither stable nor monotonic - ambiguity is never guessed away.
fn long_term_trend(series: &[ScorePoint], direction: MetricDirection) -> Option<LongTermTrend> {
    let latest_date = series.last()?.date;

    // Aggregate into consecutive 7-day buckets counting back from the
    // latest date: week 0 is the most recent.
    let mut weekly_means = Vec::with_capacity(WEEKS_REQUIRED);
    for week in 0..WEEKS_REQUIRED {
        let end = latest_date - chrono::Duration::days(7 * week as i64);
        let start = end - chrono::Duration::days(6);
        let values: Vec<f64> = series
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .map(|p| p.value)
            .collect();
        if values.is_empty() {
            return None;
        }
        weekly_means.push(values.iter().sum::<f64>() / values.len() as f64);
    }

    // oldest to newest
    weekly_means.reverse();
    let [w0, w1, w2] = [weekly_means[0], weekly_means[1], weekly_means[2]];

    let mean = (w0 + w1 + w2) / 3.0;
    let spread = weekly_means
        .iter()
        .fold(f64::MIN, |a, &b| a.max(b))
        - weekly_means.iter().fold(f64::MAX, |a, &b| a.min(b));
    if spread <= mean.abs() * LONG_TERM_TOLERANCE {
        return Some(LongTermTrend::Stable);
    }

    let rising = w0 < w1 && w1 < w2;
    let falling = w0 > w1 && w1 > w2;

    match direction {
        MetricDirection::HigherIsBetter if rising => Some(LongTermTrend::Improving),
        MetricDirection::HigherIsBetter if falling => Some(LongTermTrend::Declining),
        MetricDirection::LowerIsBetter if falling => Some(LongTermTrend::Improving),
        MetricDirection::LowerIsBetter if rising => Some(LongTermTrend::Declining),
        _ => None,
    }
}

fn undefined_record(reason: &str) -> TrendRecord {
    TrendRecord {
        gfr_trend: GfrTrend::Undefined,
        gfr_change_percent: None,
        gfr_absolute_change: None,
        gfr_long_term_trend: None,
        gfr_stability: reason.to_string(),
    }
}

fn stability_text(trend: GfrTrend, change_percent: f64) -> String {
    match trend {
        GfrTrend::Stable => format!(
            "Readings are holding steady ({change_percent:+.1}% versus the recent baseline)."
        ),
        GfrTrend::PossibleImprovement => format!(
            "Readings show a possible improvement ({change_percent:+.1}% versus the recent baseline)."
        ),
        GfrTrend::PossibleDecline => format!(
            "Readings show a possible decline ({change_percent:+.1}% versus the recent baseline)."
        ),
        GfrTrend::ModerateImprovement => format!(
            "Readings show a moderate improvement ({change_percent:+.1}% versus the recent baseline)."
        ),
        GfrTrend::ModerateDecline => format!(
            "Readings show a moderate decline ({change_percent:+.1}% versus the recent baseline)."
        ),
        GfrTrend::SignificantImprovement => format!(
            "Readings show a significant improvement ({change_percent:+.1}% versus the recent baseline)."
        ),
        GfrTrend::SignificantDecline => format!(
            "Readings show a significant decline ({change_percent:+.1}% versus the recent baseline)."
        ),
        GfrTrend::Undefined => "Trend is undefined.".to_string(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
