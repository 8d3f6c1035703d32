//! Score interpretation
//!
//! Turns a [`KslsResult`] into templated explanatory text: a band-keyed
//! summary and detail, an ordered list of the most significant factors, an
//! optional personalized context for known factor combinations, and a
//! per-band safety note. Pure function, no I/O.

use crate::types::{Band, Factor, Interpretation, KslsResult, NormalizedFactors};

/// Normalized value above which a factor counts as significant.
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.5;

/// Maximum number of factors surfaced in `top_factors`.
pub const MAX_TOP_FACTORS: usize = 3;

/// Interpreter producing [`Interpretation`]s
pub struct Interpreter;

impl Interpreter {
    pub fn interpret(result: &KslsResult) -> Interpretation {
        let top_factors = Self::top_factors(&result.factors);
        let labels = joined_labels(&top_factors);

        Interpretation {
            summary: summary_for(result.band, labels.as_deref()),
            detail: detail_for(result, labels.as_deref()),
            personalized_context: personalized_context_for(&result.factors),
            safety_note: safety_note_for(result.band).to_string(),
            top_factors,
        }
    }

    /// Factors above the significance threshold, descending by normalized
    /// value, ties broken by the fixed priority order, truncated to 3.
    pub fn top_factors(factors: &NormalizedFactors) -> Vec<Factor> {
        let mut significant: Vec<(Factor, f64)> = factors
            .iter()
            .filter_map(|(f, v)| v.map(|v| (f, v)))
            .filter(|(_, v)| *v > SIGNIFICANCE_THRESHOLD)
            .collect();

        significant.sort_by(|(fa, va), (fb, vb)| {
            vb.partial_cmp(va)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(fa.priority().cmp(&fb.priority()))
        });

        significant
            .into_iter()
            .take(MAX_TOP_FACTORS)
            .map(|(f, _)| f)
            .collect()
    }
}

/// Join factor labels for template interpolation:
/// "blood pressure", "blood pressure and hydration",
/// "blood pressure, hydration and fatigue".
fn joined_labels(factors: &[Factor]) -> Option<String> {
    match factors {
        [] => None,
        [a] => Some(a.label().to_string()),
        [a, b] => Some(format!("{} and {}", a.label(), b.label())),
        [a, b, c, ..] => Some(format!("{}, {} and {}", a.label(), b.label(), c.label())),
    }
}

fn summary_for(band: Band, labels: Option<&str>) -> String {
    match (band, labels) {
        (Band::Stable, None) => {
            "Your kidney stress load looks stable today.".to_string()
        }
        (Band::Stable, Some(labels)) => format!(
            "Your kidney stress load looks stable today, though {labels} could use attention."
        ),
        (Band::Elevated, None) => {
            "Your kidney stress load is slightly above the stable range today.".to_string()
        }
        (Band::Elevated, Some(labels)) => {
            format!("Your kidney stress load is elevated today, driven mainly by {labels}.")
        }
        (Band::High, None) => {
            "Your kidney stress load is high today.".to_string()
        }
        (Band::High, Some(labels)) => {
            format!("Your kidney stress load is high today, driven mainly by {labels}.")
        }
    }
}

fn detail_for(result: &KslsResult, labels: Option<&str>) -> String {
    let score = format!("Your score is {:.0} out of 100.", result.ksls);
    match (result.band, labels) {
        (Band::Stable, _) => format!(
            "{score} All tracked factors are within their usual ranges. \
             Keeping up your current routine should help it stay that way."
        ),
        (Band::Elevated, Some(labels)) => format!(
            "{score} The largest contributions come from {labels}. \
             Small adjustments there tend to move the score the most."
        ),
        (Band::Elevated, None) => format!(
            "{score} Several factors are mildly raised without a single \
             clear driver."
        ),
        (Band::High, Some(labels)) => format!(
            "{score} The largest contributions come from {labels}. \
             Consider rechecking these measurements today."
        ),
        (Band::High, None) => format!(
            "{score} Multiple factors are raised at once. \
             Consider rechecking today's measurements."
        ),
    }
}

/// Optional context keyed off specific factor combinations.
fn personalized_context_for(factors: &NormalizedFactors) -> Option<String> {
    let significant =
        |v: Option<f64>| v.map(|v| v > SIGNIFICANCE_THRESHOLD).unwrap_or(false);

    if significant(factors.bp) && significant(factors.hydration) {
        return Some(
            "Elevated blood pressure together with hydration outside your target \
             band often go hand in hand; steady fluid intake through the day can \
             help both."
                .to_string(),
        );
    }

    if significant(factors.fatigue) && significant(factors.stress) {
        return Some(
            "Fatigue and stress are both running high. Rest matters for kidney \
             health too - consider a lighter day if you can."
                .to_string(),
        );
    }

    None
}

fn safety_note_for(band: Band) -> &'static str {
    match band {
        Band::Stable => {
            "This is a wellness index, not a medical diagnosis. \
             Keep logging your daily measurements."
        }
        Band::Elevated => {
            "This is a wellness index, not a medical diagnosis. \
             If readings stay elevated for several days, mention it at your \
             next appointment."
        }
        Band::High => {
            "This is a wellness index, not a medical diagnosis. \
             Please contact your provider to discuss today's readings."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::CompositeScorer;
    use pretty_assertions::assert_eq;

    fn factors(bp: f64, hydration: f64, fatigue: f64) -> NormalizedFactors {
        NormalizedFactors {
            bp: Some(bp),
            hydration: Some(hydration),
            fatigue: Some(fatigue),
            pain: None,
            stress: None,
            weight: None,
        }
    }

    #[test]
    fn test_top_factors_descending_and_truncated() {
        let f = NormalizedFactors {
            bp: Some(0.6),
            hydration: Some(0.9),
            fatigue: Some(0.7),
            pain: Some(0.8),
            stress: Some(0.55),
            weight: Some(0.2),
        };
        let top = Interpreter::top_factors(&f);
        assert_eq!(top, vec![Factor::Hydration, Factor::Pain, Factor::Fatigue]);
    }

    #[test]
    fn test_top_factors_tie_break_follows_priority() {
        let f = NormalizedFactors {
            bp: Some(0.75),
            hydration: Some(0.75),
            fatigue: None,
            pain: Some(0.75),
            stress: None,
            weight: Some(0.75),
        };
        let top = Interpreter::top_factors(&f);
        // all tied: priority order bp > hydration > pain (> weight, truncated)
        assert_eq!(top, vec![Factor::Bp, Factor::Hydration, Factor::Pain]);
    }

    #[test]
    fn test_threshold_excludes_borderline_values() {
        // exactly at the threshold does not count as significant
        let f = factors(0.5, 0.3, 0.51);
        let top = Interpreter::top_factors(&f);
        assert_eq!(top, vec![Factor::Fatigue]);
    }

    #[test]
    fn test_high_band_safety_note_mentions_provider() {
        let result = CompositeScorer::score_factors(factors(1.0, 1.0, 0.9), None);
        let interp = Interpreter::interpret(&result);
        assert!(interp.safety_note.contains("contact your provider"));
    }

    #[test]
    fn test_every_band_carries_disclaimer() {
        for f in [
            factors(0.1, 0.0, 0.1),
            factors(0.5, 0.5, 0.4),
            factors(1.0, 1.0, 0.9),
        ] {
            let result = CompositeScorer::score_factors(f, None);
            let interp = Interpreter::interpret(&result);
            assert!(interp.safety_note.contains("not a medical diagnosis"));
        }
    }

    #[test]
    fn test_summary_names_top_factor_labels() {
        let result = CompositeScorer::score_factors(factors(0.75, 0.8, 0.2), None);
        let interp = Interpreter::interpret(&result);
        assert!(interp.summary.contains("hydration and blood pressure"));
    }

    #[test]
    fn test_personalized_context_for_bp_hydration_combo() {
        let result = CompositeScorer::score_factors(factors(0.75, 0.8, 0.2), None);
        let interp = Interpreter::interpret(&result);
        assert!(interp.personalized_context.is_some());
    }

    #[test]
    fn test_no_personalized_context_without_combo() {
        let result = CompositeScorer::score_factors(factors(0.75, 0.1, 0.2), None);
        let interp = Interpreter::interpret(&result);
        assert_eq!(interp.personalized_context, None);
    }

    #[test]
    fn test_idempotent() {
        let result = CompositeScorer::score_factors(factors(0.6, 0.7, 0.3), None);
        let a = Interpreter::interpret(&result);
        let b = Interpreter::interpret(&result);
        assert_eq!(a, b);
    }
}
