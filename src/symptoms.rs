//! Free-text symptom estimation
//!
//! Scans journal entries and chat messages for symptom keywords and
//! estimates fatigue, pain, and stress intensity on a 0-10 scale,
//! independent of any structured metrics. Context categories (hydration,
//! urination) raise confidence without contributing a score.
//!
//! The scan is a case-insensitive substring match per category; each
//! distinct matched keyword increments the category score with diminishing
//! returns. Deterministic for identical input; no external calls.

use crate::types::{KslsSuggestion, SymptomCategory, SymptomEstimate};

const FATIGUE_KEYWORDS: &[&str] = &[
    "exhausted",
    "tired",
    "fatigue",
    "drained",
    "worn out",
    "no energy",
    "can't get out of bed",
    "sleepy",
    "lethargic",
    "wiped out",
];

const PAIN_KEYWORDS: &[&str] = &[
    "pain",
    "ache",
    "aching",
    "hurts",
    "hurting",
    "sore",
    "cramp",
    "throbbing",
    "stabbing",
    "tender",
];

const STRESS_KEYWORDS: &[&str] = &[
    "stress",
    "anxious",
    "anxiety",
    "worried",
    "overwhelmed",
    "nervous",
    "panic",
    "tense",
    "frustrated",
    "on edge",
];

const HYDRATION_KEYWORDS: &[&str] = &[
    "thirsty",
    "dehydrated",
    "water intake",
    "drinking water",
    "fluids",
];

const URINATION_KEYWORDS: &[&str] = &[
    "urinat",
    "urine",
    "peeing",
    "bladder",
    "bathroom trips",
];

/// Score added by the first, second, ... distinct keyword match in a
/// category; further matches add [`EXTRA_MATCH_INCREMENT`] each.
const MATCH_INCREMENTS: &[f64] = &[4.0, 2.5, 1.5, 1.0];
const EXTRA_MATCH_INCREMENT: f64 = 0.5;
const MAX_CATEGORY_SCORE: f64 = 10.0;

/// Confidence contribution per distinct matched category.
const CATEGORY_CONFIDENCE: f64 = 0.2;
/// Text-length confidence bonus: 1 point per this many characters, capped.
const LENGTH_CONFIDENCE_DIVISOR: f64 = 400.0;
const LENGTH_CONFIDENCE_CAP: f64 = 0.2;

/// Suggestion gate: a symptom at or above this level...
pub const SUGGESTION_SCORE_THRESHOLD: f64 = 6.0;
/// ...with at least this confidence warrants a KSLS check-in.
pub const SUGGESTION_CONFIDENCE_THRESHOLD: f64 = 0.3;

/// Keyword-based symptom estimator for free text
pub struct SymptomTextExtractor;

impl SymptomTextExtractor {
    /// Estimate symptom intensities from arbitrary UTF-8 text.
    pub fn extract(text: &str) -> SymptomEstimate {
        let lowered = text.to_lowercase();

        let categories: [(SymptomCategory, &[&str]); 5] = [
            (SymptomCategory::Fatigue, FATIGUE_KEYWORDS),
            (SymptomCategory::Pain, PAIN_KEYWORDS),
            (SymptomCategory::Stress, STRESS_KEYWORDS),
            (SymptomCategory::Hydration, HYDRATION_KEYWORDS),
            (SymptomCategory::Urination, URINATION_KEYWORDS),
        ];

        let mut fatigue_score = 0.0;
        let mut pain_score = 0.0;
        let mut stress_score = 0.0;
        // (category, byte offset of its earliest match)
        let mut matched: Vec<(SymptomCategory, usize)> = Vec::new();

        for (category, keywords) in categories {
            let mut match_count = 0usize;
            let mut first_index = usize::MAX;

            for keyword in keywords {
                if let Some(idx) = lowered.find(keyword) {
                    match_count += 1;
                    first_index = first_index.min(idx);
                }
            }

            if match_count == 0 {
                continue;
            }

            matched.push((category, first_index));

            if category.is_scoring() {
                let score = category_score(match_count);
                match category {
                    SymptomCategory::Fatigue => fatigue_score = score,
                    SymptomCategory::Pain => pain_score = score,
                    SymptomCategory::Stress => stress_score = score,
                    _ => {}
                }
            }
        }

        // first-match order over the whole text
        matched.sort_by_key(|&(_, idx)| idx);
        let detected_triggers = matched.iter().map(|&(c, _)| c).collect();

        let confidence = (matched.len() as f64 * CATEGORY_CONFIDENCE
            + (lowered.chars().count() as f64 / LENGTH_CONFIDENCE_DIVISOR)
                .min(LENGTH_CONFIDENCE_CAP))
        .min(1.0);

        SymptomEstimate {
            fatigue_score,
            pain_score,
            stress_score,
            confidence,
            detected_triggers,
        }
    }
}

/// Diminishing-returns score for a number of distinct keyword matches.
fn category_score(match_count: usize) -> f64 {
    let mut score = 0.0;
    for i in 0..match_count {
        score += MATCH_INCREMENTS
            .get(i)
            .copied()
            .unwrap_or(EXTRA_MATCH_INCREMENT);
    }
    score.min(MAX_CATEGORY_SCORE)
}

/// Suggest a KSLS check-in when the estimate is strong enough.
///
/// Returns `Some` when the highest symptom score reaches
/// [`SUGGESTION_SCORE_THRESHOLD`] and confidence reaches
/// [`SUGGESTION_CONFIDENCE_THRESHOLD`]; the payload carries synthesized
/// levels only for categories the text actually mentioned, so an unmentioned
/// symptom stays unmeasured rather than becoming a zero.
pub fn should_suggest_ksls(estimate: &SymptomEstimate) -> Option<KslsSuggestion> {
    let peak = estimate
        .fatigue_score
        .max(estimate.pain_score)
        .max(estimate.stress_score);

    if peak < SUGGESTION_SCORE_THRESHOLD
        || estimate.confidence < SUGGESTION_CONFIDENCE_THRESHOLD
    {
        return None;
    }

    let mentioned = |c: SymptomCategory| estimate.detected_triggers.contains(&c);
    let labels: Vec<&str> = estimate
        .detected_triggers
        .iter()
        .filter(|c| c.is_scoring())
        .map(|c| c.as_str())
        .collect();

    Some(KslsSuggestion {
        message: format!(
            "Your entry mentions {}. Logging today's measurements would give \
             you an up-to-date kidney stress score.",
            labels.join(" and ")
        ),
        fatigue_level: mentioned(SymptomCategory::Fatigue).then_some(estimate.fatigue_score),
        pain_level: mentioned(SymptomCategory::Pain).then_some(estimate.pain_score),
        stress_level: mentioned(SymptomCategory::Stress).then_some(estimate.stress_score),
    })
}
