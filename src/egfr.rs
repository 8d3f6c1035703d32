//! eGFR estimation and staging
//!
//! Implements the CKD-EPI 2021 creatinine equation (race-free) and the
//! KDIGO stage table. GFR readings elsewhere in the pipeline are ingested
//! as inputs; this module exists for callers that only have age, sex, and
//! a serum creatinine value.
//!
//! Stage boundaries follow KDIGO: stage 3 spans eGFR 30-59 (G3a/G3b), so a
//! reading of 29 is stage 4.

use crate::types::Sex;
use serde::{Deserialize, Serialize};

/// CKD stage per the KDIGO classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GfrStage {
    Stage1,
    Stage2,
    Stage3a,
    Stage3b,
    Stage4,
    Stage5,
}

impl GfrStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GfrStage::Stage1 => "stage_1",
            GfrStage::Stage2 => "stage_2",
            GfrStage::Stage3a => "stage_3a",
            GfrStage::Stage3b => "stage_3b",
            GfrStage::Stage4 => "stage_4",
            GfrStage::Stage5 => "stage_5",
        }
    }
}

/// Stage classification with a plain-language description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GfrInterpretation {
    pub stage: GfrStage,
    pub description: String,
}

/// Estimate GFR with the CKD-EPI 2021 equation (no race factor).
///
/// Returns the estimate in mL/min/1.73m², rounded to two decimals, or
/// `None` when age or a positive creatinine value is missing. Never
/// substitutes defaults for missing clinical inputs.
pub fn estimate_egfr(
    age_years: Option<f64>,
    sex: Sex,
    serum_creatinine_mg_dl: Option<f64>,
) -> Option<f64> {
    let age = age_years.filter(|a| *a > 0.0)?;
    let scr = serum_creatinine_mg_dl.filter(|c| *c > 0.0)?;

    // CKD-EPI 2021 sex-specific coefficients
    let (k, alpha, sex_factor) = match sex {
        Sex::Female => (0.7, -0.241, 1.012),
        Sex::Male => (0.9, -0.302, 1.0),
    };

    let ratio = scr / k;
    let egfr = 142.0
        * ratio.min(1.0).powf(alpha)
        * ratio.max(1.0).powf(-1.200)
        * 0.9938_f64.powf(age)
        * sex_factor;

    Some((egfr * 100.0).round() / 100.0)
}

/// Classify an eGFR value against the KDIGO stage table.
pub fn interpret_gfr(egfr: f64) -> GfrInterpretation {
    let (stage, description) = if egfr >= 90.0 {
        (GfrStage::Stage1, "Normal or high kidney function")
    } else if egfr >= 60.0 {
        (GfrStage::Stage2, "Mildly decreased kidney function")
    } else if egfr >= 45.0 {
        (GfrStage::Stage3a, "Mild to moderately decreased kidney function")
    } else if egfr >= 30.0 {
        (GfrStage::Stage3b, "Moderately to severely decreased kidney function")
    } else if egfr >= 15.0 {
        (GfrStage::Stage4, "Severely decreased kidney function")
    } else {
        (GfrStage::Stage5, "Kidney failure")
    };

    GfrInterpretation {
        stage,
        description: description.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_female_reference_case() {
        // 45-year-old female, creatinine 1.0: scr/k > 1
        let egfr = estimate_egfr(Some(45.0), Sex::Female, Some(1.0)).unwrap();
        let expected = 142.0
            * (1.0f64 / 0.7).powf(-1.200)
            * 0.9938f64.powf(45.0)
            * 1.012;
        assert!((egfr - (expected * 100.0).round() / 100.0).abs() < 0.01);
    }

    #[test]
    fn test_male_reference_case() {
        // 50-year-old male, creatinine 0.8: scr/k < 1
        let egfr = estimate_egfr(Some(50.0), Sex::Male, Some(0.8)).unwrap();
        let expected =
            142.0 * (0.8f64 / 0.9).powf(-0.302) * 0.9938f64.powf(50.0);
        assert!((egfr - (expected * 100.0).round() / 100.0).abs() < 0.01);
    }

    #[test]
    fn test_missing_inputs_yield_none() {
        assert_eq!(estimate_egfr(None, Sex::Female, Some(1.0)), None);
        assert_eq!(estimate_egfr(Some(45.0), Sex::Female, None), None);
        assert_eq!(estimate_egfr(Some(45.0), Sex::Female, Some(0.0)), None);
        assert_eq!(estimate_egfr(Some(45.0), Sex::Female, Some(-1.0)), None);
        assert_eq!(estimate_egfr(Some(0.0), Sex::Male, Some(1.0)), None);
    }

    #[test]
    fn test_higher_creatinine_lowers_egfr() {
        let low = estimate_egfr(Some(60.0), Sex::Male, Some(0.9)).unwrap();
        let high = estimate_egfr(Some(60.0), Sex::Male, Some(1.8)).unwrap();
        assert!(high < low);
    }

    #[test]
    fn test_stage_boundaries() {
        assert_eq!(interpret_gfr(95.0).stage, GfrStage::Stage1);
        assert_eq!(interpret_gfr(90.0).stage, GfrStage::Stage1);
        assert_eq!(interpret_gfr(89.9).stage, GfrStage::Stage2);
        assert_eq!(interpret_gfr(60.0).stage, GfrStage::Stage2);
        assert_eq!(interpret_gfr(59.9).stage, GfrStage::Stage3a);
        assert_eq!(interpret_gfr(45.0).stage, GfrStage::Stage3a);
        assert_eq!(interpret_gfr(44.9).stage, GfrStage::Stage3b);
        assert_eq!(interpret_gfr(30.0).stage, GfrStage::Stage3b);
        assert_eq!(interpret_gfr(29.9).stage, GfrStage::Stage4);
        assert_eq!(interpret_gfr(29.0).stage, GfrStage::Stage4);
        assert_eq!(interpret_gfr(15.0).stage, GfrStage::Stage4);
        assert_eq!(interpret_gfr(14.9).stage, GfrStage::Stage5);
    }

    #[test]
    fn test_interpretation_has_description() {
        let interp = interpret_gfr(50.0);
        assert_eq!(interp.stage, GfrStage::Stage3a);
        assert!(!interp.description.is_empty());
    }
}
