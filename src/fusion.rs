//! Weighted risk fusion.
//!
//! Pure function of the three stage probabilities; no state, no I/O. Inputs
//! outside [0, 1] are clamped rather than rejected, so the engine can never
//! refuse to produce an assessment once the cascade has run.

/// Clinical baseline weight.
pub const STAGE1_WEIGHT: f64 = 0.40;
/// Genetic refinement weight.
pub const STAGE2_WEIGHT: f64 = 0.25;
/// Biomarker confirmation weight.
pub const STAGE3_WEIGHT: f64 = 0.35;

pub const LOW_THRESHOLD: f64 = 0.30;
pub const HIGH_THRESHOLD: f64 = 0.70;

pub const DISCLAIMER: &str = "IMPORTANT: This screening result is NOT a diagnosis. \
    It indicates relative risk based on the provided inputs. \
    Please consult a qualified healthcare provider for proper clinical evaluation.";

const LOW_RECOMMENDATION: &str = "Routine monitoring recommended. \
    Consider rescreening in 2-3 years or if new symptoms develop. \
    Maintain cognitive health through regular exercise, social engagement, \
    and heart-healthy diet.";

const MODERATE_RECOMMENDATION: &str = "Annual biomarker testing recommended. \
    Consider consultation with a neurologist for baseline cognitive assessment. \
    Monitor for any changes in memory, thinking, or daily function. \
    Lifestyle modifications may help reduce risk.";

const HIGH_RECOMMENDATION: &str = "Neurologist referral strongly recommended. \
    Consider confirmatory imaging (MRI/PET) and comprehensive cognitive evaluation. \
    Early intervention and clinical trial eligibility should be discussed. \
    Family support and care planning may be appropriate.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskCategory {
    Low,
    Moderate,
    High,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

/// Presentational share of one stage in the final score.
#[derive(Debug, Clone, PartialEq)]
pub struct StageContribution {
    /// Stage probability as a percentage, 1 decimal.
    pub probability: f64,
    /// Stage weight as a percentage string, e.g. "40%".
    pub weight: String,
    /// weight x probability as a percentage, 1 decimal.
    pub contribution: f64,
}

/// Final fused assessment. Derived purely from the three stage
/// probabilities; safe to pass across concurrency boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedAssessment {
    pub final_probability: f64,
    /// final_probability x 100, rounded to 1 decimal.
    pub final_score: f64,
    pub category: RiskCategory,
    pub recommendation: &'static str,
    /// Per-stage breakdown in stage order. Contributions sum to the final
    /// score within rounding drift.
    pub breakdown: [StageContribution; 3],
    pub disclaimer: &'static str,
}

pub fn risk_category(final_probability: f64) -> RiskCategory {
    if final_probability < LOW_THRESHOLD {
        RiskCategory::Low
    } else if final_probability < HIGH_THRESHOLD {
        RiskCategory::Moderate
    } else {
        RiskCategory::High
    }
}

pub fn recommendation(category: RiskCategory) -> &'static str {
    match category {
        RiskCategory::Low => LOW_RECOMMENDATION,
        RiskCategory::Moderate => MODERATE_RECOMMENDATION,
        RiskCategory::High => HIGH_RECOMMENDATION,
    }
}

/// Fuses the three stage probabilities into the final assessment.
pub fn fuse(p1: f64, p2: f64, p3: f64) -> FusedAssessment {
    let p1 = p1.clamp(0.0, 1.0);
    let p2 = p2.clamp(0.0, 1.0);
    let p3 = p3.clamp(0.0, 1.0);

    let final_probability =
        (STAGE1_WEIGHT * p1 + STAGE2_WEIGHT * p2 + STAGE3_WEIGHT * p3).clamp(0.0, 1.0);
    let category = risk_category(final_probability);

    FusedAssessment {
        final_probability,
        final_score: round1(final_probability * 100.0),
        category,
        recommendation: recommendation(category),
        breakdown: [
            contribution(p1, STAGE1_WEIGHT),
            contribution(p2, STAGE2_WEIGHT),
            contribution(p3, STAGE3_WEIGHT),
        ],
        disclaimer: DISCLAIMER,
    }
}

fn contribution(probability: f64, weight: f64) -> StageContribution {
    StageContribution {
        probability: round1(probability * 100.0),
        weight: format!("{:.0}%", weight * 100.0),
        contribution: round1(weight * probability * 100.0),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
