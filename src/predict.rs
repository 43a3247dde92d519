//! Stage predictors.
//!
//! Each stage maps a raw record (plus the prior stage's probability for
//! stages 2 and 3) through impute -> scale -> score and wraps the outcome in
//! an immutable `StageResult`. Failures are data, not panics: a bad field or
//! an unloaded artifact set comes back as an unsuccessful result.

use tracing::{info, warn};

use crate::artifacts::ArtifactStore;
use crate::error::ScreenError;
use crate::features::{count_apoe4, stage1_features, stage2_features, stage3_features};
use crate::record::{BiomarkerRecord, ClinicalRecord, GeneticRecord, RawRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Elevated,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Elevated => "Elevated",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

/// Outcome of one stage. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StageResult {
    pub stage: u8,
    pub success: bool,
    pub probability: Option<f64>,
    pub risk: Option<RiskLevel>,
    pub factors: Vec<String>,
    pub apoe4_count: Option<u8>,
    pub error: Option<ScreenError>,
}

impl StageResult {
    fn scored(stage: u8, probability: f64, risk: RiskLevel, factors: Vec<String>) -> Self {
        Self {
            stage,
            success: true,
            probability: Some(probability),
            risk: Some(risk),
            factors,
            apoe4_count: None,
            error: None,
        }
    }

    fn failed(stage: u8, error: ScreenError) -> Self {
        warn!(stage, error = %error, "stage scoring failed");
        Self {
            stage,
            success: false,
            probability: None,
            risk: None,
            factors: Vec::new(),
            apoe4_count: None,
            error: Some(error),
        }
    }
}

/// Label thresholds for the screening stages (1 and 2).
pub fn screening_label(probability: f64) -> RiskLevel {
    if probability < 0.30 {
        RiskLevel::Low
    } else if probability < 0.60 {
        RiskLevel::Elevated
    } else {
        RiskLevel::High
    }
}

/// Label thresholds for the final biomarker stage.
pub fn final_stage_label(probability: f64) -> RiskLevel {
    if probability < 0.30 {
        RiskLevel::Low
    } else if probability < 0.70 {
        RiskLevel::Moderate
    } else {
        RiskLevel::High
    }
}

/// Stage 1: clinical screening.
pub fn score_stage1(store: &ArtifactStore, raw: &RawRecord) -> StageResult {
    let stage = 1;
    let Some(artifacts) = store.stage(stage) else {
        return StageResult::failed(stage, ScreenError::ArtifactsUnavailable { stage });
    };
    let record = match ClinicalRecord::parse(raw) {
        Ok(record) => record,
        Err(err) => return StageResult::failed(stage, err),
    };

    let probability = artifacts.score(stage1_features(&record));
    let risk = screening_label(probability);
    let factors = clinical_factors(&record);
    info!(stage, probability, risk = risk.as_str(), "stage scored");
    StageResult::scored(stage, probability, risk, factors)
}

/// Stage 2: genetic stratification. Consumes the stage-1 probability.
pub fn score_stage2(store: &ArtifactStore, raw: &RawRecord, prior_probability: f64) -> StageResult {
    let stage = 2;
    let Some(artifacts) = store.stage(stage) else {
        return StageResult::failed(stage, ScreenError::ArtifactsUnavailable { stage });
    };
    let record = match GeneticRecord::parse(raw) {
        Ok(record) => record,
        Err(err) => return StageResult::failed(stage, err),
    };

    let apoe4_count = record.genotype.as_deref().map(count_apoe4).unwrap_or(0);
    let probability = artifacts.score(stage2_features(prior_probability, apoe4_count));
    let risk = screening_label(probability);
    let factors = vec![genetic_insight(apoe4_count, record.genotype.as_deref())];
    info!(stage, probability, apoe4_count, risk = risk.as_str(), "stage scored");

    let mut result = StageResult::scored(stage, probability, risk, factors);
    result.apoe4_count = Some(apoe4_count);
    result
}

/// Stage 3: biomarker analysis. Consumes the stage-2 probability.
pub fn score_stage3(store: &ArtifactStore, raw: &RawRecord, prior_probability: f64) -> StageResult {
    let stage = 3;
    let Some(artifacts) = store.stage(stage) else {
        return StageResult::failed(stage, ScreenError::ArtifactsUnavailable { stage });
    };
    let record = match BiomarkerRecord::parse(raw) {
        Ok(record) => record,
        Err(err) => return StageResult::failed(stage, err),
    };

    let probability = artifacts.score(stage3_features(prior_probability, &record));
    let risk = final_stage_label(probability);
    let factors = vec![biomarker_insight(record.ptau217)];
    info!(stage, probability, risk = risk.as_str(), "stage scored");
    StageResult::scored(stage, probability, risk, factors)
}

/// Descriptive only; never feeds back into the numeric result.
fn clinical_factors(record: &ClinicalRecord) -> Vec<String> {
    let mut factors = Vec::new();
    if record.faq >= 5.0 {
        factors.push(format!(
            "FAQ score of {:.0} indicates functional difficulty",
            record.faq
        ));
    }
    if record.ecog_mem >= 2.0 {
        factors.push(format!(
            "Memory self-rating ({:.1}) suggests subjective concern",
            record.ecog_mem
        ));
    }
    if record.age >= 75.0 {
        factors.push(format!(
            "Age ({:.0}) is a significant risk factor",
            record.age
        ));
    }
    if factors.is_empty() {
        factors.push("No significant clinical risk factors identified".to_string());
    }
    factors
}

fn genetic_insight(apoe4_count: u8, genotype: Option<&str>) -> String {
    match (apoe4_count, genotype) {
        (2, _) => "APOE4 Homozygous (e4/e4) - Two copies significantly increase risk".to_string(),
        (1, _) => "APOE4 Carrier (1 copy) - Moderately increases risk".to_string(),
        (_, Some(_)) => "No APOE4 alleles detected".to_string(),
        (_, None) => "Genetic data not provided".to_string(),
    }
}

fn biomarker_insight(ptau217: f64) -> String {
    if ptau217 > 0.6 {
        format!(
            "pTau-217 ({:.2} pg/mL) is elevated - suggests tau pathology",
            ptau217
        )
    } else if ptau217 > 0.0 {
        format!("pTau-217 ({:.2} pg/mL) is within normal range", ptau217)
    } else {
        "Biomarker data not provided".to_string()
    }
}
