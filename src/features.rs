//! Per-stage feature construction.
//!
//! Feature order and count are part of the trained-artifact contract: the
//! vectors built here must match the schema the stage classifiers were fitted
//! on, column for column. Reordering is a configuration error, not a tunable.

use crate::record::{BiomarkerRecord, ClinicalRecord};

/// [age, gender, education, FAQ, ECOG memory, ECOG total]
pub const STAGE1_WIDTH: usize = 6;
/// [stage-1 probability, APOE4 allele count]
pub const STAGE2_WIDTH: usize = 2;
/// [stage-2 probability, pTau-217, Ab42, Ab40, NfL]
pub const STAGE3_WIDTH: usize = 5;

pub fn stage_width(stage: u8) -> Option<usize> {
    match stage {
        1 => Some(STAGE1_WIDTH),
        2 => Some(STAGE2_WIDTH),
        3 => Some(STAGE3_WIDTH),
        _ => None,
    }
}

pub fn stage1_features(record: &ClinicalRecord) -> Vec<f64> {
    vec![
        record.age,
        record.gender,
        record.education,
        record.faq,
        record.ecog_mem,
        record.ecog_total,
    ]
}

pub fn stage2_features(prior_probability: f64, apoe4_count: u8) -> Vec<f64> {
    vec![prior_probability, f64::from(apoe4_count)]
}

pub fn stage3_features(prior_probability: f64, record: &BiomarkerRecord) -> Vec<f64> {
    vec![
        prior_probability,
        record.ptau217,
        record.ab42,
        record.ab40,
        record.nfl,
    ]
}

/// 1 for case-insensitive "male", 0 for anything else including absent.
pub fn encode_gender(value: Option<&str>) -> f64 {
    match value {
        Some(s) if s.trim().eq_ignore_ascii_case("male") => 1.0,
        _ => 0.0,
    }
}

/// Counts APOE4 alleles in a genotype string such as "3/4" or "4/4".
pub fn count_apoe4(genotype: &str) -> u8 {
    genotype.chars().filter(|c| *c == '4').count() as u8
}
