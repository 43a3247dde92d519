use cogrisk::artifacts::{ArtifactStore, Classifier, Imputer, Scaler, StageArtifacts};
use cogrisk::error::ScreenError;
use cogrisk::features::{STAGE1_WIDTH, STAGE2_WIDTH, STAGE3_WIDTH};
use cogrisk::predict::{
    RiskLevel, final_stage_label, score_stage1, score_stage2, score_stage3, screening_label,
};
use cogrisk::record::RawRecord;
use serde_json::json;

fn constant_stage(width: usize, value: f64) -> StageArtifacts {
    StageArtifacts {
        imputer: Imputer {
            fill: vec![0.0; width],
        },
        scaler: Scaler {
            mean: vec![0.0; width],
            scale: vec![1.0; width],
        },
        classifier: Classifier::Constant { value },
    }
}

fn constant_store(p1: f64, p2: f64, p3: f64) -> ArtifactStore {
    ArtifactStore::empty()
        .with_stage(1, constant_stage(STAGE1_WIDTH, p1))
        .with_stage(2, constant_stage(STAGE2_WIDTH, p2))
        .with_stage(3, constant_stage(STAGE3_WIDTH, p3))
}

fn record(value: serde_json::Value) -> RawRecord {
    RawRecord::from_value(value).unwrap()
}

#[test]
fn screening_label_boundaries() {
    assert_eq!(screening_label(0.2999), RiskLevel::Low);
    assert_eq!(screening_label(0.30), RiskLevel::Elevated);
    assert_eq!(screening_label(0.5999), RiskLevel::Elevated);
    assert_eq!(screening_label(0.60), RiskLevel::High);
}

#[test]
fn final_stage_label_boundaries() {
    assert_eq!(final_stage_label(0.2999), RiskLevel::Low);
    assert_eq!(final_stage_label(0.30), RiskLevel::Moderate);
    assert_eq!(final_stage_label(0.6999), RiskLevel::Moderate);
    assert_eq!(final_stage_label(0.70), RiskLevel::High);
}

#[test]
fn stage1_factors_flag_faq_and_memory_but_not_age() {
    let store = constant_store(0.55, 0.5, 0.5);
    let raw = record(json!({
        "age": 72,
        "gender": "Female",
        "education": 14,
        "faq": 8,
        "ecogMem": 2.5,
        "ecogTotal": 2.5
    }));

    let result = score_stage1(&store, &raw);
    assert!(result.success);
    assert_eq!(result.probability, Some(0.55));
    assert_eq!(result.risk, Some(RiskLevel::Elevated));
    assert!(result.factors.iter().any(|f| f.contains("FAQ score of 8")));
    assert!(result.factors.iter().any(|f| f.contains("Memory self-rating (2.5)")));
    assert!(!result.factors.iter().any(|f| f.contains("Age")));
}

#[test]
fn stage1_no_factors_message_when_nothing_flags() {
    let store = constant_store(0.1, 0.5, 0.5);
    let raw = record(json!({
        "age": 60,
        "gender": "Male",
        "education": 18,
        "faq": 0,
        "ecogMem": 1.0,
        "ecogTotal": 1.0
    }));

    let result = score_stage1(&store, &raw);
    assert_eq!(
        result.factors,
        vec!["No significant clinical risk factors identified".to_string()]
    );
}

#[test]
fn stage1_age_factor_fires_at_75() {
    let store = constant_store(0.2, 0.5, 0.5);
    let raw = record(json!({ "age": 75 }));
    let result = score_stage1(&store, &raw);
    assert!(result.factors.iter().any(|f| f.contains("Age (75)")));
}

#[test]
fn stage2_homozygous_insight_and_metadata() {
    let store = constant_store(0.5, 0.45, 0.5);
    let raw = record(json!({ "genotype": "4/4" }));
    let result = score_stage2(&store, &raw, 0.3);
    assert!(result.success);
    assert_eq!(result.apoe4_count, Some(2));
    assert!(result.factors[0].contains("Homozygous"));
}

#[test]
fn stage2_carrier_insight() {
    let store = constant_store(0.5, 0.45, 0.5);
    let raw = record(json!({ "genotype": "3/4" }));
    let result = score_stage2(&store, &raw, 0.3);
    assert_eq!(result.apoe4_count, Some(1));
    assert!(result.factors[0].contains("Carrier"));
}

#[test]
fn stage2_no_alleles_versus_no_genotype() {
    let store = constant_store(0.5, 0.45, 0.5);

    let raw = record(json!({ "genotype": "3/3" }));
    let result = score_stage2(&store, &raw, 0.3);
    assert_eq!(result.apoe4_count, Some(0));
    assert_eq!(result.factors[0], "No APOE4 alleles detected");

    let result = score_stage2(&store, &RawRecord::new(), 0.3);
    assert_eq!(result.apoe4_count, Some(0));
    assert_eq!(result.factors[0], "Genetic data not provided");
}

#[test]
fn stage3_ptau_insights() {
    let store = constant_store(0.5, 0.5, 0.8);

    let raw = record(json!({ "ptau217": 0.75 }));
    let result = score_stage3(&store, &raw, 0.4);
    assert!(result.factors[0].contains("elevated"));

    let raw = record(json!({ "ptau217": 0.5 }));
    let result = score_stage3(&store, &raw, 0.4);
    assert!(result.factors[0].contains("within normal range"));

    let result = score_stage3(&store, &RawRecord::new(), 0.4);
    assert_eq!(result.factors[0], "Biomarker data not provided");
}

#[test]
fn stage3_uses_final_stage_thresholds() {
    let store = constant_store(0.5, 0.5, 0.65);
    let result = score_stage3(&store, &RawRecord::new(), 0.4);
    // 0.65 is High for the screening stages but Moderate for the final stage.
    assert_eq!(result.risk, Some(RiskLevel::Moderate));
}

#[test]
fn missing_artifacts_degrade_to_explicit_failure() {
    let store = ArtifactStore::empty();
    let result = score_stage1(&store, &RawRecord::new());
    assert!(!result.success);
    assert_eq!(result.probability, None);
    assert_eq!(result.risk, None);
    assert_eq!(
        result.error,
        Some(ScreenError::ArtifactsUnavailable { stage: 1 })
    );
}

#[test]
fn input_error_is_captured_as_data() {
    let store = constant_store(0.5, 0.5, 0.5);
    let raw = record(json!({ "education": {} }));
    let result = score_stage1(&store, &raw);
    assert!(!result.success);
    match &result.error {
        Some(ScreenError::Input { stage, field, .. }) => {
            assert_eq!(*stage, 1);
            assert_eq!(field, "education");
        }
        other => panic!("expected input error, got {:?}", other),
    }
}

#[test]
fn factors_do_not_influence_probability() {
    let store = constant_store(0.55, 0.5, 0.5);
    let flagged = record(json!({ "age": 90, "faq": 20, "ecogMem": 4 }));
    let unflagged = record(json!({ "age": 60, "faq": 0, "ecogMem": 1 }));
    let a = score_stage1(&store, &flagged);
    let b = score_stage1(&store, &unflagged);
    assert_eq!(a.probability, b.probability);
    assert_ne!(a.factors, b.factors);
}
