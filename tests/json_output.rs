use cogrisk::artifacts::{ArtifactStore, Classifier, Imputer, Scaler, StageArtifacts};
use cogrisk::cascade::Cascade;
use cogrisk::features::{STAGE1_WIDTH, STAGE2_WIDTH, STAGE3_WIDTH};
use cogrisk::io::{json_writer, summary};
use cogrisk::record::RawRecord;
use cogrisk::schema::v1::AssessmentV1;
use serde_json::json;
use tempfile::TempDir;

fn mock_stage(width: usize, value: f64) -> StageArtifacts {
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

fn mock_store() -> ArtifactStore {
    ArtifactStore::empty()
        .with_stage(1, mock_stage(STAGE1_WIDTH, 0.2))
        .with_stage(2, mock_stage(STAGE2_WIDTH, 0.5))
        .with_stage(3, mock_stage(STAGE3_WIDTH, 0.8))
}

#[test]
fn report_covers_stages_and_final_assessment() {
    let store = mock_store();
    let mut cascade = Cascade::new(&store);
    let raw = RawRecord::from_value(json!({ "genotype": "3/4", "ptau217": 0.7 })).unwrap();
    let completed = cascade.run_full(&raw).unwrap();

    let report = json_writer::build_report(&cascade, Some(&completed.fused));
    assert_eq!(report.tool, "cogrisk");
    assert_eq!(report.schema_version, "v1");
    assert_eq!(report.stages.len(), 3);
    assert_eq!(report.stages[0].stage, 1);
    assert_eq!(report.stages[1].apoe4_count, Some(1));
    assert_eq!(report.stages[2].risk_level.as_deref(), Some("High"));

    let final_report = report.final_assessment.unwrap();
    assert_eq!(final_report.final_risk_score, 48.5);
    assert_eq!(final_report.risk_category, "Moderate");
    assert_eq!(final_report.pipeline_breakdown.stage1.weight, "40%");
    assert!(final_report.disclaimer.contains("NOT a diagnosis"));
}

#[test]
fn failed_stage_serializes_its_error() {
    let store = ArtifactStore::empty();
    let mut cascade = Cascade::new(&store);
    let _ = cascade.run_full(&RawRecord::new());

    let report = json_writer::build_report(&cascade, None);
    assert_eq!(report.stages.len(), 1);
    assert!(!report.stages[0].success);
    assert!(
        report.stages[0]
            .error
            .as_deref()
            .unwrap()
            .contains("artifacts unavailable")
    );
    assert!(report.final_assessment.is_none());
}

#[test]
fn report_roundtrips_through_serde() {
    let store = mock_store();
    let mut cascade = Cascade::new(&store);
    let completed = cascade.run_full(&RawRecord::new()).unwrap();

    let report = json_writer::build_report(&cascade, Some(&completed.fused));
    let text = serde_json::to_string_pretty(&report).unwrap();
    let parsed: AssessmentV1 = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.stages.len(), report.stages.len());
    assert_eq!(
        parsed.final_assessment.unwrap().final_risk_score,
        report.final_assessment.unwrap().final_risk_score
    );
}

#[test]
fn write_json_emits_a_parseable_file() {
    let tmp = TempDir::new().unwrap();
    let store = mock_store();
    let mut cascade = Cascade::new(&store);
    let completed = cascade.run_full(&RawRecord::new()).unwrap();

    let path = tmp.path().join("assessment.json");
    json_writer::write_json(&path, &cascade, Some(&completed.fused)).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: AssessmentV1 = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.stages.len(), 3);
}

#[test]
fn summary_mentions_every_stage_and_the_final_score() {
    let store = mock_store();
    let mut cascade = Cascade::new(&store);
    let completed = cascade.run_full(&RawRecord::new()).unwrap();

    let text = summary::format_summary(&cascade, Some(&completed.fused));
    assert!(text.contains("Stage clinical: 20.0%"));
    assert!(text.contains("Stage genetic: 50.0%"));
    assert!(text.contains("Stage biomarker: 80.0%"));
    assert!(text.contains("Final: 48.5% (Moderate)"));
}

#[test]
fn summary_reports_stages_not_run() {
    let store = mock_store();
    let cascade = Cascade::new(&store);
    let text = summary::format_summary(&cascade, None);
    assert!(text.contains("Stage clinical: not run"));
    assert!(text.contains("Stage biomarker: not run"));
}
