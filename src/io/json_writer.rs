use std::path::Path;

use anyhow::{Context, Result};

use crate::cascade::Cascade;
use crate::fusion::{FusedAssessment, StageContribution};
use crate::predict::StageResult;
use crate::schema::v1::{
    AssessmentV1, BreakdownReport, ContributionReport, FinalReport, StageReport,
};

pub fn build_report(cascade: &Cascade<'_>, fused: Option<&FusedAssessment>) -> AssessmentV1 {
    let mut report = AssessmentV1::empty(env!("CARGO_PKG_VERSION"));

    for result in [cascade.stage1(), cascade.stage2(), cascade.stage3()]
        .into_iter()
        .flatten()
    {
        report.stages.push(stage_report(result));
    }
    report.final_assessment = fused.map(final_report);
    report
}

pub fn write_json(path: &Path, cascade: &Cascade<'_>, fused: Option<&FusedAssessment>) -> Result<()> {
    let report = build_report(cascade, fused);
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &report)?;
    Ok(())
}

fn stage_report(result: &StageResult) -> StageReport {
    StageReport {
        stage: result.stage,
        success: result.success,
        probability: result.probability,
        risk_level: result.risk.map(|r| r.as_str().to_string()),
        factors: result.factors.clone(),
        apoe4_count: result.apoe4_count,
        error: result.error.as_ref().map(|e| e.to_string()),
    }
}

fn final_report(fused: &FusedAssessment) -> FinalReport {
    let [stage1, stage2, stage3] = &fused.breakdown;
    FinalReport {
        final_risk_score: fused.final_score,
        final_risk_probability: fused.final_probability,
        risk_category: fused.category.as_str().to_string(),
        escalation_recommendation: fused.recommendation.to_string(),
        pipeline_breakdown: BreakdownReport {
            stage1: contribution_report(stage1),
            stage2: contribution_report(stage2),
            stage3: contribution_report(stage3),
        },
        disclaimer: fused.disclaimer.to_string(),
    }
}

fn contribution_report(contribution: &StageContribution) -> ContributionReport {
    ContributionReport {
        probability: contribution.probability,
        weight: contribution.weight.clone(),
        contribution: contribution.contribution,
    }
}
