use crate::cascade::Cascade;
use crate::fusion::FusedAssessment;
use crate::predict::StageResult;

pub fn format_summary(cascade: &Cascade<'_>, fused: Option<&FusedAssessment>) -> String {
    let version = env!("CARGO_PKG_VERSION");

    let mut out = String::new();
    out.push_str(&format!("cogrisk v{}\n", version));

    for (name, result) in [
        ("clinical", cascade.stage1()),
        ("genetic", cascade.stage2()),
        ("biomarker", cascade.stage3()),
    ] {
        match result {
            Some(r) => out.push_str(&format_stage_line(name, r)),
            None => out.push_str(&format!("Stage {}: not run\n", name)),
        }
    }

    if let Some(fused) = fused {
        out.push_str(&format!(
            "Final: {:.1}% ({})\n",
            fused.final_score,
            fused.category.as_str()
        ));
        out.push_str(&format!("Recommendation: {}\n", fused.recommendation));
    }

    out
}

fn format_stage_line(name: &str, result: &StageResult) -> String {
    match (result.probability, result.risk) {
        (Some(p), Some(risk)) => {
            let mut line = format!("Stage {}: {:.1}% ({})\n", name, p * 100.0, risk.as_str());
            for factor in &result.factors {
                line.push_str(&format!("- {}\n", factor));
            }
            line
        }
        _ => match &result.error {
            Some(err) => format!("Stage {}: failed ({})\n", name, err),
            None => format!("Stage {}: failed\n", name),
        },
    }
}
