use serde::{Deserialize, Serialize};

/// One stage's outcome as reported to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: u8,
    pub success: bool,
    pub probability: Option<f64>,
    pub risk_level: Option<String>,
    pub factors: Vec<String>,
    pub apoe4_count: Option<u8>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionReport {
    pub probability: f64,
    pub weight: String,
    pub contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownReport {
    pub stage1: ContributionReport,
    pub stage2: ContributionReport,
    pub stage3: ContributionReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    pub final_risk_score: f64,
    pub final_risk_probability: f64,
    pub risk_category: String,
    pub escalation_recommendation: String,
    pub pipeline_breakdown: BreakdownReport,
    pub disclaimer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub stages: Vec<StageReport>,
    pub final_assessment: Option<FinalReport>,
}

impl AssessmentV1 {
    pub fn empty(tool_version: &str) -> Self {
        Self {
            tool: "cogrisk".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            stages: Vec::new(),
            final_assessment: None,
        }
    }
}
