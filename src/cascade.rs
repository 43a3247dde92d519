//! Cascade orchestration.
//!
//! One cascade instance tracks a single assessment attempt. Stages advance in
//! one direction only; a stage runs only after its predecessor produced a
//! probability. Re-running an earlier stage clears every stored result after
//! it, so a caller can never fuse probabilities derived from different
//! upstream answers.

use tracing::{info, warn};

use crate::artifacts::ArtifactStore;
use crate::error::ScreenError;
use crate::fusion::{self, FusedAssessment};
use crate::predict::{StageResult, score_stage1, score_stage2, score_stage3};
use crate::record::RawRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStage {
    NotStarted,
    Stage1Done,
    Stage2Done,
    Complete,
}

/// All three stage results plus the fused assessment, produced by a
/// successful `run_full`.
#[derive(Debug, Clone)]
pub struct CompletedAssessment {
    pub stage1: StageResult,
    pub stage2: StageResult,
    pub stage3: StageResult,
    pub fused: FusedAssessment,
}

/// Per-assessment cascade state. Request-scoped: one instance per attempt,
/// never shared across concurrent callers.
#[derive(Debug)]
pub struct Cascade<'a> {
    store: &'a ArtifactStore,
    stage1: Option<StageResult>,
    stage2: Option<StageResult>,
    stage3: Option<StageResult>,
}

impl<'a> Cascade<'a> {
    pub fn new(store: &'a ArtifactStore) -> Self {
        Self {
            store,
            stage1: None,
            stage2: None,
            stage3: None,
        }
    }

    pub fn state(&self) -> CascadeStage {
        if self.probability(3).is_some() {
            CascadeStage::Complete
        } else if self.probability(2).is_some() {
            CascadeStage::Stage2Done
        } else if self.probability(1).is_some() {
            CascadeStage::Stage1Done
        } else {
            CascadeStage::NotStarted
        }
    }

    pub fn stage1(&self) -> Option<&StageResult> {
        self.stage1.as_ref()
    }

    pub fn stage2(&self) -> Option<&StageResult> {
        self.stage2.as_ref()
    }

    pub fn stage3(&self) -> Option<&StageResult> {
        self.stage3.as_ref()
    }

    fn probability(&self, stage: u8) -> Option<f64> {
        let result = match stage {
            1 => self.stage1.as_ref(),
            2 => self.stage2.as_ref(),
            _ => self.stage3.as_ref(),
        }?;
        if result.success { result.probability } else { None }
    }

    /// Runs (or re-runs) stage 1. A re-run invalidates stages 2 and 3.
    pub fn run_stage1(&mut self, raw: &RawRecord) -> &StageResult {
        if self.stage1.is_some() {
            info!("stage 1 re-run, downstream results invalidated");
            self.stage2 = None;
            self.stage3 = None;
        }
        &*self.stage1.insert(score_stage1(self.store, raw))
    }

    /// Runs (or re-runs) stage 2. Requires a successful stage 1; a re-run
    /// invalidates stage 3.
    pub fn run_stage2(&mut self, raw: &RawRecord) -> Result<&StageResult, ScreenError> {
        let prior = self.probability(1).ok_or_else(|| {
            warn!("stage 2 attempted before stage 1 completed");
            ScreenError::Precondition {
                attempted: 2,
                required: 1,
            }
        })?;
        if self.stage2.is_some() {
            info!("stage 2 re-run, downstream results invalidated");
            self.stage3 = None;
        }
        Ok(&*self.stage2.insert(score_stage2(self.store, raw, prior)))
    }

    /// Runs (or re-runs) stage 3. Requires a successful stage 2.
    pub fn run_stage3(&mut self, raw: &RawRecord) -> Result<&StageResult, ScreenError> {
        let prior = self.probability(2).ok_or_else(|| {
            warn!("stage 3 attempted before stage 2 completed");
            ScreenError::Precondition {
                attempted: 3,
                required: 2,
            }
        })?;
        Ok(&*self.stage3.insert(score_stage3(self.store, raw, prior)))
    }

    /// Runs all three stages in sequence against one combined record and
    /// fuses the result. Stops at the first failing stage and returns that
    /// stage's result; later stages are left untouched.
    pub fn run_full(&mut self, raw: &RawRecord) -> Result<CompletedAssessment, StageResult> {
        self.stage1 = None;
        self.stage2 = None;
        self.stage3 = None;

        let stage1 = score_stage1(self.store, raw);
        self.stage1 = Some(stage1.clone());
        let Some(p1) = self.probability(1) else {
            return Err(stage1);
        };

        let stage2 = score_stage2(self.store, raw, p1);
        self.stage2 = Some(stage2.clone());
        let Some(p2) = self.probability(2) else {
            return Err(stage2);
        };

        let stage3 = score_stage3(self.store, raw, p2);
        self.stage3 = Some(stage3.clone());
        let Some(p3) = self.probability(3) else {
            return Err(stage3);
        };

        let fused = fusion::fuse(p1, p2, p3);
        info!(
            final_score = fused.final_score,
            category = fused.category.as_str(),
            "cascade complete"
        );
        Ok(CompletedAssessment {
            stage1,
            stage2,
            stage3,
            fused,
        })
    }
}
