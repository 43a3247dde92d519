//! Read-only store of pre-trained scoring artifacts.
//!
//! Each stage owns three opaque transforms: an imputer, a scaler, and a
//! classifier. The store is constructed once at startup and shared by
//! reference across concurrent evaluations; nothing here mutates after load.

pub mod loader;

use serde::{Deserialize, Serialize};

use crate::features;

/// Replaces unset columns (NaN) with the per-column fill value learned at
/// training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    pub fill: Vec<f64>,
}

impl Imputer {
    pub fn transform(&self, features: &mut [f64]) {
        for (value, fill) in features.iter_mut().zip(&self.fill) {
            if value.is_nan() {
                *value = *fill;
            }
        }
    }
}

/// Standardizes columns to the moments learned at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    pub fn transform(&self, features: &mut [f64]) {
        for (i, value) in features.iter_mut().enumerate() {
            let scale = self.scale[i];
            // A zero-variance column was constant in training; pass it through centered.
            let divisor = if scale == 0.0 { 1.0 } else { scale };
            *value = (*value - self.mean[i]) / divisor;
        }
    }
}

/// Black-box positive-class scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    Logistic { weights: Vec<f64>, intercept: f64 },
    Constant { value: f64 },
}

impl Classifier {
    pub fn score_probability(&self, features: &[f64]) -> f64 {
        match self {
            Self::Logistic { weights, intercept } => {
                let z: f64 = features
                    .iter()
                    .zip(weights)
                    .map(|(x, w)| x * w)
                    .sum::<f64>()
                    + intercept;
                sigmoid(z)
            }
            Self::Constant { value } => value.clamp(0.0, 1.0),
        }
    }

    /// Feature width the scorer was fitted on, when it has one.
    pub fn width(&self) -> Option<usize> {
        match self {
            Self::Logistic { weights, .. } => Some(weights.len()),
            Self::Constant { .. } => None,
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// The imputer/scaler/classifier triple for one stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageArtifacts {
    pub imputer: Imputer,
    pub scaler: Scaler,
    pub classifier: Classifier,
}

impl StageArtifacts {
    /// Runs the full transform chain and returns the positive-class
    /// probability, clamped to [0, 1].
    pub fn score(&self, mut features: Vec<f64>) -> f64 {
        self.imputer.transform(&mut features);
        self.scaler.transform(&mut features);
        self.classifier
            .score_probability(&features)
            .clamp(0.0, 1.0)
    }

    pub fn width(&self) -> usize {
        self.imputer.fill.len()
    }
}

/// Artifacts for all three stages.
///
/// A stage slot may be empty when the store was built in degraded mode;
/// predictors report that as an explicit artifacts-unavailable failure
/// instead of crashing.
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    stages: [Option<StageArtifacts>; 3],
}

impl ArtifactStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: u8, artifacts: StageArtifacts) -> Self {
        if let Some(slot) = self.stages.get_mut(usize::from(stage) - 1) {
            *slot = Some(artifacts);
        }
        self
    }

    pub fn stage(&self, stage: u8) -> Option<&StageArtifacts> {
        self.stages.get(usize::from(stage).checked_sub(1)?)?.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.stages.iter().all(Option::is_some)
    }

    /// Stage widths in stage order, `None` for unloaded slots.
    pub fn widths(&self) -> [Option<usize>; 3] {
        [1u8, 2, 3].map(|s| self.stage(s).map(StageArtifacts::width))
    }
}

/// Expected width of a stage's feature vector.
pub fn expected_width(stage: u8) -> Option<usize> {
    features::stage_width(stage)
}
