use thiserror::Error;

/// Errors produced by the screening core.
///
/// Stage failures travel as data inside `StageResult`; this enum exists so
/// callers can tell "fix your data" apart from "wrong call order" and from
/// "the scoring pipeline is not ready yet".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScreenError {
    /// A field in the raw record could not be coerced for the given stage.
    #[error("stage {stage} input: field '{field}' {message}")]
    Input {
        stage: u8,
        field: String,
        message: String,
    },

    /// A stage was invoked before its prerequisite stage succeeded.
    #[error("stage {attempted} requires stage {required} to complete first")]
    Precondition { attempted: u8, required: u8 },

    /// The imputer/scaler/classifier set for a stage is not loaded.
    #[error("stage {stage} model artifacts unavailable")]
    ArtifactsUnavailable { stage: u8 },
}

impl ScreenError {
    pub fn input(stage: u8, field: &str, message: impl Into<String>) -> Self {
        Self::Input {
            stage,
            field: field.to_string(),
            message: message.into(),
        }
    }
}
