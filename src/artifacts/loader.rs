use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::artifacts::{ArtifactStore, StageArtifacts, expected_width};

/// On-disk artifact file for one stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageArtifactFile {
    pub schema_version: String,
    pub stage: u8,
    #[serde(flatten)]
    pub artifacts: StageArtifacts,
}

pub const ARTIFACT_SCHEMA_VERSION: &str = "v1";

/// Loads the built-in artifact set shipped with the binary.
pub fn load_builtin() -> Result<ArtifactStore> {
    let sources = [
        (1u8, include_str!("../../assets/artifacts/stage1.json")),
        (2u8, include_str!("../../assets/artifacts/stage2.json")),
        (3u8, include_str!("../../assets/artifacts/stage3.json")),
    ];
    let mut store = ArtifactStore::empty();
    for (stage, content) in sources {
        let artifacts = parse_stage_file(content, stage, "built-in")?;
        store = store.with_stage(stage, artifacts);
    }
    Ok(store)
}

/// Loads `stage{1,2,3}.json` from a directory. All three files must be
/// present and valid; a missing or malformed artifact is a startup-fatal
/// configuration error, never a per-request condition.
pub fn load_dir(dir: &Path) -> Result<ArtifactStore> {
    let mut store = ArtifactStore::empty();
    for stage in [1u8, 2, 3] {
        let path = dir.join(format!("stage{}.json", stage));
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read artifact file {}", path.display()))?;
        let artifacts = parse_stage_file(&content, stage, &path.display().to_string())?;
        store = store.with_stage(stage, artifacts);
    }
    Ok(store)
}

fn parse_stage_file(content: &str, stage: u8, source: &str) -> Result<StageArtifacts> {
    let file: StageArtifactFile = serde_json::from_str(content)
        .with_context(|| format!("{}: malformed stage {} artifact", source, stage))?;
    if file.schema_version != ARTIFACT_SCHEMA_VERSION {
        bail!(
            "{}: unsupported artifact schema '{}' (expected '{}')",
            source,
            file.schema_version,
            ARTIFACT_SCHEMA_VERSION
        );
    }
    if file.stage != stage {
        bail!(
            "{}: artifact declares stage {} but was loaded for stage {}",
            source,
            file.stage,
            stage
        );
    }
    validate(&file.artifacts, stage, source)?;
    Ok(file.artifacts)
}

/// Width mismatches are fatal: the feature builder and the trained artifacts
/// must agree on column order and count, and there is no way to recover from
/// disagreement at request time.
fn validate(artifacts: &StageArtifacts, stage: u8, source: &str) -> Result<()> {
    let expected = expected_width(stage)
        .ok_or_else(|| anyhow::anyhow!("{}: unknown stage {}", source, stage))?;

    if artifacts.imputer.fill.len() != expected {
        bail!(
            "{}: stage {} imputer has {} fill values, expected {}",
            source,
            stage,
            artifacts.imputer.fill.len(),
            expected
        );
    }
    if artifacts.scaler.mean.len() != expected || artifacts.scaler.scale.len() != expected {
        bail!(
            "{}: stage {} scaler has {}/{} moments, expected {}",
            source,
            stage,
            artifacts.scaler.mean.len(),
            artifacts.scaler.scale.len(),
            expected
        );
    }
    if let Some(width) = artifacts.classifier.width() {
        if width != expected {
            bail!(
                "{}: stage {} classifier takes {} features, expected {}",
                source,
                stage,
                width,
                expected
            );
        }
    }
    Ok(())
}
