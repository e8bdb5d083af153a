use std::fs;
use std::path::{Path, PathBuf};

use hyperamp_core::errors::{ErrorInfo, HyperampError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::AmplifyConfig;
use crate::generator::RunSummary;

/// Structured manifest describing a completed amplification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Configuration used for the run, calibration applied.
    pub config: AmplifyConfig,
    /// SHA-256 of the canonical JSON encoding of `config`.
    pub config_hash: String,
    /// Master seed.
    pub seed: u64,
    /// Totals and rotated files (relative to the output directory).
    pub summary: RunSummary,
    /// Vertex name index (relative to the output directory).
    pub vertex_index: PathBuf,
    /// Hypertype name index (relative to the output directory).
    pub hypertype_index: PathBuf,
}

impl RunManifest {
    /// Builds a manifest whose file paths are relative to `out_dir`.
    pub fn new(
        config: &AmplifyConfig,
        summary: &RunSummary,
        out_dir: &Path,
    ) -> Result<Self, HyperampError> {
        let mut summary = summary.clone();
        for file in &mut summary.files {
            if let Ok(relative) = file.strip_prefix(out_dir) {
                *file = relative.to_path_buf();
            }
        }
        Ok(Self {
            config: config.clone(),
            config_hash: config_hash(config)?,
            seed: config.seed,
            summary,
            vertex_index: config.output.vertex_index.clone(),
            hypertype_index: config.output.hypertype_index.clone(),
        })
    }

    /// Writes the manifest to a JSON file.
    pub fn write(&self, path: &Path) -> Result<(), HyperampError> {
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            HyperampError::Serde(
                ErrorInfo::new("manifest-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| HyperampError::io("manifest-write", path, err))
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, HyperampError> {
        let contents =
            fs::read_to_string(path).map_err(|err| HyperampError::io("manifest-read", path, err))?;
        serde_json::from_str(&contents).map_err(|err| {
            HyperampError::Serde(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

/// Stable hexadecimal hash of a configuration.
pub fn config_hash(config: &AmplifyConfig) -> Result<String, HyperampError> {
    let bytes = serde_json::to_vec(config)
        .map_err(|err| HyperampError::Serde(ErrorInfo::new("json-encode", err.to_string())))?;
    Ok(hex::encode(Sha256::digest(bytes)))
}
