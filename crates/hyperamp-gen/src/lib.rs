#![deny(missing_docs)]

//! Streaming amplification of a profiled seed hypergraph into an arbitrarily
//! large synthetic dataset.
//!
//! A run threads one master seed through a [`VertexPool`] (vertex budgets and
//! locality-biased member sampling) and a [`Generator`] (hypertype and
//! hyperedge draws), buffering records in an [`OutputRotator`] that writes
//! numbered files of whole records.

use std::path::Path;

use hyperamp_core::HyperampError;

/// YAML configuration schema and defaults.
pub mod config;
/// Reflected Gaussian draws.
pub mod distribution;
/// Hypertype and hyperedge synthesis.
pub mod generator;
/// Run manifest serialization.
pub mod manifest;
/// Vertex pool manager.
pub mod pool;
/// Id counters and active-vertex budgets.
pub mod registry;
/// Buffered file rotation and append-only index files.
pub mod rotator;

pub use config::{
    AmplifyConfig, DistributionConfig, IdConfig, OutputConfig, PoolConfig, TargetConfig,
    ValidityInterval,
};
pub use distribution::{reflect, DistributionSpec, Floor, ReflectedNormal};
pub use generator::{format_record, Generator, RunSummary};
pub use manifest::{config_hash, RunManifest};
pub use pool::VertexPool;
pub use registry::Registry;
pub use rotator::{FileState, IndexFile, OutputRotator};

/// Applies any configured calibration, runs generation into `out_dir` and
/// writes the run manifest next to the data.
pub fn amplify(config: &AmplifyConfig, out_dir: &Path) -> Result<RunSummary, HyperampError> {
    let mut resolved = config.clone();
    resolved.resolve_calibration()?;
    let summary = Generator::new(&resolved, out_dir)?.run()?;
    let manifest = RunManifest::new(&resolved, &summary, out_dir)?;
    manifest.write(&out_dir.join(&resolved.output.manifest_file))?;
    Ok(summary)
}
