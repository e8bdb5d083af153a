use std::fs;
use std::path::{Path, PathBuf};

use hyperamp_core::errors::{ErrorInfo, HyperampError};
use hyperamp_core::IdSpace;
use hyperamp_profile::Calibration;
use serde::{Deserialize, Serialize};

use crate::distribution::DistributionSpec;

/// YAML-configurable parameters governing an amplification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmplifyConfig {
    /// Master seed; every randomized component derives its substream from it.
    #[serde(default = "default_master_seed")]
    pub seed: u64,
    /// Identifier spaces for the three counters.
    #[serde(default)]
    pub ids: IdConfig,
    /// Totals that end generation once both are reached.
    #[serde(default)]
    pub targets: TargetConfig,
    /// Rotated file and index file layout.
    #[serde(default)]
    pub output: OutputConfig,
    /// Vertex pool behaviour.
    #[serde(default)]
    pub pool: PoolConfig,
    /// Distributions of the generated quantities.
    #[serde(default)]
    pub distributions: DistributionConfig,
    /// Validity interval stamped on every hyperedge.
    #[serde(default)]
    pub validity: ValidityInterval,
    /// Text prepended to the hyperedge id in each record (e.g. `HyperEdge`).
    #[serde(default)]
    pub hyperedge_label_prefix: String,
    /// Optional profiling report used to calibrate `distributions`.
    #[serde(default)]
    pub calibration: Option<PathBuf>,
}

fn default_master_seed() -> u64 {
    0x5EED_A4F1_u64
}

impl Default for AmplifyConfig {
    fn default() -> Self {
        Self {
            seed: default_master_seed(),
            ids: IdConfig::default(),
            targets: TargetConfig::default(),
            output: OutputConfig::default(),
            pool: PoolConfig::default(),
            distributions: DistributionConfig::default(),
            validity: ValidityInterval::default(),
            hyperedge_label_prefix: String::new(),
            calibration: None,
        }
    }
}

impl AmplifyConfig {
    /// Loads a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, HyperampError> {
        let raw =
            fs::read_to_string(path).map_err(|err| HyperampError::io("config-read", path, err))?;
        serde_yaml::from_str(&raw).map_err(|err| {
            HyperampError::Serde(
                ErrorInfo::new("config-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Overwrites the three distributions with measured profiles.
    pub fn apply_calibration(&mut self, calibration: &Calibration) {
        self.distributions.hypertype = DistributionSpec::calibrated(calibration.hypertype);
        self.distributions.edge_size = DistributionSpec::calibrated(calibration.edge_size);
        self.distributions.occurrence = DistributionSpec::calibrated(calibration.occurrence);
    }

    /// Loads the calibration report named by `calibration`, if any, and applies it.
    pub fn resolve_calibration(&mut self) -> Result<(), HyperampError> {
        if let Some(path) = self.calibration.clone() {
            let calibration = Calibration::load(&path)?;
            self.apply_calibration(&calibration);
        }
        Ok(())
    }

    /// Rejects configurations that would violate run invariants.
    pub fn validate(&self) -> Result<(), HyperampError> {
        self.ids.validate()?;
        self.output.validate()?;
        self.pool.validate()?;
        self.distributions.validate()?;
        Ok(())
    }
}

/// Identifier spaces for hypertypes, vertices and hyperedges.
///
/// The spaces must be pairwise disjoint so that no numeric id is ever shared
/// between two entity kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdConfig {
    /// Hypertype ids.
    #[serde(default = "default_hypertype_space")]
    pub hypertype: IdSpace,
    /// Vertex ids.
    #[serde(default = "default_vertex_space")]
    pub vertex: IdSpace,
    /// Hyperedge ids.
    #[serde(default = "default_hyperedge_space")]
    pub hyperedge: IdSpace,
}

fn default_hypertype_space() -> IdSpace {
    IdSpace::new(2, 65_536)
}

fn default_vertex_space() -> IdSpace {
    IdSpace::new(65_536, 1 << 32)
}

fn default_hyperedge_space() -> IdSpace {
    IdSpace::new(1 << 32, u64::MAX)
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            hypertype: default_hypertype_space(),
            vertex: default_vertex_space(),
            hyperedge: default_hyperedge_space(),
        }
    }
}

impl IdConfig {
    fn validate(&self) -> Result<(), HyperampError> {
        let spaces = [
            ("hypertype", self.hypertype),
            ("vertex", self.vertex),
            ("hyperedge", self.hyperedge),
        ];
        for (name, space) in spaces {
            if space.capacity() == 0 {
                return Err(HyperampError::Config(
                    ErrorInfo::new("empty-id-space", "id space floor must be below its ceiling")
                        .with_context("space", name)
                        .with_context("floor", space.floor.to_string())
                        .with_context("ceiling", space.ceiling.to_string()),
                ));
            }
        }
        for (idx, (left_name, left)) in spaces.iter().enumerate() {
            for (right_name, right) in &spaces[idx + 1..] {
                if left.overlaps(right) {
                    return Err(HyperampError::Config(
                        ErrorInfo::new("overlapping-id-spaces", "id spaces must be disjoint")
                            .with_context("left", *left_name)
                            .with_context("right", *right_name),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Totals that terminate generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Minimum number of hyperedges to emit.
    #[serde(default = "default_target_hyperedges")]
    pub hyperedges: u64,
    /// Minimum number of vertex ids to mint.
    #[serde(default = "default_target_vertices")]
    pub vertices: u64,
}

fn default_target_hyperedges() -> u64 {
    100_000_000
}

fn default_target_vertices() -> u64 {
    10_000_000
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            hyperedges: default_target_hyperedges(),
            vertices: default_target_vertices(),
        }
    }
}

/// Output directory layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Records per rotated file; also the size of the initial vertex batch.
    #[serde(default = "default_records_per_file")]
    pub records_per_file: usize,
    /// Suffix of the first rotated file.
    #[serde(default)]
    pub first_file_index: u64,
    /// Rotated file name prefix.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Rotated file extension (without the dot).
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
    /// Vertex name index file.
    #[serde(default = "default_vertex_index")]
    pub vertex_index: PathBuf,
    /// Hypertype name index file.
    #[serde(default = "default_hypertype_index")]
    pub hypertype_index: PathBuf,
    /// Run manifest written after generation.
    #[serde(default = "default_manifest_file")]
    pub manifest_file: PathBuf,
}

fn default_records_per_file() -> usize {
    50_000
}

fn default_file_prefix() -> String {
    "hyper_id_uni".to_string()
}

fn default_file_extension() -> String {
    "nt".to_string()
}

fn default_vertex_index() -> PathBuf {
    PathBuf::from("str_normal")
}

fn default_hypertype_index() -> PathBuf {
    PathBuf::from("hyper_str_index")
}

fn default_manifest_file() -> PathBuf {
    PathBuf::from("manifest.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            records_per_file: default_records_per_file(),
            first_file_index: 0,
            file_prefix: default_file_prefix(),
            file_extension: default_file_extension(),
            vertex_index: default_vertex_index(),
            hypertype_index: default_hypertype_index(),
            manifest_file: default_manifest_file(),
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<(), HyperampError> {
        if self.records_per_file == 0 {
            return Err(HyperampError::Config(
                ErrorInfo::new("zero-capacity", "records_per_file must be positive")
                    .with_context("field", "output.records_per_file"),
            ));
        }
        if self.vertex_index == self.hypertype_index {
            return Err(HyperampError::Config(
                ErrorInfo::new("shared-index-file", "index files must be distinct")
                    .with_context("path", self.vertex_index.display().to_string()),
            ));
        }
        Ok(())
    }
}

/// Vertex pool tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Vertices minted per replenishment.
    #[serde(default = "default_replenish_batch")]
    pub replenish_batch: usize,
    /// Standard deviation of the positional offset between consecutive picks.
    #[serde(default = "default_locality_width")]
    pub locality_width: f64,
    /// Replenish when fewer than `k + headroom` ids are active before a
    /// sample of size `k`.
    #[serde(default = "default_headroom")]
    pub headroom: usize,
    /// One older id is re-credited per `recredit_divisor` minted ids.
    #[serde(default = "default_recredit_divisor")]
    pub recredit_divisor: usize,
    /// A re-credited id receives `draw / recredit_shrink + 1` occurrences.
    #[serde(default = "default_recredit_shrink")]
    pub recredit_shrink: u64,
}

fn default_replenish_batch() -> usize {
    500
}

fn default_locality_width() -> f64 {
    5.0
}

fn default_headroom() -> usize {
    3
}

fn default_recredit_divisor() -> usize {
    50
}

fn default_recredit_shrink() -> u64 {
    5
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            replenish_batch: default_replenish_batch(),
            locality_width: default_locality_width(),
            headroom: default_headroom(),
            recredit_divisor: default_recredit_divisor(),
            recredit_shrink: default_recredit_shrink(),
        }
    }
}

impl PoolConfig {
    fn validate(&self) -> Result<(), HyperampError> {
        let reject = |code: &str, message: &str, field: &str| {
            Err(HyperampError::Config(
                ErrorInfo::new(code, message).with_context("field", field),
            ))
        };
        if self.replenish_batch == 0 {
            return reject(
                "zero-batch",
                "replenish batch must be positive",
                "pool.replenish_batch",
            );
        }
        if !self.locality_width.is_finite() || self.locality_width < 0.0 {
            return reject(
                "bad-locality-width",
                "locality width must be finite and non-negative",
                "pool.locality_width",
            );
        }
        if self.recredit_divisor == 0 {
            return reject(
                "zero-recredit-divisor",
                "recredit divisor must be positive",
                "pool.recredit_divisor",
            );
        }
        if self.recredit_shrink == 0 {
            return reject(
                "zero-recredit-shrink",
                "recredit shrink must be positive",
                "pool.recredit_shrink",
            );
        }
        Ok(())
    }
}

/// Distributions of hyperedges per hypertype, members per hyperedge and
/// occurrences per vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Hyperedges per hypertype.
    #[serde(default = "default_hypertype_distribution")]
    pub hypertype: DistributionSpec,
    /// Members per hyperedge.
    #[serde(default = "default_edge_size_distribution")]
    pub edge_size: DistributionSpec,
    /// Occurrences per vertex.
    #[serde(default = "default_occurrence_distribution")]
    pub occurrence: DistributionSpec,
}

fn default_hypertype_distribution() -> DistributionSpec {
    DistributionSpec::uncalibrated(4093.0, 3793.3)
}

fn default_edge_size_distribution() -> DistributionSpec {
    DistributionSpec::uncalibrated(1.5, 107.6)
}

fn default_occurrence_distribution() -> DistributionSpec {
    DistributionSpec::uncalibrated(8.6, 10003.0)
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            hypertype: default_hypertype_distribution(),
            edge_size: default_edge_size_distribution(),
            occurrence: default_occurrence_distribution(),
        }
    }
}

impl DistributionConfig {
    fn validate(&self) -> Result<(), HyperampError> {
        let specs = [
            ("hypertype", &self.hypertype),
            ("edge_size", &self.edge_size),
            ("occurrence", &self.occurrence),
        ];
        for (name, spec) in specs {
            let sigma = spec.sigma();
            if !spec.mean.is_finite() || spec.mean < 0.0 || !sigma.is_finite() || sigma < 0.0 {
                return Err(HyperampError::Config(
                    ErrorInfo::new("bad-distribution", "mean and sigma must be finite and >= 0")
                        .with_context("distribution", name)
                        .with_context("mean", spec.mean.to_string())
                        .with_context("sigma", sigma.to_string()),
                ));
            }
        }
        Ok(())
    }
}

/// Validity interval written at the end of every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityInterval {
    /// Start date.
    #[serde(default = "default_validity_start")]
    pub start: String,
    /// End date.
    #[serde(default = "default_validity_end")]
    pub end: String,
}

fn default_validity_start() -> String {
    "2018-10-10".to_string()
}

fn default_validity_end() -> String {
    "2022-3-10".to_string()
}

impl Default for ValidityInterval {
    fn default() -> Self {
        Self {
            start: default_validity_start(),
            end: default_validity_end(),
        }
    }
}
