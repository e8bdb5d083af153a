use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use hyperamp_core::errors::HyperampError;
use hyperamp_core::{HyperedgeId, HypertypeId, RngHandle, Substream, VertexId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{AmplifyConfig, ValidityInterval};
use crate::distribution::{ReflectedNormal, EDGE_SIZE_FLOOR, HYPERTYPE_FLOOR};
use crate::pool::VertexPool;
use crate::registry::Registry;
use crate::rotator::{IndexFile, OutputRotator};

/// Totals reported after a run completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Vertex ids minted.
    pub vertices: u64,
    /// Hypertypes generated.
    pub hypertypes: u64,
    /// Hyperedges generated.
    pub hyperedges: u64,
    /// Pool replenishments, including the initial one.
    pub replenishments: u64,
    /// Rotated data files, in suffix order.
    pub files: Vec<PathBuf>,
}

/// Streaming hypertype/hyperedge generator.
///
/// Owns the registry, the vertex pool and the output rotator for one run.
/// Output lands in a single directory: rotated record files plus the vertex
/// and hypertype name indexes.
#[derive(Debug)]
pub struct Generator {
    registry: Registry,
    pool: VertexPool,
    rotator: OutputRotator,
    hypertype_index: IndexFile,
    hypertype_counts: ReflectedNormal,
    edge_sizes: ReflectedNormal,
    rng: RngHandle,
    validity: ValidityInterval,
    label_prefix: String,
    initial_batch: usize,
    target_hyperedges: u64,
    target_vertices: u64,
}

impl Generator {
    /// Validates `config` and prepares a generator writing into `out_dir`.
    ///
    /// Distributions are used as configured; call
    /// [`AmplifyConfig::resolve_calibration`] beforehand to apply a report.
    pub fn new(config: &AmplifyConfig, out_dir: &Path) -> Result<Self, HyperampError> {
        config.validate()?;
        fs::create_dir_all(out_dir).map_err(|err| HyperampError::io("output-mkdir", out_dir, err))?;

        let output = &config.output;
        let pool = VertexPool::new(
            &config.pool,
            &config.distributions.occurrence,
            IndexFile::new(out_dir.join(&output.vertex_index)),
            RngHandle::substream(config.seed, Substream::Pool),
        )?;
        let rotator = OutputRotator::new(
            out_dir.to_path_buf(),
            output.file_prefix.clone(),
            output.file_extension.clone(),
            output.records_per_file,
            output.first_file_index,
        );
        Ok(Self {
            registry: Registry::new(&config.ids),
            pool,
            rotator,
            hypertype_index: IndexFile::new(out_dir.join(&output.hypertype_index)),
            hypertype_counts: ReflectedNormal::new(
                "hypertype",
                &config.distributions.hypertype,
                HYPERTYPE_FLOOR,
            )?,
            edge_sizes: ReflectedNormal::new(
                "edge_size",
                &config.distributions.edge_size,
                EDGE_SIZE_FLOOR,
            )?,
            rng: RngHandle::substream(config.seed, Substream::Generator),
            validity: config.validity.clone(),
            label_prefix: config.hyperedge_label_prefix.clone(),
            initial_batch: output.records_per_file,
            target_hyperedges: config.targets.hyperedges,
            target_vertices: config.targets.vertices,
        })
    }

    /// Allocates a hypertype, records its name and emits its hyperedges.
    pub fn generate_hypertype(&mut self) -> Result<HypertypeId, HyperampError> {
        let htid = self.registry.allocate_hypertype()?;
        self.hypertype_index
            .append_lines([format!("HyperType{htid}\t\t{htid}")])?;
        let edges = self.hypertype_counts.sample_count(&mut self.rng);
        for _ in 0..edges {
            self.generate_hyperedge(htid)?;
        }
        Ok(htid)
    }

    /// Allocates one hyperedge of `hypertype`, samples its members and hands
    /// the formatted record to the rotator.
    pub fn generate_hyperedge(
        &mut self,
        hypertype: HypertypeId,
    ) -> Result<HyperedgeId, HyperampError> {
        let hid = self.registry.allocate_hyperedge()?;
        let size = self.edge_sizes.sample_count(&mut self.rng) as usize;
        let members = self
            .pool
            .sample_without_replacement(&mut self.registry, size)?;
        let record = format_record(&self.label_prefix, hid, hypertype, &members, &self.validity);
        self.rotator.append(record)?;
        Ok(hid)
    }

    /// Runs generation to completion: seeds the pool with one output batch of
    /// vertices, emits hypertypes until both targets are met, then flushes the
    /// remaining buffer.
    pub fn run(mut self) -> Result<RunSummary, HyperampError> {
        let initial = self.initial_batch;
        self.pool.replenish(&mut self.registry, initial)?;
        while self.registry.hyperedges_issued() < self.target_hyperedges
            || self.registry.vertices_issued() < self.target_vertices
        {
            self.generate_hypertype()?;
        }
        self.rotator.flush()?;

        let summary = RunSummary {
            vertices: self.registry.vertices_issued(),
            hypertypes: self.registry.hypertypes_issued(),
            hyperedges: self.registry.hyperedges_issued(),
            replenishments: self.pool.replenishments(),
            files: self.rotator.files().to_vec(),
        };
        info!(
            vertices = summary.vertices,
            hypertypes = summary.hypertypes,
            hyperedges = summary.hyperedges,
            files = summary.files.len(),
            "generation complete"
        );
        Ok(summary)
    }

    /// Id counters and the active-vertex table.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Output rotator (pending buffer and files written so far).
    pub fn rotator(&self) -> &OutputRotator {
        &self.rotator
    }
}

/// Formats one hyperedge line:
/// `<prefix><hid>\t<htid>\t|\t<vid0>\t...\t<vidN>\t|\t<start>\t<end>\n`.
pub fn format_record(
    label_prefix: &str,
    hid: HyperedgeId,
    hypertype: HypertypeId,
    members: &[VertexId],
    validity: &ValidityInterval,
) -> String {
    let mut line = format!("{label_prefix}{hid}\t{hypertype}\t|\t");
    for vid in members {
        let _ = write!(line, "{vid}\t");
    }
    let _ = writeln!(line, "|\t{}\t{}", validity.start, validity.end);
    line
}
