use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use hyperamp_core::errors::{ErrorInfo, HyperampError};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::histogram::Histogram;
use crate::report::{
    ProfileReport, ReportSection, EDGE_SIZE_HEADER, HYPERTYPE_HEADER, OCCURRENCE_HEADER,
};
use crate::seed::{parse_record, SeedRecord};
use crate::stats::{median_central_stats, weighted_mean_stats};

/// Single-pass accumulator for the three seed histograms.
#[derive(Debug, Default)]
pub struct Profiler {
    hypertypes: Histogram,
    edge_sizes: Histogram,
    vertex_counts: Histogram,
    records: u64,
    skipped: u64,
}

impl Profiler {
    /// Creates an empty profiler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one hyperedge of hypertype `id`.
    pub fn record_hypertype(&mut self, id: u64) {
        self.hypertypes.record(id);
    }

    /// Counts one hyperedge with `size` members.
    pub fn record_edge_size(&mut self, size: usize) {
        self.edge_sizes.record(size as u64);
    }

    /// Counts one appearance of vertex `vid` as a hyperedge member.
    pub fn record_vertex_occurrence(&mut self, vid: u64) {
        self.vertex_counts.record(vid);
    }

    /// Feeds a parsed record into all three histograms.
    pub fn observe(&mut self, record: &SeedRecord) {
        self.record_hypertype(record.hypertype);
        self.record_edge_size(record.size());
        for &vid in &record.vertices {
            self.record_vertex_occurrence(vid);
        }
        self.records += 1;
    }

    /// Number of records observed so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Blank lines passed over so far.
    pub fn skipped_lines(&self) -> u64 {
        self.skipped
    }

    /// Hypertype id -> hyperedge count.
    pub fn hypertype_histogram(&self) -> &Histogram {
        &self.hypertypes
    }

    /// Hyperedge size -> hyperedge count.
    pub fn edge_size_histogram(&self) -> &Histogram {
        &self.edge_sizes
    }

    /// Occurrence count -> number of vertices seen exactly that many times.
    pub fn derive_vertex_occurrence_histogram(&self) -> Histogram {
        self.vertex_counts.invert()
    }

    /// Consumes every line of `reader`, aborting on the first malformed record.
    pub fn ingest_reader<R: BufRead>(
        &mut self,
        reader: R,
        source: &str,
    ) -> Result<u64, HyperampError> {
        let mut ingested = 0u64;
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|err| {
                HyperampError::Io(
                    ErrorInfo::new("seed-read", err.to_string())
                        .with_context("source", source)
                        .with_context("line", (idx + 1).to_string()),
                )
            })?;
            match parse_record(&line, source, idx + 1)? {
                Some(record) => {
                    self.observe(&record);
                    ingested += 1;
                }
                None => {
                    debug!(source, line = idx + 1, "skipping blank seed line");
                    self.skipped += 1;
                }
            }
        }
        Ok(ingested)
    }

    /// Profiles a single seed file.
    pub fn ingest_file(&mut self, path: &Path) -> Result<u64, HyperampError> {
        info!(path = %path.display(), "processing seed file");
        let file = File::open(path).map_err(|err| HyperampError::io("seed-open", path, err))?;
        let ingested = self.ingest_reader(BufReader::new(file), &path.display().to_string())?;
        debug!(path = %path.display(), records = ingested, "seed file done");
        Ok(ingested)
    }

    /// Builds the three-section report from the accumulated histograms.
    pub fn report(&self) -> Result<ProfileReport, HyperampError> {
        if self.records == 0 {
            return Err(HyperampError::Input(ErrorInfo::new(
                "empty-seed-set",
                "no seed records were profiled",
            )));
        }
        let occurrences = self.derive_vertex_occurrence_histogram();
        let occurrence_profile = weighted_mean_stats(&occurrences)?;
        Ok(ProfileReport {
            hypertypes: ReportSection {
                header: HYPERTYPE_HEADER,
                profile: median_central_stats(&self.hypertypes)?,
                histogram: self.hypertypes.clone(),
            },
            edge_sizes: ReportSection {
                header: EDGE_SIZE_HEADER,
                profile: weighted_mean_stats(&self.edge_sizes)?,
                histogram: self.edge_sizes.clone(),
            },
            vertex_occurrences: ReportSection {
                header: OCCURRENCE_HEADER,
                profile: occurrence_profile,
                histogram: occurrences,
            },
        })
    }
}

/// Lists the seed files under `path`: the path itself when it is a file,
/// otherwise every file below it whose extension equals `extension`, sorted
/// by file name.
pub fn collect_seed_files(path: &Path, extension: &str) -> Result<Vec<PathBuf>, HyperampError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            HyperampError::Io(
                ErrorInfo::new("seed-walk", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let matches = entry.file_type().is_file()
            && entry.path().extension().and_then(|ext| ext.to_str()) == Some(extension);
        if matches {
            files.push(entry.into_path());
        }
    }
    if files.is_empty() {
        return Err(HyperampError::Input(
            ErrorInfo::new("empty-seed-set", "no seed files found")
                .with_context("path", path.display().to_string())
                .with_context("extension", extension),
        ));
    }
    Ok(files)
}

/// Profiles a seed file or directory and returns the report.
pub fn profile_path(path: &Path, extension: &str) -> Result<ProfileReport, HyperampError> {
    let files = collect_seed_files(path, extension)?;
    info!(files = files.len(), path = %path.display(), "profiling seed dataset");
    let mut profiler = Profiler::new();
    for file in &files {
        profiler.ingest_file(file)?;
    }
    info!(records = profiler.records(), "seed dataset profiled");
    profiler.report()
}
