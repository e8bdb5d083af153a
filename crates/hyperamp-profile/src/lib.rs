#![deny(missing_docs)]

//! Distribution profiler for seed hypergraph datasets.
//!
//! A profiling pass reads hyperedge records once and accumulates three
//! histograms: hyperedges per hypertype, members per hyperedge and occurrences
//! per vertex. Each histogram is summarised as a `(mean, std_dev)` pair; the
//! rendered report doubles as the calibration input of the generator.

mod histogram;
mod profiler;
mod report;
mod seed;
pub mod stats;

pub use histogram::Histogram;
pub use profiler::{collect_seed_files, profile_path, Profiler};
pub use report::{
    Calibration, ProfileReport, ReportSection, EDGE_SIZE_HEADER, HYPERTYPE_HEADER,
    OCCURRENCE_HEADER, SUMMARY_PREFIX,
};
pub use seed::{parse_record, SeedRecord, MEMBER_SEPARATOR, MIN_FIELDS};
pub use stats::{median_central_stats, weighted_mean_stats};
