use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use hyperamp_core::errors::{ErrorInfo, HyperampError};
use hyperamp_core::DistributionProfile;

use crate::histogram::Histogram;

/// Header line of the hypertype edge-count section.
pub const HYPERTYPE_HEADER: &str = "htid\tcnt";
/// Header line of the hyperedge size section.
pub const EDGE_SIZE_HEADER: &str = "he_size\tcnt";
/// Header line of the vertex occurrence section.
pub const OCCURRENCE_HEADER: &str = "vid_ocurr_time\tcnt";
/// Prefix of the per-section summary line.
pub const SUMMARY_PREFIX: &str = "mu, sigma =";

/// One labelled histogram together with its fitted profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    /// Header line written above the `key\tcount` rows.
    pub header: &'static str,
    /// Observed frequencies.
    pub histogram: Histogram,
    /// Fitted `(mean, std_dev)`.
    pub profile: DistributionProfile,
}

impl ReportSection {
    fn render_into(&self, out: &mut String) {
        let _ = writeln!(out, "{}", self.header);
        for (key, count) in self.histogram.iter() {
            let _ = writeln!(out, "{key}\t{count}");
        }
        let _ = writeln!(
            out,
            "{SUMMARY_PREFIX} {:.1}, {:.1}",
            self.profile.mean, self.profile.std_dev
        );
        out.push('\n');
    }
}

/// Profiling report produced by a single pass over a seed dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileReport {
    /// Hypertype id -> number of hyperedges of that type.
    pub hypertypes: ReportSection,
    /// Hyperedge size -> number of hyperedges of that size.
    pub edge_sizes: ReportSection,
    /// Occurrence count -> number of vertices occurring that many times.
    pub vertex_occurrences: ReportSection,
}

impl ProfileReport {
    /// Renders the report in its textual layout.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.hypertypes.render_into(&mut out);
        self.edge_sizes.render_into(&mut out);
        self.vertex_occurrences.render_into(&mut out);
        out
    }

    /// Writes the rendered report to `path`, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), HyperampError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| HyperampError::io("report-mkdir", parent, err))?;
        }
        fs::write(path, self.render()).map_err(|err| HyperampError::io("report-write", path, err))
    }

    /// Calibration carried by the three section summaries.
    pub fn calibration(&self) -> Calibration {
        Calibration {
            hypertype: self.hypertypes.profile,
            edge_size: self.edge_sizes.profile,
            occurrence: self.vertex_occurrences.profile,
        }
    }
}

/// The three distributions recovered from a profiling report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Edges per hypertype.
    pub hypertype: DistributionProfile,
    /// Members per hyperedge.
    pub edge_size: DistributionProfile,
    /// Occurrences per vertex.
    pub occurrence: DistributionProfile,
}

impl Calibration {
    /// Parses the `mu, sigma = <mean>, <std>` summaries of a rendered report.
    ///
    /// Only the summary lines are read; the first three, in order, map to the
    /// hypertype, edge-size and occurrence distributions.
    pub fn parse(text: &str) -> Result<Self, HyperampError> {
        let mut profiles = Vec::with_capacity(3);
        for (idx, line) in text.lines().enumerate() {
            let Some(rest) = line.trim().strip_prefix(SUMMARY_PREFIX) else {
                continue;
            };
            profiles.push(parse_summary(rest, idx + 1)?);
            if profiles.len() == 3 {
                break;
            }
        }
        match profiles.as_slice() {
            [hypertype, edge_size, occurrence] => Ok(Self {
                hypertype: *hypertype,
                edge_size: *edge_size,
                occurrence: *occurrence,
            }),
            found => Err(HyperampError::Input(
                ErrorInfo::new(
                    "incomplete-report",
                    "profiling report must carry three summary lines",
                )
                .with_context("found", found.len().to_string()),
            )),
        }
    }

    /// Reads and parses a profiling report from disk.
    pub fn load(path: &Path) -> Result<Self, HyperampError> {
        let text = fs::read_to_string(path)
            .map_err(|err| HyperampError::io("report-read", path, err))?;
        Self::parse(&text).map_err(|err| match err {
            HyperampError::Input(info) => {
                HyperampError::Input(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }
}

fn parse_summary(rest: &str, line_no: usize) -> Result<DistributionProfile, HyperampError> {
    let values: Vec<&str> = rest.split(',').map(str::trim).collect();
    let parsed = match values.as_slice() {
        [mean, std_dev] => mean
            .parse::<f64>()
            .and_then(|mean| std_dev.parse::<f64>().map(|std_dev| (mean, std_dev)))
            .ok(),
        _ => None,
    };
    parsed
        .map(|(mean, std_dev)| DistributionProfile::new(mean, std_dev))
        .ok_or_else(|| {
            HyperampError::Input(
                ErrorInfo::new("bad-summary", "summary line must hold two numbers")
                    .with_context("line", line_no.to_string())
                    .with_context("text", rest.trim()),
            )
        })
}
