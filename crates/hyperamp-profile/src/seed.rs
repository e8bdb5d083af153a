use hyperamp_core::errors::{ErrorInfo, HyperampError};

/// Minimum number of fields (after separator removal) a seed record must carry:
/// hyperedge label, hypertype id and the two validity dates.
pub const MIN_FIELDS: usize = 4;

/// Separator token placed around the member list in record lines.
pub const MEMBER_SEPARATOR: &str = "|";

/// The parts of a seed hyperedge record the profiler consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRecord {
    /// Hypertype the hyperedge belongs to.
    pub hypertype: u64,
    /// Member vertex identifiers in record order.
    pub vertices: Vec<u64>,
}

impl SeedRecord {
    /// Number of member vertices.
    pub fn size(&self) -> usize {
        self.vertices.len()
    }
}

/// Parses one tab-delimited seed line.
///
/// `|` tokens are dropped before counting fields. Field 1 is the hypertype id,
/// the last two fields are the validity interval and everything in between is
/// the member list. Blank lines yield `Ok(None)`; anything structurally short
/// or non-numeric is an input error carrying `source` and `line_no`.
pub fn parse_record(
    line: &str,
    source: &str,
    line_no: usize,
) -> Result<Option<SeedRecord>, HyperampError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }
    let fields: Vec<&str> = line
        .split('\t')
        .filter(|field| *field != MEMBER_SEPARATOR)
        .collect();
    if fields.len() < MIN_FIELDS {
        return Err(HyperampError::Input(
            ErrorInfo::new("too-few-fields", "seed record is structurally incomplete")
                .with_context("source", source)
                .with_context("line", line_no.to_string())
                .with_context("fields", fields.len().to_string())
                .with_hint("records need a label, a hypertype, members and two dates"),
        ));
    }

    let hypertype = parse_id(fields[1], "bad-hypertype-id", source, line_no)?;
    let vertices = fields[2..fields.len() - 2]
        .iter()
        .map(|field| parse_id(field, "bad-vertex-id", source, line_no))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(SeedRecord {
        hypertype,
        vertices,
    }))
}

fn parse_id(field: &str, code: &str, source: &str, line_no: usize) -> Result<u64, HyperampError> {
    field.trim().parse::<u64>().map_err(|err| {
        HyperampError::Input(
            ErrorInfo::new(code, err.to_string())
                .with_context("source", source)
                .with_context("line", line_no.to_string())
                .with_context("field", field),
        )
    })
}
