use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, HyperampError};

/// Half-open numeric range `[floor, ceiling)` reserved for one identifier kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSpace {
    /// First identifier handed out by a counter over this space.
    pub floor: u64,
    /// Exclusive upper bound; allocating this value is an invariant violation.
    pub ceiling: u64,
}

impl IdSpace {
    /// Creates a new identifier space.
    pub const fn new(floor: u64, ceiling: u64) -> Self {
        Self { floor, ceiling }
    }

    /// Returns `true` when `raw` lies inside the space.
    pub fn contains(&self, raw: u64) -> bool {
        raw >= self.floor && raw < self.ceiling
    }

    /// Returns `true` when the two spaces share at least one identifier.
    pub fn overlaps(&self, other: &IdSpace) -> bool {
        self.floor < other.ceiling && other.floor < self.ceiling
    }

    /// Number of identifiers the space can hold.
    pub fn capacity(&self) -> u64 {
        self.ceiling.saturating_sub(self.floor)
    }
}

/// Monotonic allocator over an [`IdSpace`].
///
/// Identifiers are strictly increasing and never reused. Running past the
/// ceiling is reported as [`HyperampError::Invariant`].
#[derive(Debug, Clone)]
pub struct IdCounter {
    kind: &'static str,
    space: IdSpace,
    next: u64,
}

impl IdCounter {
    /// Creates a counter positioned at the floor of `space`.
    pub fn new(kind: &'static str, space: IdSpace) -> Self {
        Self {
            kind,
            space,
            next: space.floor,
        }
    }

    /// Hands out the next identifier.
    pub fn allocate(&mut self) -> Result<u64, HyperampError> {
        let raw = self.next;
        if !self.space.contains(raw) {
            return Err(HyperampError::Invariant(
                ErrorInfo::new("id-out-of-range", "identifier allocated outside its space")
                    .with_context("kind", self.kind)
                    .with_context("id", raw.to_string())
                    .with_context("floor", self.space.floor.to_string())
                    .with_context("ceiling", self.space.ceiling.to_string())
                    .with_hint("raise the ceiling or lower the generation targets"),
            ));
        }
        self.next = raw + 1;
        Ok(raw)
    }

    /// Identifier that the next call to [`IdCounter::allocate`] will return.
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Number of identifiers handed out so far.
    pub fn issued(&self) -> u64 {
        self.next - self.space.floor
    }

    /// Space this counter allocates from.
    pub fn space(&self) -> IdSpace {
        self.space
    }
}

/// Gaussian summary `(mean, std_dev)` estimated from one frequency histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionProfile {
    /// Central estimate (mean or median depending on the estimator).
    pub mean: f64,
    /// Dispersion around the central estimate.
    pub std_dev: f64,
}

impl DistributionProfile {
    /// Creates a new profile.
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }
}
