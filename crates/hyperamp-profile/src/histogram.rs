use std::collections::BTreeMap;

/// Frequency histogram mapping a key to the number of times it was observed.
///
/// Keys iterate in ascending order, which is also the order used when the
/// histogram is rendered into a profiling report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: BTreeMap<u64, u64>,
}

impl Histogram {
    /// Creates an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observation of `key`.
    pub fn record(&mut self, key: u64) {
        self.add(key, 1);
    }

    /// Records `count` observations of `key`.
    pub fn add(&mut self, key: u64, count: u64) {
        *self.counts.entry(key).or_insert(0) += count;
    }

    /// Number of observations recorded for `key`.
    pub fn count(&self, key: u64) -> u64 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterates `(key, count)` pairs sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts.iter().map(|(&key, &count)| (key, count))
    }

    /// Inverts the histogram: each distinct count becomes a key whose value is
    /// the number of original keys observed that many times.
    pub fn invert(&self) -> Histogram {
        let mut inverted = Histogram::new();
        for &count in self.counts.values() {
            inverted.record(count);
        }
        inverted
    }
}

impl FromIterator<(u64, u64)> for Histogram {
    fn from_iter<I: IntoIterator<Item = (u64, u64)>>(iter: I) -> Self {
        let mut histogram = Histogram::new();
        for (key, count) in iter {
            histogram.add(key, count);
        }
        histogram
    }
}
