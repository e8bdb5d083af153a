use hyperamp_core::errors::{ErrorInfo, HyperampError};
use hyperamp_core::{HyperedgeId, HypertypeId, IdCounter, IdSpace, VertexId};
use indexmap::IndexMap;

use crate::config::IdConfig;

/// Owns every id counter and the active-vertex budget table of a run.
///
/// The table maps vertex id -> remaining occurrence budget in generation
/// order. Evicting a vertex leaves a tombstone (budget 0) in its slot so the
/// live ids keep their relative order; tombstones are dropped in one
/// order-preserving pass once they outnumber the live entries. Evicted ids stay
/// allocated and are never handed out again by the vertex counter.
#[derive(Debug, Clone)]
pub struct Registry {
    hypertypes: IdCounter,
    hyperedges: IdCounter,
    vertices: IdCounter,
    active: IndexMap<VertexId, u64>,
    live: usize,
}

impl Registry {
    /// Creates a registry with fresh counters positioned at each floor.
    pub fn new(ids: &IdConfig) -> Self {
        Self {
            hypertypes: IdCounter::new("hypertype", ids.hypertype),
            hyperedges: IdCounter::new("hyperedge", ids.hyperedge),
            vertices: IdCounter::new("vertex", ids.vertex),
            active: IndexMap::new(),
            live: 0,
        }
    }

    /// Allocates the next hypertype id.
    pub fn allocate_hypertype(&mut self) -> Result<HypertypeId, HyperampError> {
        self.hypertypes.allocate().map(HypertypeId::from_raw)
    }

    /// Allocates the next hyperedge id.
    pub fn allocate_hyperedge(&mut self) -> Result<HyperedgeId, HyperampError> {
        self.hyperedges.allocate().map(HyperedgeId::from_raw)
    }

    /// Allocates a vertex id and activates it with `budget` occurrences.
    /// A zero budget leaves the id allocated but inactive.
    pub fn register_vertex(&mut self, budget: u64) -> Result<VertexId, HyperampError> {
        let vid = VertexId::from_raw(self.vertices.allocate()?);
        if budget > 0 {
            self.active.insert(vid, budget);
            self.live += 1;
        }
        Ok(vid)
    }

    /// Sets the budget of an already allocated vertex.
    ///
    /// An evicted id whose tombstone is still in place is revived in its
    /// original slot; one already compacted away is appended at the end.
    pub fn recredit(&mut self, vid: VertexId, budget: u64) -> Result<(), HyperampError> {
        if !self.is_allocated(vid) {
            return Err(unknown_vertex(vid, "recredit"));
        }
        match self.active.get_mut(&vid) {
            Some(current) => {
                match (*current > 0, budget > 0) {
                    (false, true) => self.live += 1,
                    (true, false) => self.live -= 1,
                    _ => {}
                }
                *current = budget;
            }
            None if budget > 0 => {
                self.active.insert(vid, budget);
                self.live += 1;
            }
            None => {}
        }
        self.compact_if_sparse();
        Ok(())
    }

    /// Uses one occurrence of an active vertex and returns what remains.
    /// The vertex is evicted when its budget reaches zero.
    pub fn consume(&mut self, vid: VertexId) -> Result<u64, HyperampError> {
        let budget = match self.active.get_mut(&vid) {
            Some(budget) if *budget > 0 => budget,
            _ => return Err(unknown_vertex(vid, "consume")),
        };
        *budget -= 1;
        let remaining = *budget;
        if remaining == 0 {
            self.live -= 1;
            self.compact_if_sparse();
        }
        Ok(remaining)
    }

    fn compact_if_sparse(&mut self) {
        if self.active.len() - self.live > self.live {
            self.active.retain(|_, budget| *budget > 0);
        }
    }

    /// Remaining budget of an active vertex.
    pub fn budget(&self, vid: VertexId) -> Option<u64> {
        self.active.get(&vid).copied().filter(|budget| *budget > 0)
    }

    /// Whether `vid` has been handed out by the vertex counter.
    pub fn is_allocated(&self, vid: VertexId) -> bool {
        let raw = vid.as_raw();
        raw >= self.vertices.space().floor && raw < self.vertices.peek()
    }

    /// Number of vertices that can currently be sampled.
    pub fn active_len(&self) -> usize {
        self.live
    }

    /// Number of slots in the active table, tombstones included.
    pub fn slot_count(&self) -> usize {
        self.active.len()
    }

    /// Vertex held by `slot`, or `None` for a tombstone or an index past the end.
    pub fn active_at(&self, slot: usize) -> Option<VertexId> {
        self.active
            .get_index(slot)
            .filter(|(_, budget)| **budget > 0)
            .map(|(vid, _)| *vid)
    }

    /// Live ids in table order.
    pub fn active_ids(&self) -> Vec<VertexId> {
        self.active
            .iter()
            .filter(|(_, budget)| **budget > 0)
            .map(|(vid, _)| *vid)
            .collect()
    }

    /// Vertex id space.
    pub fn vertex_space(&self) -> IdSpace {
        self.vertices.space()
    }

    /// Vertex id the next allocation will return.
    pub fn next_vertex(&self) -> u64 {
        self.vertices.peek()
    }

    /// Vertices minted so far.
    pub fn vertices_issued(&self) -> u64 {
        self.vertices.issued()
    }

    /// Hyperedges allocated so far.
    pub fn hyperedges_issued(&self) -> u64 {
        self.hyperedges.issued()
    }

    /// Hypertypes allocated so far.
    pub fn hypertypes_issued(&self) -> u64 {
        self.hypertypes.issued()
    }
}

fn unknown_vertex(vid: VertexId, operation: &str) -> HyperampError {
    HyperampError::Invariant(
        ErrorInfo::new("unknown-vertex", "vertex is not available for this operation")
            .with_context("vertex", vid.to_string())
            .with_context("operation", operation),
    )
}
