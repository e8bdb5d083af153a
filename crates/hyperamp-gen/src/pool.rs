use std::collections::HashMap;

use hyperamp_core::errors::{ErrorInfo, HyperampError};
use hyperamp_core::{RngHandle, VertexId};
use rand::Rng;
use rand_distr::{Distribution as _, Normal};
use tracing::debug;

use crate::config::PoolConfig;
use crate::distribution::{DistributionSpec, ReflectedNormal, OCCURRENCE_FLOOR};
use crate::registry::Registry;
use crate::rotator::IndexFile;

/// Vertex pool manager: mints vertices with occurrence budgets and hands them
/// out in locality-biased batches.
#[derive(Debug)]
pub struct VertexPool {
    config: PoolConfig,
    occurrence: ReflectedNormal,
    locality: Normal<f64>,
    vertex_index: IndexFile,
    rng: RngHandle,
    replenishments: u64,
}

impl VertexPool {
    /// Creates a pool drawing budgets from `occurrence` and recording minted
    /// vertex names in `vertex_index`.
    pub fn new(
        config: &PoolConfig,
        occurrence: &DistributionSpec,
        vertex_index: IndexFile,
        rng: RngHandle,
    ) -> Result<Self, HyperampError> {
        let locality = Normal::new(0.0, config.locality_width).map_err(|err| {
            HyperampError::Config(
                ErrorInfo::new("bad-locality-width", err.to_string())
                    .with_context("field", "pool.locality_width"),
            )
        })?;
        Ok(Self {
            config: config.clone(),
            occurrence: ReflectedNormal::new("occurrence", occurrence, OCCURRENCE_FLOOR)?,
            locality,
            vertex_index,
            rng,
            replenishments: 0,
        })
    }

    /// Mints `batch` vertices, logs their names to the vertex index and
    /// re-credits `batch / recredit_divisor` older vertices with a reduced
    /// budget. Returns the freshly minted ids.
    pub fn replenish(
        &mut self,
        registry: &mut Registry,
        batch: usize,
    ) -> Result<Vec<VertexId>, HyperampError> {
        let older_end = registry.next_vertex();
        let mut minted = Vec::with_capacity(batch);
        for _ in 0..batch {
            let budget = self.occurrence.sample_count(&mut self.rng).max(1);
            minted.push(registry.register_vertex(budget)?);
        }
        self.vertex_index
            .append_lines(minted.iter().map(|vid| format!("Entity{vid}\t\t{vid}")))?;

        let floor = registry.vertex_space().floor;
        let mut recredited = 0usize;
        if older_end > floor {
            for _ in 0..batch / self.config.recredit_divisor {
                let old = VertexId::from_raw(self.rng.gen_range(floor..older_end));
                let budget =
                    self.occurrence.sample_count(&mut self.rng) / self.config.recredit_shrink + 1;
                registry.recredit(old, budget)?;
                recredited += 1;
            }
        }

        self.replenishments += 1;
        debug!(
            minted = batch,
            recredited,
            active = registry.active_len(),
            next_vertex = registry.next_vertex(),
            "replenished vertex pool"
        );
        Ok(minted)
    }

    /// Draws `k` distinct active vertices, spending one occurrence of each.
    ///
    /// Replenishes first while fewer than `k + headroom` vertices are active.
    /// Positions index the registry's slot table in generation order. The
    /// first position is uniform; each later one is the previous pick shifted
    /// by a Gaussian offset of width `locality_width`, falling back to uniform
    /// when it leaves the table. Visited slots are swap-removed from a
    /// per-call slot overlay, so the table itself is never copied and a
    /// tombstone hit simply costs one more draw.
    pub fn sample_without_replacement(
        &mut self,
        registry: &mut Registry,
        k: usize,
    ) -> Result<Vec<VertexId>, HyperampError> {
        while registry.active_len() < k + self.config.headroom {
            self.replenish(registry, self.config.replenish_batch)?;
        }

        let mut working = SlotOverlay::new(registry.slot_count());
        let mut picked = Vec::with_capacity(k);
        let mut last: Option<usize> = None;
        while picked.len() < k {
            let len = working.len();
            let position = match last {
                None => self.rng.gen_range(0..len),
                Some(previous) => {
                    let shifted = (previous as f64 + self.locality.sample(&mut self.rng)) as i64;
                    if shifted >= 0 && (shifted as usize) < len {
                        shifted as usize
                    } else {
                        self.rng.gen_range(0..len)
                    }
                }
            };
            if let Some(vid) = registry.active_at(working.swap_remove(position)) {
                picked.push(vid);
                last = Some(position);
            }
        }
        for vid in &picked {
            registry.consume(*vid)?;
        }
        Ok(picked)
    }

    /// Number of replenishments performed so far.
    pub fn replenishments(&self) -> u64 {
        self.replenishments
    }

    /// Vertex name index written by this pool.
    pub fn vertex_index(&self) -> &IndexFile {
        &self.vertex_index
    }
}

/// Virtual copy of `0..len` supporting swap-remove.
///
/// Only positions that have been overwritten are stored, so a call touching
/// `k` slots costs `O(k)` regardless of the table size.
#[derive(Debug)]
struct SlotOverlay {
    len: usize,
    moved: HashMap<usize, usize>,
}

impl SlotOverlay {
    fn new(len: usize) -> Self {
        Self {
            len,
            moved: HashMap::new(),
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, position: usize) -> usize {
        self.moved.get(&position).copied().unwrap_or(position)
    }

    /// Returns the slot at `position` and moves the last slot into its place.
    fn swap_remove(&mut self, position: usize) -> usize {
        let slot = self.get(position);
        let tail = self.len - 1;
        let replacement = self.get(tail);
        self.moved.remove(&tail);
        if position != tail {
            self.moved.insert(position, replacement);
        }
        self.len = tail;
        slot
    }
}
