//! Seeded randomness shared by the vertex pool and the generator.

use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use siphasher::sip::SipHasher13;

/// Independent draw sequences carved out of one master seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Substream {
    /// Vertex pool: occurrence budgets, re-credit picks and member positions.
    Pool,
    /// Generator: hyperedges per hypertype and members per hyperedge.
    Generator,
}

impl Substream {
    /// Stable numeric tag mixed into the derived seed.
    pub fn id(self) -> u64 {
        match self {
            Substream::Pool => 1,
            Substream::Generator => 2,
        }
    }
}

/// `StdRng` owned by exactly one randomized component.
///
/// The pool and the generator each get their own handle, so a change in how
/// many sizes the generator draws never shifts the budgets or positions the
/// pool sees for the same master seed.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Handle seeded directly from `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Handle for `substream` of a run seeded with `master_seed`.
    pub fn substream(master_seed: u64, substream: Substream) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, substream))
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// SipHash-1-3 (zero keys) of `(master_seed, substream tag)`.
pub fn derive_substream_seed(master_seed: u64, substream: Substream) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream.id());
    hasher.finish()
}
