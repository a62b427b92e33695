//! Seeded randomness for graph generators, property tests and benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Deterministic RNG handle.
///
/// Wraps `StdRng` seeded from a caller supplied `u64`. Independent streams
/// (one per generated graph, say) are obtained with [`RngHandle::substream`],
/// which seeds a new handle from SipHash-1-3 over `(seed, substream)` with zero
/// keys, so the derivation is identical on every platform.
#[derive(Debug, Clone)]
pub struct RngHandle {
    seed: u64,
    rng: StdRng,
}

impl RngHandle {
    /// Creates a new RNG handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns an independent handle for the given substream of this seed.
    pub fn substream(&self, substream: u64) -> Self {
        Self::from_seed(derive_substream_seed(self.seed, substream))
    }

    /// Returns the master seed this handle was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws an index uniformly from `0..bound`. `bound` must be positive.
    pub fn index(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
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

/// Derives the deterministic seed for a specific substream.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}
