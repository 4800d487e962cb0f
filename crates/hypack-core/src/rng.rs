//! Deterministic RNG keys for reproducible packing runs.
//!
//! Keys are plain u64 seeds that can be split JAX-style into independent
//! child keys. Every random draw in hypack comes from a [`ChaCha8Rng`] built
//! from a key, so the same key always reproduces the same trajectory.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed from which a packing run derives all of its randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RngKey(pub u64);

impl RngKey {
    pub fn new(seed: u64) -> Self {
        RngKey(seed)
    }

    /// Derive `n` child keys, one per independent run.
    ///
    /// A single child is the key itself, so a one-start search reproduces a
    /// plain run under the same key.
    pub fn split(self, n: usize) -> Vec<RngKey> {
        match n {
            0 => Vec::new(),
            1 => vec![self],
            _ => {
                let mut parent = self.to_rng();
                (0..n).map(|_| RngKey(parent.next_u64())).collect()
            }
        }
    }

    /// Generator for every draw made under this key: initial points first,
    /// then tangent bases in round and point order.
    pub fn to_rng(self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0)
    }
}
