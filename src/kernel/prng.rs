//! PRNG handle lifecycle.
//!
//! spec.md's `prng_create`/`prng_destroy`/`prng_seed` triad maps onto
//! [`rand::rngs::SmallRng`]'s ordinary construction and `Drop`: Rust's RAII
//! already guarantees release on every exit path, so there's no explicit
//! `destroy` call to make — dropping a [`Prng`] is the destructor.

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// A per-worker-invocation PRNG handle.
///
/// Never shared across threads: each worker in the parallel generator
/// (C3) creates its own on entry and lets it drop on exit, so permutation
/// streams explored by different workers are independent.
pub struct Prng(SmallRng);

impl Prng {
    /// Creates a handle reseeded from a fresh high-entropy source, as
    /// required of every worker invocation of the permutation kernel
    /// (spec.md §4.2 "Reseeding") so parallel workers don't explore
    /// correlated sequences.
    pub fn create() -> Self {
        Self(SmallRng::from_os_rng())
    }

    /// Creates a handle from an explicit seed. Used by tests and by
    /// callers who need the "same seed sequence" reproducibility spec.md
    /// §8 invariant 5 calls for.
    pub fn from_seed(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    pub fn inner_mut(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_reproduces_the_same_sequence() {
        use rand::Rng;
        let mut a = Prng::from_seed(7);
        let mut b = Prng::from_seed(7);
        let xs: Vec<u32> = (0..8).map(|_| a.inner_mut().random()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.inner_mut().random()).collect();
        assert_eq!(xs, ys);
    }
}
