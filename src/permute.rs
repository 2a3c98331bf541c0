//! The permutation kernel (C2): for one permutation, produces a mapping
//! `{statistic name -> scalar value}`, reusing buffers across the plan's
//! trie the way spec.md §4.2 describes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::kernel::prng::Prng;
use crate::kernel::shuffle::shuffle;
use crate::kernel::sort::offset_sort;
use crate::sample::Sample;
use crate::statistic::Plan;

/// An infinite, lazy stream of per-permutation statistic mappings.
///
/// Created once per worker invocation (see [`crate::pool`]); its PRNG and
/// working buffers are reseeded/allocated on construction and released
/// when the stream is dropped — Rust's ownership model gives the
/// "released on every exit path, including abnormal termination" that
/// spec.md §4.2 asks for without any explicit teardown code.
pub struct PermutationStream {
    sample: Arc<Sample>,
    plan: Arc<Plan>,
    original: Vec<u64>,
    shuffled: Vec<u64>,
    sorted: Vec<u64>,
    rng: Prng,
}

impl PermutationStream {
    pub fn new(sample: Arc<Sample>, plan: Arc<Plan>) -> Self {
        let original = sample.combined();
        let len = original.len();
        Self {
            sample,
            plan,
            shuffled: vec![0; len],
            sorted: vec![0; len],
            original,
            rng: Prng::create(),
        }
    }
}

impl Iterator for PermutationStream {
    /// `Err` surfaces a shuffle failure, which spec.md §4.2 treats as
    /// fatal for the run; the stream yields it once and stops.
    type Item = Result<HashMap<String, f64>, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let m = self.sample.m();
        let n = self.sample.n();
        let mut results = HashMap::new();

        for group in &self.plan.groups {
            self.shuffled.copy_from_slice(&self.original);
            if let Err(message) = shuffle(
                &mut self.rng,
                &mut self.shuffled,
                m,
                n,
                group.probability_a_lower,
            ) {
                return Some(Err(message));
            }

            for bucket in &group.buckets {
                self.sorted.copy_from_slice(&self.shuffled);
                offset_sort(&mut self.sorted, m, n, bucket.a_offset, bucket.b_offset);
                for stat in &bucket.statistics {
                    results.insert(stat.name.clone(), stat.kernel.evaluate(&self.sorted, m, n));
                }
            }
        }

        Some(Ok(results))
    }
}
