//! Statistic descriptors and the plan that groups them (C1).
//!
//! A [`Statistic`] names a scalar function of the joint, labelled data
//! plus the preprocessing (tie rule, offsets) it needs applied first.
//! [`plan::group`] groups a set of statistics into the two-level trie the
//! permutation kernel walks once per resample.

mod plan;

pub use plan::{group, Plan};

use crate::kernel::stats;

/// Selects which opaque scalar kernel a [`Statistic`] evaluates, plus that
/// kernel's extra arguments (`fn_args` in the data model).
///
/// These are the "individual statistic kernels" spec.md keeps out of
/// scope, treated as pure functions of `(sorted_buffer, m, n, args…)`.
/// Modelled as an enum rather than a boxed closure so a `Statistic` stays
/// `Clone` and trivially comparable in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    /// Difference between the (possibly truncated) means of A and B.
    TruncatedMeanDiff { truncate_tails: f64 },
    /// Difference between the `q`th quantile of A and of B.
    QuantileDiff { q: f64 },
    /// Probability that a value drawn uniformly from A is `<=` one from B.
    LteProb,
    /// Probability that a value drawn uniformly from A is `>` one from B.
    GtProb,
}

impl Kernel {
    /// Evaluates the kernel against an offset-sorted, class-encoded buffer.
    pub fn evaluate(&self, sorted: &[u64], m: usize, n: usize) -> f64 {
        match *self {
            Kernel::TruncatedMeanDiff { truncate_tails } => {
                stats::truncated_mean_diff(sorted, m, n, truncate_tails)
            }
            Kernel::QuantileDiff { q } => stats::quantile_diff(sorted, m, n, q),
            Kernel::LteProb => stats::lte_prob(sorted, m, n),
            Kernel::GtProb => stats::gt_prob(sorted, m, n),
        }
    }
}

/// An immutable statistic descriptor.
///
/// `probability_a_lower` is the null-hypothesis tie-breaking probability
/// the shuffle primitive uses to decide how equal values are labelled
/// (0.5 is symmetric); `a_offset`/`b_offset` are added to the respective
/// class's values before the offset-sort step.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistic {
    pub name: String,
    pub probability_a_lower: f64,
    pub a_offset: i64,
    pub b_offset: i64,
    pub kernel: Kernel,
}

impl Statistic {
    /// Probability that a value chosen uniformly at random from A is `<=`
    /// a value chosen uniformly at random from B.
    pub fn lte_prob(
        name: impl Into<String>,
        p_a_lower: f64,
        a_offset: i64,
        b_offset: i64,
    ) -> Self {
        Self {
            name: name.into(),
            probability_a_lower: p_a_lower,
            a_offset,
            b_offset,
            kernel: Kernel::LteProb,
        }
    }

    /// Probability that a value chosen uniformly at random from A is `>`
    /// a value chosen uniformly at random from B.
    pub fn gt_prob(name: impl Into<String>, p_a_lower: f64, a_offset: i64, b_offset: i64) -> Self {
        Self {
            name: name.into(),
            probability_a_lower: p_a_lower,
            a_offset,
            b_offset,
            kernel: Kernel::GtProb,
        }
    }

    /// Difference between the (possibly truncated) arithmetic means of A
    /// and B. `truncate_tails` removes that fraction (rounded up) of
    /// observations from both tails of each class before averaging; 0.0
    /// truncates nothing.
    pub fn mean(
        name: impl Into<String>,
        truncate_tails: f64,
        p_a_lower: f64,
        a_offset: i64,
        b_offset: i64,
    ) -> Self {
        Self {
            name: name.into(),
            probability_a_lower: p_a_lower,
            a_offset,
            b_offset,
            kernel: Kernel::TruncatedMeanDiff { truncate_tails },
        }
    }

    /// Difference between the `q`th quantile (`0 <= q <= 1`) of A and B.
    pub fn quantile(
        name: impl Into<String>,
        q: f64,
        p_a_lower: f64,
        a_offset: i64,
        b_offset: i64,
    ) -> Self {
        Self {
            name: name.into(),
            probability_a_lower: p_a_lower,
            a_offset,
            b_offset,
            kernel: Kernel::QuantileDiff { q },
        }
    }

    /// Difference between the medians of A and B. `quantile(.., 0.5, ..)`.
    pub fn median(name: impl Into<String>, p_a_lower: f64, a_offset: i64, b_offset: i64) -> Self {
        Self::quantile(name, 0.5, p_a_lower, a_offset, b_offset)
    }

    /// Difference between the 99th percentiles of A and B.
    /// `quantile(.., 0.99, ..)`.
    pub fn q99(name: impl Into<String>, p_a_lower: f64, a_offset: i64, b_offset: i64) -> Self {
        Self::quantile(name, 0.99, p_a_lower, a_offset, b_offset)
    }
}
