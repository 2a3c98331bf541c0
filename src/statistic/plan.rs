//! Groups statistics into the two-level trie the permutation kernel walks:
//! `probability_a_lower -> (a_offset, b_offset) -> list<Statistic>`.
//!
//! Modelled as an ordered `Vec` of groups rather than a `HashMap`, because
//! `f64` keys have no `Hash`/`Eq` impl and because spec.md requires the
//! grouping to be deterministic given an ordered input — a `Vec` built by
//! linear first-seen lookup gives that for free, and the number of
//! distinct `(p_a_lower, offsets)` combinations is small in practice.

use super::Statistic;

/// Statistics sharing one `(a_offset, b_offset)` pair (and therefore one
/// `sorted` buffer, for a given `probability_a_lower`).
#[derive(Debug, Default)]
pub struct OffsetBucket {
    pub a_offset: i64,
    pub b_offset: i64,
    pub statistics: Vec<Statistic>,
}

/// Statistics sharing one `probability_a_lower` (and therefore one
/// `shuffled` buffer).
#[derive(Debug, Default)]
pub struct ShuffleGroup {
    pub probability_a_lower: f64,
    pub buckets: Vec<OffsetBucket>,
}

/// The grouped plan: every input statistic appears in exactly one bucket
/// of exactly one group.
#[derive(Debug, Default)]
pub struct Plan {
    pub groups: Vec<ShuffleGroup>,
}

impl Plan {
    /// Total number of statistics across every group and bucket.
    pub fn len(&self) -> usize {
        self.groups
            .iter()
            .map(|g| g.buckets.iter().map(|b| b.statistics.len()).sum::<usize>())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Groups `statistics` into a [`Plan`], preserving first-seen order of
/// both `probability_a_lower` values and `(a_offset, b_offset)` pairs
/// within each. Gracefully handles an empty input.
pub fn group(statistics: impl IntoIterator<Item = Statistic>) -> Plan {
    let mut plan = Plan::default();
    for stat in statistics {
        let group = match plan
            .groups
            .iter_mut()
            .find(|g| g.probability_a_lower == stat.probability_a_lower)
        {
            Some(g) => g,
            None => {
                plan.groups.push(ShuffleGroup {
                    probability_a_lower: stat.probability_a_lower,
                    buckets: Vec::new(),
                });
                plan.groups.last_mut().unwrap()
            }
        };
        let bucket = match group
            .buckets
            .iter_mut()
            .find(|b| b.a_offset == stat.a_offset && b.b_offset == stat.b_offset)
        {
            Some(b) => b,
            None => {
                group.buckets.push(OffsetBucket {
                    a_offset: stat.a_offset,
                    b_offset: stat.b_offset,
                    statistics: Vec::new(),
                });
                group.buckets.last_mut().unwrap()
            }
        };
        bucket.statistics.push(stat);
    }
    plan
}
