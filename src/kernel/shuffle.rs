//! The shuffle primitive: permutes class labels across the combined
//! buffer under the null hypothesis of exchangeability.
//!
//! Implemented as a Fisher-Yates shuffle of the full `m + n` buffer:
//! treating position `< m` as the new class A and the rest as class B is
//! then distributionally identical to picking a uniformly random subset
//! of size `m` to relabel A, which is the standard permutation-test
//! resample. `probability_a_lower` only has one place left to act once
//! the shuffle is otherwise uniform: the single boundary position (`m-1`
//! vs `m`) that decides which of two exactly-tied values lands on the A
//! side. When that boundary is tied, the shuffle re-decides it with a
//! `Bernoulli(probability_a_lower)` draw instead of leaving it to the
//! permutation's incidental placement, so statistics sensitive to
//! which side of a tie an observation falls on (`lte_prob`, `gt_prob`)
//! see a consistently biased null rather than an arbitrary one.

use super::prng::Prng;
use rand::Rng;

/// Shuffles `buf` (length `m + n`) in place. Returns an error message
/// (propagated as fatal per spec.md §4.2) if `buf`'s length doesn't match
/// `m + n`, or the combined sample is empty.
pub fn shuffle(rng: &mut Prng, buf: &mut [u64], m: usize, n: usize, p_a_lower: f64) -> Result<(), String> {
    let total = m + n;
    if buf.len() != total {
        return Err(format!(
            "shuffle: buffer length {} does not match m + n = {}",
            buf.len(),
            total
        ));
    }
    if total == 0 {
        return Err("shuffle: cannot permute an empty sample".to_string());
    }

    let r = rng.inner_mut();
    // Fisher-Yates over the whole combined buffer.
    for i in (1..total).rev() {
        let j = r.random_range(0..=i);
        buf.swap(i, j);
    }

    if m > 0 && n > 0 && buf[m - 1] == buf[m] && r.random::<f64>() >= p_a_lower {
        buf.swap(m - 1, m);
    }

    Ok(())
}
