//! The statistic kernels spec.md keeps "out of scope", as opaque pure
//! functions `(sorted_buffer, m, n, args…) -> scalar`. Reimplemented here
//! in plain Rust (see [`crate::kernel`] module doc) rather than bound
//! through FFI.
//!
//! Every kernel takes the same offset-sorted, class-encoded buffer
//! [`super::sort::offset_sort`] produces: ascending by value, A (class 0)
//! before B (class 1) on ties. Splitting that buffer by class bit yields
//! each class's own values still in ascending order, which is what lets
//! the quantile and probability kernels below run in linear time instead
//! of re-sorting.

use super::sort::decode;

fn split_by_class(sorted: &[u64], m: usize, n: usize) -> (Vec<u64>, Vec<u64>) {
    let mut a = Vec::with_capacity(m);
    let mut b = Vec::with_capacity(n);
    for &entry in sorted {
        let (value, class) = decode(entry);
        if class == 0 {
            a.push(value);
        } else {
            b.push(value);
        }
    }
    (a, b)
}

/// Truncated arithmetic mean: drops `ceil(truncate_tails * len)`
/// observations from each tail of the (already ascending) slice before
/// averaging. `truncate_tails == 0.0` truncates nothing.
fn truncated_mean(values: &[u64], truncate_tails: f64) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    let drop = (truncate_tails * len as f64).ceil() as usize;
    let kept = if drop * 2 >= len {
        values
    } else {
        &values[drop..len - drop]
    };
    kept.iter().map(|&v| v as f64).sum::<f64>() / kept.len() as f64
}

/// Difference between the (possibly truncated) means of A and B.
pub fn truncated_mean_diff(sorted: &[u64], m: usize, n: usize, truncate_tails: f64) -> f64 {
    let (a, b) = split_by_class(sorted, m, n);
    truncated_mean(&a, truncate_tails) - truncated_mean(&b, truncate_tails)
}

/// The `q`th quantile (`0 <= q <= 1`) of an ascending slice, by linear
/// interpolation between the two nearest order statistics.
fn quantile(values: &[u64], q: f64) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    if len == 1 {
        return values[0] as f64;
    }
    let index = q * (len - 1) as f64;
    let lo = index.floor() as usize;
    let hi = index.ceil() as usize;
    let frac = index - lo as f64;
    values[lo] as f64 * (1.0 - frac) + values[hi] as f64 * frac
}

/// Difference between the `q`th quantile of A and B.
pub fn quantile_diff(sorted: &[u64], m: usize, n: usize, q: f64) -> f64 {
    let (a, b) = split_by_class(sorted, m, n);
    quantile(&a, q) - quantile(&b, q)
}

/// Probability that a value drawn uniformly at random from A is `<=` a
/// value drawn uniformly at random from B.
pub fn lte_prob(sorted: &[u64], m: usize, n: usize) -> f64 {
    if m == 0 || n == 0 {
        return 0.0;
    }
    let (a, b) = split_by_class(sorted, m, n);
    let mut j = 0usize;
    let mut count = 0u64;
    for &x in &a {
        while j < b.len() && b[j] < x {
            j += 1;
        }
        count += (b.len() - j) as u64;
    }
    count as f64 / (m * n) as f64
}

/// Probability that a value drawn uniformly at random from A is `>` a
/// value drawn uniformly at random from B.
pub fn gt_prob(sorted: &[u64], m: usize, n: usize) -> f64 {
    if m == 0 || n == 0 {
        return 0.0;
    }
    let (a, b) = split_by_class(sorted, m, n);
    let mut j = 0usize;
    let mut count = 0u64;
    for &x in &a {
        while j < b.len() && b[j] < x {
            j += 1;
        }
        count += j as u64;
    }
    count as f64 / (m * n) as f64
}

#[cfg(test)]
mod tests {
    use super::super::sort::offset_sort;
    use super::*;

    fn sorted_of(a: &[u64], b: &[u64]) -> (Vec<u64>, usize, usize) {
        let mut buf: Vec<u64> = a.iter().chain(b.iter()).copied().collect();
        let (m, n) = (a.len(), b.len());
        offset_sort(&mut buf, m, n, 0, 0);
        (buf, m, n)
    }

    #[test]
    fn mean_diff_of_identical_classes_is_zero() {
        let (buf, m, n) = sorted_of(&[1, 2, 3], &[1, 2, 3]);
        assert_eq!(truncated_mean_diff(&buf, m, n, 0.0), 0.0);
    }

    #[test]
    fn mean_diff_reflects_a_shift() {
        let (buf, m, n) = sorted_of(&[1, 2, 3], &[11, 12, 13]);
        assert_eq!(truncated_mean_diff(&buf, m, n, 0.0), -10.0);
    }

    #[test]
    fn median_of_odd_length_is_exact() {
        let (buf, m, n) = sorted_of(&[1, 2, 3], &[10, 20, 30]);
        assert_eq!(quantile_diff(&buf, m, n, 0.5), 2.0 - 20.0);
    }

    #[test]
    fn lte_and_gt_prob_are_complementary_with_no_ties() {
        let (buf, m, n) = sorted_of(&[1, 2], &[3, 4]);
        let lte = lte_prob(&buf, m, n);
        let gt = gt_prob(&buf, m, n);
        assert!((lte + gt - 1.0).abs() < 1e-9);
        assert_eq!(lte, 1.0);
        assert_eq!(gt, 0.0);
    }

    #[test]
    fn lte_prob_counts_ties_as_lte() {
        let (buf, m, n) = sorted_of(&[5], &[5]);
        assert_eq!(lte_prob(&buf, m, n), 1.0);
        assert_eq!(gt_prob(&buf, m, n), 0.0);
    }

    #[test]
    fn truncated_mean_drops_the_tails() {
        let values = vec![1u64, 2, 3, 4, 100];
        // drop ceil(0.2 * 5) = 1 from each tail -> [2, 3, 4] -> mean 3
        assert_eq!(super::truncated_mean(&values, 0.2), 3.0);
    }
}
