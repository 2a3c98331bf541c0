//! Integration tests exercising the public `exact_test` entry point
//! against the literal scenarios and laws this engine is expected to
//! satisfy: identical samples decide to the middle, a strict shift
//! decides to a tail, swapping the samples negates a symmetric
//! statistic's judgement, and so on.

use exact_test::{exact_test, Judgement, Statistic};

#[test]
fn identical_samples_decide_to_the_middle() {
    let a: Vec<u64> = (1..=10).collect();
    let b = a.clone();
    let statistics = vec![
        Statistic::mean("mu", 0.0, 0.5, 0, 0),
        Statistic::median("med", 0.5, 0, 0),
    ];
    let results = exact_test(a, b, statistics, 1e-4, None).unwrap();
    assert_eq!(results.len(), 2);
    for (_, result) in &results {
        assert_eq!(result.judgement, Judgement::Middle);
    }
}

#[test]
fn a_strict_shift_decides_low_for_the_lower_sample() {
    let a: Vec<u64> = (1..=20).collect();
    let b: Vec<u64> = (101..=120).collect();
    let statistics = vec![Statistic::mean("mu", 0.0, 0.5, 0, 0)];
    let results = exact_test(a, b, statistics, 1e-4, None).unwrap();
    assert_eq!(results[0].1.judgement, Judgement::Low);
}

#[test]
fn reversing_the_shift_reverses_the_judgement() {
    let a: Vec<u64> = (101..=120).collect();
    let b: Vec<u64> = (1..=20).collect();
    let statistics = vec![Statistic::mean("mu", 0.0, 0.5, 0, 0)];
    let results = exact_test(a, b, statistics, 1e-4, None).unwrap();
    assert_eq!(results[0].1.judgement, Judgement::High);
}

#[test]
fn a_tail_only_shift_is_caught_by_a_quantile_statistic() {
    let mut a = vec![0u64; 90];
    a.extend(std::iter::repeat(1000u64).take(10));
    let mut b = vec![0u64; 99];
    b.push(1000);
    let statistics = vec![
        Statistic::q99("p99", 0.5, 0, 0),
        Statistic::mean("mu", 0.0, 0.5, 0, 0),
    ];
    let results = exact_test(a, b, statistics, 1e-4, None).unwrap();
    let by_name: std::collections::HashMap<_, _> = results.into_iter().collect();
    assert_eq!(by_name["p99"].judgement, Judgement::High);
    assert_eq!(by_name["mu"].judgement, Judgement::High);
    assert!(
        by_name["mu"].num_trials >= by_name["p99"].num_trials,
        "mean should need at least as many trials as the tail-only statistic to decide"
    );
}

#[test]
fn empty_statistics_spawns_no_workers_and_returns_no_results() {
    let results = exact_test(vec![1, 2, 3], vec![4, 5, 6], Vec::new(), 1e-4, None).unwrap();
    assert!(results.is_empty());
}

/// Scenario 6 from spec.md §8: a single observation per class gives the
/// engine essentially no information about the null distribution's
/// median difference. The deliberate, tested outcome for this crate's
/// CSM reimplementation is a confident judgement of `0`: with only one
/// possible non-trivial permutation (swap or don't), `lte_actual` and
/// `gte_actual` both converge to rates indistinguishable from 1 (every
/// resampled median equals one of the two actual values, so it is
/// always either `<=` or `>=` the actual), which resolves to "both
/// sides significant, neither in the tail" almost immediately. See
/// DESIGN.md for the longer discussion of this Open Question.
#[test]
fn a_single_observation_per_class_decides_to_the_middle() {
    let statistics = vec![Statistic::median("m", 0.5, 0, 0)];
    let results = exact_test(vec![5], vec![7], statistics, 1e-4, None).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.judgement, Judgement::Middle);
}

#[test]
fn duplicate_statistic_names_are_rejected() {
    let statistics = vec![
        Statistic::mean("mu", 0.0, 0.5, 0, 0),
        Statistic::median("mu", 0.5, 0, 0),
    ];
    let err = exact_test(vec![1, 2], vec![3, 4], statistics, 1e-4, None).unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn increasing_statistic_count_never_flips_a_decided_judgement_back_to_undecided() {
    // Bonferroni monotonicity (§8 law): a judgement that was significant
    // with one statistic must still be significant once more statistics
    // share the correction, for the same eps and the same underlying data.
    let a: Vec<u64> = (1..=20).collect();
    let b: Vec<u64> = (101..=120).collect();

    let solo = vec![Statistic::mean("mu", 0.0, 0.5, 0, 0)];
    let solo_result = exact_test(a.clone(), b.clone(), solo, 1e-4, None).unwrap();
    assert_eq!(solo_result[0].1.judgement, Judgement::Low);

    let crowded = vec![
        Statistic::mean("mu", 0.0, 0.5, 0, 0),
        Statistic::median("med", 0.5, 0, 0),
        Statistic::q99("p99", 0.5, 0, 0),
    ];
    let crowded_results = exact_test(a, b, crowded, 1e-4, None).unwrap();
    let by_name: std::collections::HashMap<_, _> = crowded_results.into_iter().collect();
    assert_eq!(by_name["mu"].judgement, Judgement::Low);
}
