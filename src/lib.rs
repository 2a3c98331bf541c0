//! An adaptive Monte-Carlo permutation engine for exact two-sample
//! significance testing.
//!
//! Given two samples of non-negative integer observations and a set of
//! user-specified statistics, [`exact_test`] decides, per statistic,
//! whether the observed value is significantly low, significantly high,
//! or sits within the null distribution generated by permuting the
//! combined sample's class labels — at a caller-specified family-wise
//! false-positive rate.
//!
//! The engine is organised leaf-first:
//! - [`statistic`] (C1) describes a statistic and groups a family of them
//!   into a plan that shares preprocessing.
//! - [`permute`] (C2) walks that plan once per permutation.
//! - [`pool`] (C3) fans permutation generation out across a worker pool.
//! - [`accumulate`] (C4) folds results into per-statistic running counts
//!   and applies the sequential stopping rule.
//! - [`exact_test`] (C5) ties the above together into the public API.

pub mod accumulate;
pub mod kernel;
pub mod permute;
pub mod pool;
pub mod sample;
pub mod statistic;
pub mod transport;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::{ensure, Result};

pub use accumulate::{Accumulator, Judgement, TestResult};
pub use sample::{Observation, Sample};
pub use statistic::{Kernel, Plan, Statistic};

use accumulate::TestSchedule;
use kernel::offset_sort;
use permute::PermutationStream;
use pool::{ArgsFn, Generator, WorkerFn};
use statistic::group;

/// Runs the adaptive permutation test over `statistics`, returning one
/// [`TestResult`] per statistic that reaches a decision, in the order
/// `statistics` were given (spec.md §6: "a mapping... in insertion
/// order").
///
/// `eps` is the family-wise false-positive rate before the Bonferroni-style
/// correction described in §4.4 is applied; 10⁻⁴ is the default callers
/// should reach for absent a specific reason to change it.
///
/// `log_sink`, if given, receives one line per statistic decided, in
/// addition to this crate's ordinary `log` instrumentation.
pub fn exact_test(
    a: Vec<Observation>,
    b: Vec<Observation>,
    statistics: Vec<Statistic>,
    eps: f64,
    log_sink: Option<&dyn Fn(&str)>,
) -> Result<Vec<(String, TestResult)>> {
    if statistics.is_empty() {
        log::info!("exact_test: no statistics given, returning immediately");
        return Ok(Vec::new());
    }

    let mut seen_names = HashSet::with_capacity(statistics.len());
    for stat in &statistics {
        ensure!(
            seen_names.insert(stat.name.clone()),
            "duplicate statistic name: {}",
            stat.name
        );
    }
    ensure!(eps > 0.0 && eps < 1.0, "eps must lie in (0, 1), got {eps}");

    let sample = Arc::new(Sample::new(a, b)?);
    let m = sample.m();
    let n = sample.n();

    // §4.4 multiplicity correction: two-sided test over |statistics| at once.
    let num_stats = statistics.len() as f64;
    let eps = eps / (2.0 * num_stats * 1.1);
    let log_inner_eps = (eps / 10.0).ln();

    let actual_values = actual_statistic_values(&sample, &statistics, m, n);

    let mut accumulators: HashMap<String, Accumulator> = statistics
        .iter()
        .map(|s| (s.name.clone(), Accumulator::new()))
        .collect();
    let mut results: Vec<(String, TestResult)> = Vec::with_capacity(statistics.len());
    let mut undecided: Vec<Statistic> = statistics.clone();

    let shared_plan = Arc::new(Mutex::new(Arc::new(group(undecided.clone()))));

    let worker_fn: WorkerFn<Arc<Plan>, Result<HashMap<String, f64>, String>> = {
        let sample = sample.clone();
        Arc::new(move |plan: Arc<Plan>| {
            let stream: Box<dyn Iterator<Item = Result<HashMap<String, f64>, String>> + Send> =
                Box::new(PermutationStream::new(sample.clone(), plan));
            stream
        })
    };
    let args_fn: ArgsFn<Arc<Plan>> = {
        let shared_plan = shared_plan.clone();
        Arc::new(move || shared_plan.lock().expect("plan mutex poisoned").clone())
    };

    let mut generator = Generator::generate(worker_fn, args_fn);
    let mut schedule = TestSchedule::new();
    let mut observations: u64 = 0;

    while !undecided.is_empty() {
        let Some(permutation) = generator.next() else {
            log::warn!("exact_test: permutation stream ended with statistics still undecided");
            break;
        };
        let values = permutation.map_err(|message| anyhow::anyhow!(message))?;
        observations += 1;

        for stat in &undecided {
            if let Some(&value) = values.get(&stat.name) {
                let actual = actual_values[&stat.name];
                accumulators.get_mut(&stat.name).unwrap().update(value, actual);
            }
        }

        if !schedule.due(observations) {
            continue;
        }
        schedule.advance(observations);

        let mut decided_names = Vec::new();
        for stat in &undecided {
            let acc = accumulators[&stat.name];
            if let Some(judgement) = acc.judge(eps, log_inner_eps) {
                let result = TestResult {
                    actual_value: actual_values[&stat.name],
                    judgement,
                    m,
                    n,
                    num_trials: acc.trials,
                };
                log::debug!(
                    "exact_test: {} decided {:?} after {} trials",
                    stat.name,
                    judgement,
                    acc.trials
                );
                if let Some(sink) = log_sink {
                    sink(&format!(
                        "{} decided {:?} after {} trials",
                        stat.name, judgement, acc.trials
                    ));
                }
                results.push((stat.name.clone(), result));
                decided_names.push(stat.name.clone());
            }
        }

        if !decided_names.is_empty() {
            undecided.retain(|s| !decided_names.contains(&s.name));
            *shared_plan.lock().expect("plan mutex poisoned") = Arc::new(group(undecided.clone()));
        }
    }

    let order: HashMap<&str, usize> = statistics
        .iter()
        .enumerate()
        .map(|(i, s)| (s.name.as_str(), i))
        .collect();
    results.sort_by_key(|(name, _)| order[name.as_str()]);
    Ok(results)
}

fn actual_statistic_values(
    sample: &Sample,
    statistics: &[Statistic],
    m: usize,
    n: usize,
) -> HashMap<String, f64> {
    let combined = sample.combined();
    statistics
        .iter()
        .map(|stat| {
            let mut sorted = combined.clone();
            offset_sort(&mut sorted, m, n, stat.a_offset, stat.b_offset);
            (stat.name.clone(), stat.kernel.evaluate(&sorted, m, n))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_statistics_returns_empty_results_immediately() {
        let results = exact_test(vec![1, 2, 3], vec![4, 5, 6], Vec::new(), 1e-4, None).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn rejects_duplicate_statistic_names() {
        let statistics = vec![
            Statistic::mean("mu", 0.0, 0.5, 0, 0),
            Statistic::median("mu", 0.5, 0, 0),
        ];
        let err = exact_test(vec![1], vec![2], statistics, 1e-4, None).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_eps_outside_unit_interval() {
        let statistics = vec![Statistic::mean("mu", 0.0, 0.5, 0, 0)];
        let err = exact_test(vec![1], vec![2], statistics, 1.5, None).unwrap_err();
        assert!(err.to_string().contains("eps"));
    }

    #[test]
    fn identical_samples_judge_every_statistic_as_middle() {
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
    fn results_are_returned_in_the_original_statistics_order() {
        let a: Vec<u64> = (1..=20).collect();
        let b: Vec<u64> = (101..=120).collect();
        let statistics = vec![
            Statistic::median("med", 0.5, 0, 0),
            Statistic::mean("mu", 0.0, 0.5, 0, 0),
        ];
        let names: Vec<String> = statistics.iter().map(|s| s.name.clone()).collect();
        let results = exact_test(a, b, statistics, 1e-4, None).unwrap();
        let result_names: Vec<String> = results.iter().map(|(name, _)| name.clone()).collect();
        assert_eq!(result_names, names);
    }

    #[test]
    fn a_strict_shift_judges_low_for_the_shifted_sample() {
        let a: Vec<u64> = (1..=20).collect();
        let b: Vec<u64> = (101..=120).collect();
        let statistics = vec![Statistic::mean("mu", 0.0, 0.5, 0, 0)];
        let results = exact_test(a, b, statistics, 1e-4, None).unwrap();
        assert_eq!(results[0].1.judgement, Judgement::Low);
    }
}
