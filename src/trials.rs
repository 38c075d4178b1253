//! Repeated independent trials and their summary statistics.

use tracing::{debug, info};

use crate::error::Result;
use crate::result::RunResult;
use crate::solver::KnapsackSolver;

/// Descriptive statistics over a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample variance (n - 1 denominator). Zero below two samples.
    pub variance: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
}

impl Stats {
    /// Summarizes `samples`. An empty slice yields all zeros.
    pub fn from_samples(samples: &[f64]) -> Self {
        let count = samples.len();
        if count == 0 {
            return Self {
                count,
                mean: 0.0,
                min: 0.0,
                max: 0.0,
                variance: 0.0,
                std_dev: 0.0,
            };
        }
        let mean = samples.iter().sum::<f64>() / count as f64;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let variance = if count < 2 {
            0.0
        } else {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (count - 1) as f64
        };
        Self {
            count,
            mean,
            min,
            max,
            variance,
            std_dev: variance.sqrt(),
        }
    }
}

/// Outcome of [`run_trials`].
#[derive(Debug, Clone)]
pub struct TrialSummary {
    /// Every individual run, in execution order.
    pub results: Vec<RunResult>,
    /// Statistics of `best_value`.
    pub value: Stats,
    /// Statistics of `elapsed_seconds`.
    pub elapsed: Stats,
    /// Statistics of `convergence_iteration`.
    pub convergence: Stats,
}

impl TrialSummary {
    /// The result with the highest best value (first one on ties).
    pub fn best(&self) -> Option<&RunResult> {
        self.results
            .iter()
            .reduce(|a, b| if b.best_value > a.best_value { b } else { a })
    }
}

/// Runs `solver` `n` times and summarizes the results.
///
/// The solver must already have a problem installed. Each run is an
/// independent trial.
///
/// ```
/// use knapsack_meta::problem::ProblemData;
/// use knapsack_meta::sa::{SaConfig, SimulatedAnnealing};
/// use knapsack_meta::trials::run_trials;
///
/// let problem = ProblemData::new(vec![1.0, 2.0], vec![1.0, 3.0], vec![4, 2], 5.0).unwrap();
/// let mut sa = SimulatedAnnealing::new(SaConfig::default().with_seed(1)).unwrap();
/// sa.set_problem_data(problem).unwrap();
///
/// let summary = run_trials(&mut sa, 5).unwrap();
/// assert_eq!(summary.value.count, 5);
/// assert!(summary.value.max <= 7.0);
/// ```
pub fn run_trials<S: KnapsackSolver + ?Sized>(solver: &mut S, n: usize) -> Result<TrialSummary> {
    let mut results = Vec::with_capacity(n);
    for i in 0..n {
        if i % 5 == 0 {
            debug!(solver = solver.name(), progress = i, total = n, "running trials");
        }
        results.push(solver.run()?);
    }

    let values: Vec<f64> = results.iter().map(|r| r.best_value).collect();
    let times: Vec<f64> = results.iter().map(|r| r.elapsed_seconds).collect();
    let iters: Vec<f64> = results
        .iter()
        .map(|r| r.convergence_iteration as f64)
        .collect();

    let summary = TrialSummary {
        value: Stats::from_samples(&values),
        elapsed: Stats::from_samples(&times),
        convergence: Stats::from_samples(&iters),
        results,
    };
    info!(
        solver = solver.name(),
        trials = n,
        mean_value = summary.value.mean,
        max_value = summary.value.max,
        mean_convergence = summary.convergence.mean,
        "trials finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aco::{AcoConfig, AntColony};
    use crate::error::KnapsackError;
    use crate::problem::ProblemData;
    use crate::sa::{SaConfig, SimulatedAnnealing};
    use std::sync::Arc;

    fn scenario() -> Arc<ProblemData> {
        Arc::new(
            ProblemData::new(vec![2.0, 3.0, 4.0], vec![3.0, 4.0, 5.0], vec![2, 1, 1], 5.0)
                .unwrap(),
        )
    }

    #[test]
    fn test_stats_basic() {
        let s = Stats::from_samples(&[1.0, 2.0, 3.0]);
        assert_eq!(s.count, 3);
        assert!((s.mean - 2.0).abs() < 1e-12);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 3.0);
        assert!((s.variance - 1.0).abs() < 1e-12);
        assert!((s.std_dev - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_stats_degenerate() {
        let s = Stats::from_samples(&[4.0]);
        assert_eq!(s.variance, 0.0);
        assert_eq!(s.mean, 4.0);
        assert_eq!(Stats::from_samples(&[]).count, 0);
    }

    #[test]
    fn test_trials_on_both_engines() {
        let problem = scenario();
        let mut sa = SimulatedAnnealing::new(SaConfig::default().with_seed(2)).unwrap();
        let mut aco = AntColony::new(
            AcoConfig::default()
                .with_ant_count(10)
                .with_max_iterations(30)
                .with_seed(2),
        )
        .unwrap();

        let solvers: [&mut dyn KnapsackSolver; 2] = [&mut sa, &mut aco];
        for solver in solvers {
            solver.set_problem_data(Arc::clone(&problem)).unwrap();
            let summary = run_trials(solver, 6).unwrap();
            assert_eq!(summary.results.len(), 6);
            assert!(summary.value.max <= 7.0 + 1e-9);
            assert!(summary.value.min <= summary.value.mean);
            assert_eq!(
                summary.best().map(|r| r.best_value),
                Some(summary.value.max)
            );
        }
    }

    #[test]
    fn test_trials_propagate_errors() {
        let mut sa = SimulatedAnnealing::new(SaConfig::default()).unwrap();
        let err = run_trials(&mut sa, 3).unwrap_err();
        assert_eq!(err, KnapsackError::ProblemNotSet);
    }
}
