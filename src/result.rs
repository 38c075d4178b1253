//! Run outcome shared by both engines.

use std::fmt;

use crate::problem::{weight_of, ProblemData, Solution};

/// Result of one solver run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    /// Best feasible quantity vector found.
    pub best_solution: Solution,

    /// Value of `best_solution`.
    pub best_value: f64,

    /// First iteration at which `best_value` was reached.
    pub convergence_iteration: usize,

    /// Iterations actually executed.
    pub iterations: usize,

    /// Wall-clock time of the run in seconds.
    pub elapsed_seconds: f64,

    /// Best value so far after each iteration. Non-decreasing, one entry
    /// per executed iteration.
    pub fitness_history: Vec<f64>,
}

impl RunResult {
    /// Builds a printable summary of this result against its instance.
    pub fn report<'a>(&'a self, problem: &'a ProblemData) -> Report<'a> {
        Report {
            result: self,
            problem,
        }
    }
}

/// Human-readable summary of a [`RunResult`].
///
/// ```
/// use knapsack_meta::problem::ProblemData;
/// use knapsack_meta::RunResult;
///
/// let problem = ProblemData::new(vec![2.0, 3.0], vec![3.0, 4.0], vec![2, 1], 5.0).unwrap();
/// let result = RunResult {
///     best_solution: vec![1, 1],
///     best_value: 7.0,
///     convergence_iteration: 3,
///     iterations: 10,
///     elapsed_seconds: 0.001,
///     fitness_history: vec![7.0; 10],
/// };
/// let text = result.report(&problem).to_string();
/// assert!(text.contains("Best value: 7"));
/// assert!(text.contains("Item 2: 1 units"));
/// ```
pub struct Report<'a> {
    result: &'a RunResult,
    problem: &'a ProblemData,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        writeln!(f, "Elapsed: {:.4} s", r.elapsed_seconds)?;
        writeln!(f, "Iterations: {}", r.iterations)?;
        writeln!(f, "Convergence iteration: {}", r.convergence_iteration)?;
        writeln!(f, "Best value: {}", r.best_value)?;
        writeln!(
            f,
            "Total weight: {}",
            weight_of(&r.best_solution, self.problem)
        )?;
        writeln!(f, "Selected items:")?;
        let weights = self.problem.weights();
        let values = self.problem.values();
        for (i, &q) in r.best_solution.iter().enumerate().filter(|&(_, &q)| q > 0) {
            writeln!(
                f,
                "  Item {}: {} units, value {}, weight {}",
                i + 1,
                q,
                q as f64 * values[i],
                q as f64 * weights[i]
            )?;
        }
        Ok(())
    }
}
