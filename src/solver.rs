//! Common interface of the knapsack engines.

use std::sync::Arc;

use crate::error::Result;
use crate::problem::ProblemData;
use crate::result::RunResult;

/// A stateful knapsack engine.
///
/// Lifecycle: construct with a validated config, hand it a problem with
/// [`set_problem_data`](KnapsackSolver::set_problem_data), then call
/// [`run`](KnapsackSolver::run) as often as needed. Every call is an
/// independent trial.
pub trait KnapsackSolver {
    /// Short algorithm name for logs and reports.
    fn name(&self) -> &'static str;

    /// Validates and installs the instance to solve.
    fn set_problem_data(&mut self, problem: Arc<ProblemData>) -> Result<()>;

    /// Performs one independent trial.
    fn run(&mut self) -> Result<RunResult>;
}
