//! Pure operations on quantity vectors.

use super::types::ProblemData;
use crate::error::{KnapsackError, Result};

/// Slack allowed when comparing a summed weight against the capacity.
///
/// Constructions subtract `k * weight` from a running remainder while
/// [`weight_of`] re-sums from scratch; the two can disagree in the last
/// few ulps.
const CAPACITY_TOLERANCE: f64 = 1e-9;

/// Total weight: `sum(solution[i] * weights[i])`.
pub fn weight_of(solution: &[usize], problem: &ProblemData) -> f64 {
    solution
        .iter()
        .zip(problem.weights())
        .map(|(&q, &w)| q as f64 * w)
        .sum()
}

/// Total value: `sum(solution[i] * values[i])`.
pub fn value_of(solution: &[usize], problem: &ProblemData) -> f64 {
    solution
        .iter()
        .zip(problem.values())
        .map(|(&q, &v)| q as f64 * v)
        .sum()
}

/// Whether `weight` fits into the knapsack.
pub fn fits(weight: f64, problem: &ProblemData) -> bool {
    weight <= problem.capacity() + CAPACITY_TOLERANCE * problem.capacity().max(1.0)
}

/// A solution is valid when it has one entry per item, every quantity
/// is within `[0, max_qty[i]]` and the total weight fits.
pub fn is_valid(solution: &[usize], problem: &ProblemData) -> bool {
    solution.len() == problem.n_items()
        && solution
            .iter()
            .zip(problem.max_qty())
            .all(|(&q, &max)| q <= max)
        && fits(weight_of(solution, problem), problem)
}

/// Largest quantity of `item` that fits into `remaining` capacity,
/// capped by the item's availability.
pub fn max_feasible_quantity(problem: &ProblemData, item: usize, remaining: f64) -> usize {
    let by_weight = (remaining / problem.weights()[item]).floor();
    if by_weight <= 0.0 {
        return 0;
    }
    let cap = problem.max_qty()[item];
    if by_weight >= cap as f64 {
        cap
    } else {
        by_weight as usize
    }
}

pub(crate) fn check_length(solution: &[usize], problem: &ProblemData) -> Result<()> {
    if solution.len() != problem.n_items() {
        return Err(KnapsackError::SolutionLength {
            expected: problem.n_items(),
            actual: solution.len(),
        });
    }
    Ok(())
}

/// Length check plus `solution[i] <= max_qty[i]` for every item.
pub(crate) fn check_bounds(solution: &[usize], problem: &ProblemData) -> Result<()> {
    check_length(solution, problem)?;
    match solution
        .iter()
        .zip(problem.max_qty())
        .enumerate()
        .find(|&(_, (&q, &max))| q > max)
    {
        Some((item, (&quantity, &max))) => Err(KnapsackError::QuantityOutOfRange {
            item,
            quantity,
            max,
        }),
        None => Ok(()),
    }
}
