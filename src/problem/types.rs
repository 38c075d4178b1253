//! Bounded knapsack instance data.

use crate::error::{KnapsackError, Result};

/// A quantity vector: `solution[i]` units of item `i`.
pub type Solution = Vec<usize>;

/// A bounded (multi-quantity) knapsack instance.
///
/// Item `i` has unit weight `weights[i]`, unit value `values[i]` and at
/// most `max_qty[i]` units available. The instance is immutable once
/// built; engines share it read-only.
///
/// # Examples
///
/// ```
/// use knapsack_meta::problem::ProblemData;
///
/// let problem = ProblemData::new(
///     vec![2.0, 3.0, 4.0],
///     vec![3.0, 4.0, 5.0],
///     vec![2, 1, 1],
///     5.0,
/// ).unwrap();
/// assert_eq!(problem.n_items(), 3);
///
/// // Zero weights are rejected up front.
/// assert!(ProblemData::new(vec![0.0], vec![1.0], vec![1], 5.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProblemData {
    weights: Vec<f64>,
    values: Vec<f64>,
    max_qty: Vec<usize>,
    capacity: f64,
    n_items: usize,
}

impl ProblemData {
    /// Builds and validates an instance.
    pub fn new(
        weights: Vec<f64>,
        values: Vec<f64>,
        max_qty: Vec<usize>,
        capacity: f64,
    ) -> Result<Self> {
        let n_items = weights.len();
        let problem = Self {
            weights,
            values,
            max_qty,
            capacity,
            n_items,
        };
        problem.validate()?;
        Ok(problem)
    }

    /// Checks every instance invariant.
    ///
    /// Engines call this again in `set_problem_data`, so data that
    /// bypassed [`ProblemData::new`] (e.g. deserialized) is still checked.
    pub fn validate(&self) -> Result<()> {
        let n = self.n_items;
        if self.weights.len() != n || self.values.len() != n || self.max_qty.len() != n {
            return Err(KnapsackError::invalid_problem(format!(
                "length mismatch: n_items={n}, weights={}, values={}, max_qty={}",
                self.weights.len(),
                self.values.len(),
                self.max_qty.len()
            )));
        }
        if let Some((i, w)) = self
            .weights
            .iter()
            .enumerate()
            .find(|(_, w)| !(w.is_finite() && **w > 0.0))
        {
            return Err(KnapsackError::invalid_problem(format!(
                "weights[{i}] must be positive and finite, got {w}"
            )));
        }
        if let Some((i, v)) = self.values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(KnapsackError::invalid_problem(format!(
                "values[{i}] must be finite, got {v}"
            )));
        }
        if !(self.capacity.is_finite() && self.capacity >= 0.0) {
            return Err(KnapsackError::invalid_problem(format!(
                "capacity must be non-negative and finite, got {}",
                self.capacity
            )));
        }
        Ok(())
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn max_qty(&self) -> &[usize] {
        &self.max_qty
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// The all-zero solution, feasible for every valid instance.
    pub fn empty_solution(&self) -> Solution {
        vec![0; self.n_items]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let p = ProblemData::new(vec![1.0, 2.0], vec![3.0, 4.0], vec![5, 6], 10.0).unwrap();
        assert_eq!(p.n_items(), 2);
        assert_eq!(p.max_qty(), &[5, 6]);
        assert_eq!(p.empty_solution(), vec![0, 0]);
    }

    #[test]
    fn test_length_mismatch() {
        let err = ProblemData::new(vec![1.0, 2.0], vec![3.0], vec![5, 6], 10.0).unwrap_err();
        assert!(matches!(err, KnapsackError::InvalidProblem { .. }));
    }

    #[test]
    fn test_zero_weight() {
        let err = ProblemData::new(vec![1.0, 0.0], vec![3.0, 4.0], vec![1, 1], 10.0).unwrap_err();
        assert!(err.to_string().contains("weights[1]"));
    }

    #[test]
    fn test_negative_weight() {
        assert!(ProblemData::new(vec![-1.0], vec![3.0], vec![1], 10.0).is_err());
    }

    #[test]
    fn test_nan_value() {
        assert!(ProblemData::new(vec![1.0], vec![f64::NAN], vec![1], 10.0).is_err());
    }

    #[test]
    fn test_negative_capacity() {
        assert!(ProblemData::new(vec![1.0], vec![1.0], vec![1], -1.0).is_err());
    }

    #[test]
    fn test_zero_capacity_ok() {
        assert!(ProblemData::new(vec![1.0], vec![1.0], vec![1], 0.0).is_ok());
    }

    #[test]
    fn test_empty_instance_ok() {
        let p = ProblemData::new(vec![], vec![], vec![], 3.0).unwrap();
        assert_eq!(p.n_items(), 0);
    }
}
