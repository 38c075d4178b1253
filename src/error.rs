//! Error types for knapsack solvers.
//!
//! Every failure a caller can observe comes from bad input: either the
//! problem data or the solver configuration. Both are reported before
//! the first iteration runs.

use thiserror::Error;

/// Result type alias for solver operations.
pub type Result<T> = std::result::Result<T, KnapsackError>;

/// Errors raised by problem validation and the solver engines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KnapsackError {
    /// A `ProblemData` invariant does not hold.
    #[error("invalid problem: {reason}")]
    InvalidProblem {
        /// What was wrong with the data.
        reason: String,
    },

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {param} {reason}")]
    InvalidConfig {
        /// Parameter name.
        param: &'static str,
        /// Constraint that was violated.
        reason: String,
    },

    /// `run` was called before `set_problem_data`.
    #[error("no problem data set; call set_problem_data first")]
    ProblemNotSet,

    /// The repair loop could not restore feasibility within its step cap.
    ///
    /// Only reachable with inconsistent input, e.g. a solution that is
    /// overweight even after every quantity has been driven to zero.
    #[error("could not repair solution to a feasible state after {steps} steps")]
    InfeasibleConstruction {
        /// Repair steps performed before giving up.
        steps: usize,
    },

    /// A solution vector does not have one entry per item.
    #[error("solution has {actual} entries, problem has {expected} items")]
    SolutionLength {
        /// Number of items in the problem.
        expected: usize,
        /// Length of the offending solution.
        actual: usize,
    },

    /// A solution holds more units of an item than are available.
    #[error("quantity {quantity} of item {item} exceeds max_qty {max}")]
    QuantityOutOfRange {
        item: usize,
        quantity: usize,
        max: usize,
    },

    /// Ant solutions and their values were passed with different counts.
    #[error("{ants} ant solutions but {values} values")]
    ValueCount { ants: usize, values: usize },
}

impl KnapsackError {
    pub(crate) fn invalid_problem(reason: impl Into<String>) -> Self {
        KnapsackError::InvalidProblem {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(param: &'static str, reason: impl Into<String>) -> Self {
        KnapsackError::InvalidConfig {
            param,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = KnapsackError::invalid_problem("weights[2] must be positive, got 0");
        assert_eq!(
            err.to_string(),
            "invalid problem: weights[2] must be positive, got 0"
        );

        let err = KnapsackError::invalid_config("cooling_rate", "must be in (0, 1), got 1.5");
        assert!(err.to_string().contains("cooling_rate"));

        let err = KnapsackError::SolutionLength {
            expected: 3,
            actual: 2,
        };
        assert!(err.to_string().contains("3 items"));
    }
}
