//! Problem model and solution operations.
//!
//! [`ProblemData`] describes a bounded knapsack instance. The functions in
//! [`ops`] evaluate quantity vectors against it and are shared by both
//! engines.

pub mod ops;
mod types;

pub use ops::{is_valid, max_feasible_quantity, value_of, weight_of};
pub use types::{ProblemData, Solution};
