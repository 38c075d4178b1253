//! Metaheuristic solvers for the bounded knapsack problem.
//!
//! Given N item types, each with a unit weight, unit value and maximum
//! available quantity, and a knapsack capacity, find an integer quantity
//! vector maximizing total value without exceeding the capacity.
//!
//! Two independent engines are provided:
//!
//! - **Simulated Annealing (SA)**: single-trajectory local search with
//!   Metropolis acceptance, geometric cooling and reheating on stagnation.
//! - **Ant Colony Optimization (ACO)**: constructive search over a
//!   per-item, per-quantity pheromone matrix with rank-weighted deposit
//!   and an exploration/exploitation schedule.
//!
//! Both consume a validated [`ProblemData`](problem::ProblemData) and
//! produce a [`RunResult`]. Repeated runs on one engine are independent
//! trials; [`trials::run_trials`] summarizes a batch of them.
//!
//! # Example
//!
//! ```
//! use knapsack_meta::aco::{AcoConfig, AntColony};
//! use knapsack_meta::problem::{is_valid, ProblemData};
//! use knapsack_meta::sa::{SaConfig, SimulatedAnnealing};
//! use std::sync::Arc;
//!
//! let problem = Arc::new(ProblemData::new(
//!     vec![2.0, 3.0, 4.0],
//!     vec![3.0, 4.0, 5.0],
//!     vec![2, 1, 1],
//!     5.0,
//! ).unwrap());
//!
//! let mut sa = SimulatedAnnealing::new(SaConfig::default().with_seed(1)).unwrap();
//! sa.set_problem_data(Arc::clone(&problem)).unwrap();
//! let sa_result = sa.run().unwrap();
//!
//! let mut aco = AntColony::new(AcoConfig::default().with_max_iterations(50).with_seed(1)).unwrap();
//! aco.set_problem_data(Arc::clone(&problem)).unwrap();
//! let aco_result = aco.run().unwrap();
//!
//! assert!(is_valid(&sa_result.best_solution, &problem));
//! assert!(is_valid(&aco_result.best_solution, &problem));
//! ```

pub mod aco;
pub mod error;
pub mod problem;
pub mod result;
pub mod sa;
pub mod solver;
pub mod trials;

pub use error::{KnapsackError, Result};
pub use result::{Report, RunResult};
pub use solver::KnapsackSolver;
