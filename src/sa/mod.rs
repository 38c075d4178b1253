//! Simulated Annealing (SA).
//!
//! A single-trajectory local search over quantity vectors. Worsening
//! moves are accepted with a probability that shrinks as the temperature
//! cools geometrically; prolonged stagnation triggers a reheat instead of
//! a restart.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod config;
mod runner;

pub use config::SaConfig;
pub use runner::SimulatedAnnealing;
