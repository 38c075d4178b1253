//! Ant Colony Optimization (ACO).
//!
//! Population-based constructive search. The pheromone matrix holds one
//! row per item and one entry per quantity level; ants sample a level for
//! each item, and the best of each batch reinforce their choices with a
//! rank-weighted deposit. Rows are clamped to a fixed ratio of their
//! maximum (a MAX-MIN style bound) after every update.
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Bullnheimer, Hartl & Strauss (1999), "A New Rank Based Version of
//!   the Ant System"
//! - Stützle & Hoos (2000), "MAX-MIN Ant System"

mod config;
mod pheromone;
mod runner;

pub use config::AcoConfig;
pub use pheromone::{HeuristicMatrix, PheromoneMatrix, ROW_FLOOR_RATIO};
pub use runner::AntColony;
