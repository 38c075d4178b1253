//! ACO engine and execution loop.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use super::config::AcoConfig;
use super::pheromone::{HeuristicMatrix, PheromoneMatrix};
use crate::error::{KnapsackError, Result};
use crate::problem::ops::check_bounds;
use crate::problem::{is_valid, max_feasible_quantity, value_of, ProblemData, Solution};
use crate::result::RunResult;
use crate::solver::KnapsackSolver;

/// Matrices derived from the installed problem.
#[derive(Debug, Clone)]
struct Colony {
    problem: Arc<ProblemData>,
    pheromone: PheromoneMatrix,
    heuristic: HeuristicMatrix,
}

/// Ant Colony Optimization engine for the bounded knapsack.
///
/// Each ant builds a solution item by item, choosing a quantity level by
/// roulette selection over `pheromone^alpha * heuristic^beta`. After every
/// iteration the feasible ants reinforce the levels they chose, weighted
/// by rank.
///
/// Pheromone is snapshotted at the start of [`run`](AntColony::run) and
/// restored at the end, so repeated runs are independent trials.
///
/// # Examples
///
/// ```
/// use knapsack_meta::aco::{AcoConfig, AntColony};
/// use knapsack_meta::problem::ProblemData;
///
/// let problem = ProblemData::new(
///     vec![2.0, 3.0, 4.0],
///     vec![3.0, 4.0, 5.0],
///     vec![2, 1, 1],
///     5.0,
/// ).unwrap();
///
/// let config = AcoConfig::default()
///     .with_ant_count(10)
///     .with_max_iterations(20)
///     .with_seed(42);
/// let mut aco = AntColony::new(config).unwrap();
/// aco.set_problem_data(problem).unwrap();
/// let result = aco.run().unwrap();
/// assert_eq!(result.fitness_history.len(), 20);
/// ```
#[derive(Debug)]
pub struct AntColony {
    config: AcoConfig,
    colony: Option<Colony>,
    rng: StdRng,
}

impl AntColony {
    /// Creates an engine with a validated configuration.
    pub fn new(config: AcoConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Ok(Self {
            config,
            colony: None,
            rng,
        })
    }

    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    pub fn problem(&self) -> Option<&ProblemData> {
        self.colony.as_ref().map(|c| c.problem.as_ref())
    }

    /// Current pheromone state, if a problem is installed.
    pub fn pheromone(&self) -> Option<&PheromoneMatrix> {
        self.colony.as_ref().map(|c| &c.pheromone)
    }

    pub fn heuristic(&self) -> Option<&HeuristicMatrix> {
        self.colony.as_ref().map(|c| &c.heuristic)
    }

    /// Installs the instance to solve.
    ///
    /// Resets pheromone to the uniform initial level and precomputes the
    /// heuristic matrix.
    pub fn set_problem_data(&mut self, problem: impl Into<Arc<ProblemData>>) -> Result<()> {
        let problem = problem.into();
        problem.validate()?;
        let pheromone = PheromoneMatrix::uniform(&problem, self.config.initial_pheromone);
        let heuristic = HeuristicMatrix::new(&problem, self.config.zero_quantity_heuristic);
        self.colony = Some(Colony {
            problem,
            pheromone,
            heuristic,
        });
        Ok(())
    }

    fn require_colony(&self) -> Result<&Colony> {
        self.colony.as_ref().ok_or(KnapsackError::ProblemNotSet)
    }

    /// Builds one ant's solution for the given iteration.
    ///
    /// Items are visited in shuffled order; an item whose maximum feasible
    /// quantity is zero keeps quantity 0.
    pub fn generate_ant_solution<R: Rng>(&self, iteration: usize, rng: &mut R) -> Result<Solution> {
        Ok(construct(self.require_colony()?, &self.config, iteration, rng))
    }

    /// Evaporates, deposits rank-weighted pheromone from `ants`, then
    /// clamps each row.
    ///
    /// The ant ranked `r` (1-based, by descending value) with value `v > 0`
    /// adds `q / (v * r)` to the level it chose for every item. Ants with
    /// `v <= 0` deposit nothing.
    pub fn update_pheromones(&mut self, ants: &[Solution], values: &[f64]) -> Result<()> {
        let colony = self.colony.as_mut().ok_or(KnapsackError::ProblemNotSet)?;
        if ants.len() != values.len() {
            return Err(KnapsackError::ValueCount {
                ants: ants.len(),
                values: values.len(),
            });
        }
        for ant in ants {
            check_bounds(ant, &colony.problem)?;
        }
        deposit(&mut colony.pheromone, &self.config, ants, values);
        Ok(())
    }

    /// Runs one trial using the engine's own random source.
    pub fn run(&mut self) -> Result<RunResult> {
        let colony = self.colony.as_mut().ok_or(KnapsackError::ProblemNotSet)?;
        search(colony, &self.config, &mut self.rng)
    }

    /// Runs one trial with an explicitly supplied random source.
    pub fn run_with_rng<R: Rng>(&mut self, rng: &mut R) -> Result<RunResult> {
        let colony = self.colony.as_mut().ok_or(KnapsackError::ProblemNotSet)?;
        search(colony, &self.config, rng)
    }
}

impl KnapsackSolver for AntColony {
    fn name(&self) -> &'static str {
        "ant-colony"
    }

    fn set_problem_data(&mut self, problem: Arc<ProblemData>) -> Result<()> {
        AntColony::set_problem_data(self, problem)
    }

    fn run(&mut self) -> Result<RunResult> {
        AntColony::run(self)
    }
}

fn construct<R: Rng>(
    colony: &Colony,
    config: &AcoConfig,
    iteration: usize,
    rng: &mut R,
) -> Solution {
    let problem = colony.problem.as_ref();
    let exploration = 1.0 - iteration as f64 / config.max_iterations as f64;
    let alpha = config.alpha * (1.0 - 0.5 * exploration);
    let beta = config.beta * (1.0 + 0.3 * exploration);

    let mut solution = problem.empty_solution();
    let mut remaining = problem.capacity();
    let mut order: Vec<usize> = (0..problem.n_items()).collect();
    order.shuffle(rng);

    let mut probs = Vec::new();
    for i in order {
        let max_level = max_feasible_quantity(problem, i, remaining);
        if max_level == 0 {
            continue;
        }

        let tau = &colony.pheromone.row(i)[..=max_level];
        let eta = &colony.heuristic.row(i)[..=max_level];
        probs.clear();
        probs.extend(tau.iter().zip(eta).map(|(&t, &h)| {
            let p = t.powf(alpha) * h.powf(beta);
            if p.is_finite() && p > 0.0 {
                p
            } else {
                0.0
            }
        }));

        let k = roulette(&probs, rng);
        solution[i] = k;
        remaining -= k as f64 * problem.weights()[i];
    }
    solution
}

/// Cumulative roulette selection with a single draw.
///
/// Falls back to a uniform choice when the weights carry no mass.
fn roulette<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if !(total > 0.0) {
        return rng.random_range(0..weights.len());
    }
    let r: f64 = rng.random();
    let mut acc = 0.0;
    for (k, &w) in weights.iter().enumerate() {
        acc += w / total;
        if acc >= r {
            return k;
        }
    }
    weights.len() - 1
}

fn deposit(pheromone: &mut PheromoneMatrix, config: &AcoConfig, ants: &[Solution], values: &[f64]) {
    pheromone.evaporate(config.evaporation_rate);

    debug_assert_eq!(ants.len(), values.len());
    let mut ranked: Vec<usize> = (0..ants.len()).collect();
    ranked.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    for (rank, &a) in ranked.iter().enumerate() {
        let value = values[a];
        if value <= 0.0 {
            continue;
        }
        let delta = (config.q / (value * (rank + 1) as f64)).min(f64::MAX);
        for (item, &level) in ants[a].iter().enumerate() {
            pheromone.deposit(item, level, delta);
        }
    }

    pheromone.clamp_rows();
}

fn search<R: Rng>(colony: &mut Colony, config: &AcoConfig, rng: &mut R) -> Result<RunResult> {
    let problem = Arc::clone(&colony.problem);
    debug!(
        n_items = problem.n_items(),
        capacity = problem.capacity(),
        ant_count = config.ant_count,
        max_iterations = config.max_iterations,
        alpha = config.alpha,
        beta = config.beta,
        evaporation_rate = config.evaporation_rate,
        "starting ant colony"
    );
    let start = Instant::now();
    let snapshot = colony.pheromone.clone();

    let mut best = problem.empty_solution();
    let mut best_value = 0.0;
    let mut convergence_iteration = 0usize;
    let mut fitness_history = Vec::with_capacity(config.max_iterations);

    let mut ants = Vec::with_capacity(config.ant_count);
    let mut values = Vec::with_capacity(config.ant_count);
    let mut infeasible = 0usize;

    for iteration in 0..config.max_iterations {
        ants.clear();
        values.clear();

        for _ in 0..config.ant_count {
            let ant = construct(colony, config, iteration, rng);
            if !is_valid(&ant, &problem) {
                infeasible += 1;
                continue;
            }
            let value = value_of(&ant, &problem);
            if value > best_value {
                best = ant.clone();
                best_value = value;
                convergence_iteration = iteration;
                trace!(iteration, best_value, "new best");
            }
            ants.push(ant);
            values.push(value);
        }

        if !ants.is_empty() {
            deposit(&mut colony.pheromone, config, &ants, &values);
        }
        fitness_history.push(best_value);
    }

    colony.pheromone = snapshot;

    let elapsed_seconds = start.elapsed().as_secs_f64();
    info!(
        best_value,
        convergence_iteration,
        iterations = config.max_iterations,
        infeasible,
        elapsed_seconds,
        "ant colony finished"
    );

    Ok(RunResult {
        best_solution: best,
        best_value,
        convergence_iteration,
        iterations: config.max_iterations,
        elapsed_seconds,
        fitness_history,
    })
}
