//! SA engine and execution loop.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use super::config::SaConfig;
use crate::error::{KnapsackError, Result};
use crate::problem::ops::{check_bounds, fits};
use crate::problem::{max_feasible_quantity, value_of, weight_of, ProblemData, Solution};
use crate::result::RunResult;
use crate::solver::KnapsackSolver;

/// Simulated Annealing engine for the bounded knapsack.
///
/// Works on a single trajectory: each iteration proposes a ±1 change to
/// one item (repaired back to feasibility if needed) and accepts it by the
/// Metropolis criterion. The engine keeps no search state between runs.
///
/// # Examples
///
/// ```
/// use knapsack_meta::problem::ProblemData;
/// use knapsack_meta::sa::{SaConfig, SimulatedAnnealing};
///
/// let problem = ProblemData::new(
///     vec![2.0, 3.0, 4.0],
///     vec![3.0, 4.0, 5.0],
///     vec![2, 1, 1],
///     5.0,
/// ).unwrap();
///
/// let mut sa = SimulatedAnnealing::new(SaConfig::default().with_seed(42)).unwrap();
/// sa.set_problem_data(problem).unwrap();
/// let result = sa.run().unwrap();
/// assert!(result.best_value <= 7.0);
/// ```
#[derive(Debug)]
pub struct SimulatedAnnealing {
    config: SaConfig,
    problem: Option<Arc<ProblemData>>,
    rng: StdRng,
}

impl SimulatedAnnealing {
    /// Creates an engine with a validated configuration.
    pub fn new(config: SaConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Ok(Self {
            config,
            problem: None,
            rng,
        })
    }

    pub fn config(&self) -> &SaConfig {
        &self.config
    }

    pub fn problem(&self) -> Option<&ProblemData> {
        self.problem.as_deref()
    }

    /// Installs the instance to solve after validating it.
    pub fn set_problem_data(&mut self, problem: impl Into<Arc<ProblemData>>) -> Result<()> {
        let problem = problem.into();
        problem.validate()?;
        self.problem = Some(problem);
        Ok(())
    }

    fn require_problem(&self) -> Result<&ProblemData> {
        self.problem.as_deref().ok_or(KnapsackError::ProblemNotSet)
    }

    /// Builds a random feasible starting solution.
    ///
    /// Items are filled in index order, each with a uniform quantity in
    /// `[0, max feasible given the remaining capacity]`.
    pub fn generate_initial_solution<R: Rng>(&self, rng: &mut R) -> Result<Solution> {
        Ok(initial_solution(self.require_problem()?, rng))
    }

    /// Proposes a neighbor of `solution`.
    ///
    /// One random item moves by ±1 (direction flipped at the bounds). If
    /// that makes the vector overweight, random positive quantities are
    /// decremented until it fits again.
    pub fn generate_neighbor<R: Rng>(&self, solution: &[usize], rng: &mut R) -> Result<Solution> {
        let problem = self.require_problem()?;
        check_bounds(solution, problem)?;
        neighbor(problem, &self.config, solution, rng)
    }

    /// Metropolis acceptance probability for maximization.
    ///
    /// Improvements are always accepted; otherwise the probability is
    /// `exp((candidate - current) / temperature)`.
    pub fn accept_probability(current_value: f64, candidate_value: f64, temperature: f64) -> f64 {
        if candidate_value > current_value {
            return 1.0;
        }
        ((candidate_value - current_value) / temperature).exp()
    }

    /// Runs one trial using the engine's own random source.
    pub fn run(&mut self) -> Result<RunResult> {
        let problem = self.problem.as_deref().ok_or(KnapsackError::ProblemNotSet)?;
        anneal(problem, &self.config, &mut self.rng)
    }

    /// Runs one trial with an explicitly supplied random source.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> Result<RunResult> {
        anneal(self.require_problem()?, &self.config, rng)
    }
}

impl KnapsackSolver for SimulatedAnnealing {
    fn name(&self) -> &'static str {
        "simulated-annealing"
    }

    fn set_problem_data(&mut self, problem: Arc<ProblemData>) -> Result<()> {
        SimulatedAnnealing::set_problem_data(self, problem)
    }

    fn run(&mut self) -> Result<RunResult> {
        SimulatedAnnealing::run(self)
    }
}

fn initial_solution<R: Rng>(problem: &ProblemData, rng: &mut R) -> Solution {
    let mut solution = problem.empty_solution();
    let mut remaining = problem.capacity();
    for (i, qty) in solution.iter_mut().enumerate() {
        let max_possible = max_feasible_quantity(problem, i, remaining);
        if max_possible > 0 {
            *qty = rng.random_range(0..=max_possible);
            remaining -= *qty as f64 * problem.weights()[i];
        }
    }
    solution
}

fn neighbor<R: Rng>(
    problem: &ProblemData,
    config: &SaConfig,
    solution: &[usize],
    rng: &mut R,
) -> Result<Solution> {
    let mut next = solution.to_vec();
    let n = next.len();
    if n == 0 {
        return Ok(next);
    }

    let idx = rng.random_range(0..n);
    let max = problem.max_qty()[idx];
    // An item with zero availability has no move.
    if max > 0 {
        let mut increase = rng.random_bool(0.5);
        if !increase && next[idx] == 0 {
            increase = true;
        }
        if increase && next[idx] >= max {
            increase = false;
        }
        if increase {
            next[idx] += 1;
        } else {
            next[idx] -= 1;
        }
    }

    repair(problem, config, &mut next, rng)?;
    Ok(next)
}

/// Decrements random positive quantities until `solution` fits.
fn repair<R: Rng>(
    problem: &ProblemData,
    config: &SaConfig,
    solution: &mut [usize],
    rng: &mut R,
) -> Result<()> {
    let weights = problem.weights();
    let mut weight = weight_of(solution, problem);
    let mut steps = 0usize;
    while !fits(weight, problem) {
        if steps >= config.max_repair_steps {
            return Err(KnapsackError::InfeasibleConstruction { steps });
        }
        let positive: Vec<usize> = (0..solution.len()).filter(|&i| solution[i] > 0).collect();
        if positive.is_empty() {
            return Err(KnapsackError::InfeasibleConstruction { steps });
        }
        let i = positive[rng.random_range(0..positive.len())];
        solution[i] -= 1;
        weight -= weights[i];
        steps += 1;
    }
    Ok(())
}

fn anneal<R: Rng>(problem: &ProblemData, config: &SaConfig, rng: &mut R) -> Result<RunResult> {
    debug!(
        n_items = problem.n_items(),
        capacity = problem.capacity(),
        initial_temperature = config.initial_temperature,
        final_temperature = config.final_temperature,
        cooling_rate = config.cooling_rate,
        max_iterations = config.max_iterations,
        "starting simulated annealing"
    );
    let start = Instant::now();

    let mut current = initial_solution(problem, rng);
    let mut current_value = value_of(&current, problem);
    let mut best = current.clone();
    let mut best_value = current_value;

    let mut temperature = config.initial_temperature;
    let mut fitness_history = Vec::with_capacity(config.max_iterations);
    let mut convergence_iteration = 0usize;
    let mut stagnation = 0usize;
    let mut reheats = 0usize;
    let mut iteration = 0usize;

    while temperature > config.final_temperature && iteration < config.max_iterations {
        let candidate = neighbor(problem, config, &current, rng)?;
        let candidate_value = value_of(&candidate, problem);
        let probability =
            SimulatedAnnealing::accept_probability(current_value, candidate_value, temperature);

        if rng.random::<f64>() < probability {
            current = candidate;
            current_value = candidate_value;

            if current_value > best_value {
                best = current.clone();
                best_value = current_value;
                convergence_iteration = iteration;
                stagnation = 0;
                trace!(iteration, best_value, temperature, "new best");
            } else {
                stagnation += 1;
            }
        } else {
            stagnation += 1;
        }

        fitness_history.push(best_value);
        temperature *= config.cooling_rate;
        iteration += 1;

        if stagnation >= config.stagnation_limit {
            temperature = config.initial_temperature * config.reheat_factor;
            stagnation = 0;
            reheats += 1;
            trace!(iteration, temperature, "reheat");
        }
    }

    let elapsed_seconds = start.elapsed().as_secs_f64();
    info!(
        best_value,
        convergence_iteration,
        iterations = iteration,
        reheats,
        elapsed_seconds,
        "simulated annealing finished"
    );

    Ok(RunResult {
        best_solution: best,
        best_value,
        convergence_iteration,
        iterations: iteration,
        elapsed_seconds,
        fitness_history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::is_valid;
    use proptest::prelude::*;

    fn scenario() -> ProblemData {
        ProblemData::new(vec![2.0, 3.0, 4.0], vec![3.0, 4.0, 5.0], vec![2, 1, 1], 5.0).unwrap()
    }

    fn engine(problem: ProblemData, config: SaConfig) -> SimulatedAnnealing {
        let mut sa = SimulatedAnnealing::new(config).unwrap();
        sa.set_problem_data(problem).unwrap();
        sa
    }

    /// Exhaustive optimum for small instances.
    fn brute_force(problem: &ProblemData) -> f64 {
        fn go(p: &ProblemData, i: usize, sol: &mut Vec<usize>, best: &mut f64) {
            if i == p.n_items() {
                if is_valid(sol, p) {
                    *best = best.max(value_of(sol, p));
                }
                return;
            }
            for q in 0..=p.max_qty()[i] {
                sol[i] = q;
                go(p, i + 1, sol, best);
            }
            sol[i] = 0;
        }
        let mut best = 0.0;
        go(problem, 0, &mut problem.empty_solution(), &mut best);
        best
    }

    #[test]
    fn test_accept_probability_improvement_is_one() {
        assert_eq!(SimulatedAnnealing::accept_probability(5.0, 6.0, 0.001), 1.0);
        assert_eq!(SimulatedAnnealing::accept_probability(-3.0, 100.0, 1e9), 1.0);
    }

    #[test]
    fn test_accept_probability_metropolis() {
        let p = SimulatedAnnealing::accept_probability(10.0, 8.0, 2.0);
        assert!((p - (-1.0f64).exp()).abs() < 1e-12);
        assert_eq!(SimulatedAnnealing::accept_probability(4.0, 4.0, 1.0), 1.0);
        assert!(SimulatedAnnealing::accept_probability(100.0, 0.0, 1.0) < 1e-40);
    }

    #[test]
    fn test_run_without_problem() {
        let mut sa = SimulatedAnnealing::new(SaConfig::default()).unwrap();
        assert_eq!(sa.run(), Err(KnapsackError::ProblemNotSet));
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let err = SimulatedAnnealing::new(SaConfig::default().with_cooling_rate(2.0)).unwrap_err();
        assert!(matches!(err, KnapsackError::InvalidConfig { param: "cooling_rate", .. }));
    }

    #[test]
    fn test_scenario_reaches_optimum() {
        let problem = scenario();
        assert_eq!(brute_force(&problem), 7.0);

        let mut sa = engine(problem.clone(), SaConfig::default().with_seed(42));
        let mut hits = 0;
        for _ in 0..20 {
            let result = sa.run().unwrap();
            assert!(result.best_value <= 7.0 + 1e-9);
            if (result.best_value - 7.0).abs() < 1e-9 {
                hits += 1;
            }
        }
        assert!(hits >= 18, "expected optimum in most trials, got {hits}/20");
    }

    #[test]
    fn test_result_invariants() {
        let problem = ProblemData::new(
            vec![3.0, 4.5, 2.0, 7.0, 1.5],
            vec![4.0, 6.0, 2.5, 9.0, 1.0],
            vec![3, 2, 5, 1, 4],
            15.0,
        )
        .unwrap();
        let mut sa = engine(problem.clone(), SaConfig::default().with_seed(7));
        let result = sa.run().unwrap();

        assert!(is_valid(&result.best_solution, &problem));
        assert!((result.best_value - value_of(&result.best_solution, &problem)).abs() < 1e-9);
        assert_eq!(result.fitness_history.len(), result.iterations);
        for w in result.fitness_history.windows(2) {
            assert!(w[1] >= w[0], "history must be non-decreasing");
        }
        let first = result
            .fitness_history
            .iter()
            .position(|&v| v == result.best_value)
            .unwrap();
        assert_eq!(result.convergence_iteration, first);
    }

    #[test]
    fn test_temperature_floor_stops_early() {
        // 100 -> 1 at 0.5 per step takes 7 steps; no reheat before that.
        let config = SaConfig::default()
            .with_initial_temperature(100.0)
            .with_final_temperature(1.0)
            .with_cooling_rate(0.5)
            .with_max_iterations(1000)
            .with_seed(1);
        let mut sa = engine(scenario(), config);
        let result = sa.run().unwrap();
        assert_eq!(result.iterations, 7);
        assert_eq!(result.fitness_history.len(), 7);
    }

    #[test]
    fn test_iteration_cap() {
        let config = SaConfig::default()
            .with_cooling_rate(0.999999)
            .with_max_iterations(50)
            .with_seed(3);
        let mut sa = engine(scenario(), config);
        let result = sa.run().unwrap();
        assert_eq!(result.iterations, 50);
    }

    #[test]
    fn test_reheating_extends_search() {
        // Without reheating this schedule would stop after 7 iterations.
        let config = SaConfig::default()
            .with_initial_temperature(100.0)
            .with_final_temperature(1.0)
            .with_cooling_rate(0.5)
            .with_stagnation_limit(3)
            .with_reheat_factor(1.0)
            .with_max_iterations(200)
            .with_seed(5);
        let problem = ProblemData::new(vec![1.0], vec![1.0], vec![0], 10.0).unwrap();
        let mut sa = engine(problem, config);
        let result = sa.run().unwrap();
        assert_eq!(result.iterations, 200);
    }

    #[test]
    fn test_zero_capacity() {
        let problem =
            ProblemData::new(vec![1.0, 2.0], vec![5.0, 7.0], vec![3, 3], 0.0).unwrap();
        let mut sa = engine(problem, SaConfig::default().with_seed(11));
        let result = sa.run().unwrap();
        assert_eq!(result.best_solution, vec![0, 0]);
        assert_eq!(result.best_value, 0.0);
    }

    #[test]
    fn test_item_heavier_than_capacity() {
        let problem = ProblemData::new(vec![10.0], vec![50.0], vec![4], 9.0).unwrap();
        let sa = engine(problem.clone(), SaConfig::default());
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..50 {
            assert_eq!(sa.generate_initial_solution(&mut rng).unwrap(), vec![0]);
            assert_eq!(sa.generate_neighbor(&[0], &mut rng).unwrap(), vec![0]);
        }
    }

    #[test]
    fn test_neighbor_repairs_overweight_move() {
        // Full knapsack: any increment must be repaired.
        let problem = ProblemData::new(vec![1.0, 1.0], vec![1.0, 1.0], vec![5, 5], 5.0).unwrap();
        let sa = engine(problem.clone(), SaConfig::default());
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let n = sa.generate_neighbor(&[3, 2], &mut rng).unwrap();
            assert!(is_valid(&n, &problem), "neighbor {n:?} not valid");
        }
    }

    #[test]
    fn test_repair_cap_raises() {
        // Inconsistent input: starting point far above capacity.
        let problem = ProblemData::new(vec![1.0], vec![1.0], vec![50], 0.0).unwrap();
        let config = SaConfig::default().with_max_repair_steps(2);
        let sa = engine(problem, config);
        let mut rng = StdRng::seed_from_u64(0);
        let err = sa.generate_neighbor(&[40], &mut rng).unwrap_err();
        assert_eq!(err, KnapsackError::InfeasibleConstruction { steps: 2 });
    }

    #[test]
    fn test_neighbor_rejects_wrong_length() {
        let sa = engine(scenario(), SaConfig::default());
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            sa.generate_neighbor(&[0, 0], &mut rng),
            Err(KnapsackError::SolutionLength { .. })
        ));
    }

    #[test]
    fn test_neighbor_rejects_quantity_above_max() {
        let sa = engine(scenario(), SaConfig::default());
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            sa.generate_neighbor(&[0, 3, 0], &mut rng),
            Err(KnapsackError::QuantityOutOfRange {
                item: 1,
                quantity: 3,
                max: 1
            })
        );
    }

    #[test]
    fn test_deterministic_with_seed() {
        let config = SaConfig::default().with_seed(1234);
        let mut a = engine(scenario(), config.clone());
        let mut b = engine(scenario(), config);
        let ra = a.run().unwrap();
        let rb = b.run().unwrap();
        assert_eq!(ra.best_solution, rb.best_solution);
        assert_eq!(ra.best_value, rb.best_value);
        assert_eq!(ra.convergence_iteration, rb.convergence_iteration);
        assert_eq!(ra.fitness_history, rb.fitness_history);
    }

    #[test]
    fn test_run_with_rng_is_reproducible() {
        let sa = engine(scenario(), SaConfig::default());
        let ra = sa.run_with_rng(&mut StdRng::seed_from_u64(77)).unwrap();
        let rb = sa.run_with_rng(&mut StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(ra.fitness_history, rb.fitness_history);
        assert_eq!(ra.best_solution, rb.best_solution);
    }

    proptest! {
        #[test]
        fn prop_generated_solutions_are_valid(
            items in prop::collection::vec((0.5f64..10.0, 0.0f64..20.0, 0usize..6), 1..8),
            capacity in 0.0f64..40.0,
            seed in any::<u64>(),
        ) {
            let (weights, rest): (Vec<f64>, Vec<(f64, usize)>) =
                items.into_iter().map(|(w, v, q)| (w, (v, q))).unzip();
            let (values, max_qty): (Vec<f64>, Vec<usize>) = rest.into_iter().unzip();
            let problem = ProblemData::new(weights, values, max_qty, capacity).unwrap();
            let sa = engine(problem.clone(), SaConfig::default());
            let mut rng = StdRng::seed_from_u64(seed);

            let mut current = sa.generate_initial_solution(&mut rng).unwrap();
            prop_assert!(is_valid(&current, &problem));
            for _ in 0..30 {
                current = sa.generate_neighbor(&current, &mut rng).unwrap();
                prop_assert!(is_valid(&current, &problem));
            }
        }

        #[test]
        fn prop_never_beats_brute_force(seed in any::<u64>()) {
            let problem = scenario();
            let sa = engine(problem.clone(), SaConfig::default().with_max_iterations(200));
            let result = sa.run_with_rng(&mut StdRng::seed_from_u64(seed)).unwrap();
            prop_assert!(result.best_value <= brute_force(&problem) + 1e-9);
        }
    }
}
