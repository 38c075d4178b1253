//! ACO configuration.

use crate::error::{KnapsackError, Result};

/// Configuration for the Ant Colony engine.
///
/// # Dynamic weighting
///
/// With `e = 1 - iteration / max_iterations`, ants at a given iteration
/// use `alpha * (1 - 0.5 e)` for the pheromone exponent and
/// `beta * (1 + 0.3 e)` for the heuristic exponent. Early iterations lean
/// on value density, late ones on learned pheromone.
///
/// # Examples
///
/// ```
/// use knapsack_meta::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_ant_count(30)
///     .with_max_iterations(100)
///     .with_alpha(1.0)
///     .with_beta(3.0)
///     .with_evaporation_rate(0.3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Ants constructed per iteration.
    pub ant_count: usize,

    /// Number of iterations.
    pub max_iterations: usize,

    /// Pheromone influence.
    pub alpha: f64,

    /// Heuristic (value density) influence.
    pub beta: f64,

    /// Fraction of pheromone removed each iteration, in (0, 1).
    pub evaporation_rate: f64,

    /// Deposit constant `q`.
    pub q: f64,

    /// Uniform pheromone level set when a problem is installed.
    pub initial_pheromone: f64,

    /// Heuristic value for choosing zero units of an item.
    pub zero_quantity_heuristic: f64,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            ant_count: 50,
            max_iterations: 200,
            alpha: 1.0,
            beta: 2.0,
            evaporation_rate: 0.5,
            q: 100.0,
            initial_pheromone: 0.1,
            zero_quantity_heuristic: 0.01,
            seed: None,
        }
    }
}

impl AcoConfig {
    pub fn with_ant_count(mut self, n: usize) -> Self {
        self.ant_count = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_evaporation_rate(mut self, rate: f64) -> Self {
        self.evaporation_rate = rate;
        self
    }

    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    pub fn with_initial_pheromone(mut self, level: f64) -> Self {
        self.initial_pheromone = level;
        self
    }

    pub fn with_zero_quantity_heuristic(mut self, h: f64) -> Self {
        self.zero_quantity_heuristic = h;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.ant_count == 0 {
            return Err(KnapsackError::invalid_config("ant_count", "must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(KnapsackError::invalid_config(
                "max_iterations",
                "must be positive",
            ));
        }
        if !(self.alpha >= 0.0 && self.alpha.is_finite()) {
            return Err(KnapsackError::invalid_config(
                "alpha",
                format!("must be non-negative, got {}", self.alpha),
            ));
        }
        if !(self.beta >= 0.0 && self.beta.is_finite()) {
            return Err(KnapsackError::invalid_config(
                "beta",
                format!("must be non-negative, got {}", self.beta),
            ));
        }
        if !(self.evaporation_rate > 0.0 && self.evaporation_rate < 1.0) {
            return Err(KnapsackError::invalid_config(
                "evaporation_rate",
                format!("must be in (0, 1), got {}", self.evaporation_rate),
            ));
        }
        if !(self.q > 0.0 && self.q.is_finite()) {
            return Err(KnapsackError::invalid_config(
                "q",
                format!("must be positive, got {}", self.q),
            ));
        }
        if !(self.initial_pheromone > 0.0 && self.initial_pheromone.is_finite()) {
            return Err(KnapsackError::invalid_config(
                "initial_pheromone",
                format!("must be positive, got {}", self.initial_pheromone),
            ));
        }
        if !(self.zero_quantity_heuristic > 0.0) {
            return Err(KnapsackError::invalid_config(
                "zero_quantity_heuristic",
                format!("must be positive, got {}", self.zero_quantity_heuristic),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let c = AcoConfig::default();
        assert_eq!(c.ant_count, 50);
        assert_eq!(c.max_iterations, 200);
        assert!((c.evaporation_rate - 0.5).abs() < 1e-12);
        assert!((c.q - 100.0).abs() < 1e-12);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_ants() {
        assert!(AcoConfig::default().with_ant_count(0).validate().is_err());
    }

    #[test]
    fn test_validate_evaporation_bounds() {
        assert!(AcoConfig::default().with_evaporation_rate(0.0).validate().is_err());
        assert!(AcoConfig::default().with_evaporation_rate(1.0).validate().is_err());
    }

    #[test]
    fn test_validate_negative_exponent() {
        let err = AcoConfig::default().with_beta(-1.0).validate().unwrap_err();
        assert!(matches!(err, KnapsackError::InvalidConfig { param: "beta", .. }));
    }

    #[test]
    fn test_validate_q_and_pheromone() {
        assert!(AcoConfig::default().with_q(0.0).validate().is_err());
        assert!(AcoConfig::default().with_initial_pheromone(0.0).validate().is_err());
        assert!(AcoConfig::default()
            .with_zero_quantity_heuristic(0.0)
            .validate()
            .is_err());
    }
}
