//! SA configuration.

use crate::error::{KnapsackError, Result};

/// Configuration for the Simulated Annealing engine.
///
/// Cooling is geometric, `T_{k+1} = cooling_rate * T_k`, applied once per
/// iteration. When `stagnation_limit` consecutive iterations pass without
/// a new best, the temperature is reheated to
/// `initial_temperature * reheat_factor`.
///
/// # Examples
///
/// ```
/// use knapsack_meta::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(500.0)
///     .with_final_temperature(0.5)
///     .with_cooling_rate(0.98)
///     .with_max_iterations(5000)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Starting temperature. Higher values accept more worsening moves.
    pub initial_temperature: f64,

    /// The run stops once the temperature is no longer above this.
    /// Must be strictly positive.
    pub final_temperature: f64,

    /// Geometric cooling factor in (0, 1).
    pub cooling_rate: f64,

    /// Hard iteration budget.
    pub max_iterations: usize,

    /// Iterations without a new best before reheating.
    pub stagnation_limit: usize,

    /// Reheat target as a fraction of `initial_temperature`, in (0, 1].
    pub reheat_factor: f64,

    /// Cap on repair steps when a neighbor comes out overweight.
    pub max_repair_steps: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            final_temperature: 1.0,
            cooling_rate: 0.95,
            max_iterations: 1000,
            stagnation_limit: 100,
            reheat_factor: 0.5,
            max_repair_steps: 10_000,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_final_temperature(mut self, t: f64) -> Self {
        self.final_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_stagnation_limit(mut self, n: usize) -> Self {
        self.stagnation_limit = n;
        self
    }

    pub fn with_reheat_factor(mut self, factor: f64) -> Self {
        self.reheat_factor = factor;
        self
    }

    pub fn with_max_repair_steps(mut self, n: usize) -> Self {
        self.max_repair_steps = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(KnapsackError::invalid_config(
                "initial_temperature",
                format!("must be positive and finite, got {}", self.initial_temperature),
            ));
        }
        if !(self.final_temperature > 0.0) {
            return Err(KnapsackError::invalid_config(
                "final_temperature",
                format!("must be positive, got {}", self.final_temperature),
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(KnapsackError::invalid_config(
                "cooling_rate",
                format!("must be in (0, 1), got {}", self.cooling_rate),
            ));
        }
        if self.max_iterations == 0 {
            return Err(KnapsackError::invalid_config(
                "max_iterations",
                "must be positive",
            ));
        }
        if self.stagnation_limit == 0 {
            return Err(KnapsackError::invalid_config(
                "stagnation_limit",
                "must be positive",
            ));
        }
        if !(self.reheat_factor > 0.0 && self.reheat_factor <= 1.0) {
            return Err(KnapsackError::invalid_config(
                "reheat_factor",
                format!("must be in (0, 1], got {}", self.reheat_factor),
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
        let config = SaConfig::default();
        assert!((config.initial_temperature - 1000.0).abs() < 1e-10);
        assert!((config.final_temperature - 1.0).abs() < 1e-10);
        assert!((config.cooling_rate - 0.95).abs() < 1e-10);
        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.stagnation_limit, 100);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_validate_ok() {
        assert!(SaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_temperature() {
        let config = SaConfig::default().with_initial_temperature(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_final_temperature() {
        let config = SaConfig::default().with_final_temperature(0.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("final_temperature"));
    }

    #[test]
    fn test_validate_bad_cooling_rate() {
        assert!(SaConfig::default().with_cooling_rate(1.0).validate().is_err());
        assert!(SaConfig::default().with_cooling_rate(0.0).validate().is_err());
    }

    #[test]
    fn test_validate_zero_iterations() {
        assert!(SaConfig::default().with_max_iterations(0).validate().is_err());
    }

    #[test]
    fn test_validate_bad_reheat() {
        assert!(SaConfig::default().with_reheat_factor(1.5).validate().is_err());
        assert!(SaConfig::default().with_stagnation_limit(0).validate().is_err());
    }
}
