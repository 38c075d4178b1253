//! Pheromone and heuristic matrices indexed by (item, quantity level).

use crate::problem::ProblemData;

/// Lower bound of each pheromone row relative to the row maximum.
pub const ROW_FLOOR_RATIO: f64 = 0.01;

/// Learned desirability of choosing exactly `k` units of item `i`.
///
/// Row `i` has `max_qty[i] + 1` entries, one per level `0..=max_qty[i]`.
/// All entries stay strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    rows: Vec<Vec<f64>>,
}

impl PheromoneMatrix {
    /// Every level of every item set to `level`.
    pub fn uniform(problem: &ProblemData, level: f64) -> Self {
        Self {
            rows: problem.max_qty().iter().map(|&m| vec![level; m + 1]).collect(),
        }
    }

    pub fn n_items(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, item: usize) -> &[f64] {
        &self.rows[item]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Multiplies every entry by `1 - rate`.
    pub fn evaporate(&mut self, rate: f64) {
        let keep = 1.0 - rate;
        for tau in self.rows.iter_mut().flatten() {
            *tau *= keep;
        }
    }

    /// Adds `amount` to one entry, saturating at `f64::MAX`.
    pub fn deposit(&mut self, item: usize, level: usize, amount: f64) {
        let tau = &mut self.rows[item][level];
        *tau = (*tau + amount).min(f64::MAX);
    }

    /// Clamps each row to `[ROW_FLOOR_RATIO * row_max, row_max]`.
    ///
    /// Both bounds are kept at or above `f64::MIN_POSITIVE`, so a row that
    /// evaporates without deposits never reaches zero.
    pub fn clamp_rows(&mut self) {
        for row in &mut self.rows {
            let max = row
                .iter()
                .copied()
                .fold(f64::MIN, f64::max)
                .max(f64::MIN_POSITIVE);
            let min = (max * ROW_FLOOR_RATIO).max(f64::MIN_POSITIVE);
            for tau in row.iter_mut() {
                *tau = tau.clamp(min, max);
            }
        }
    }
}

/// Static value-density guidance, fixed for the lifetime of a problem.
///
/// Level `k > 0` of item `i` scores `k * values[i] / (k * weights[i])`;
/// level 0 gets a small positive constant so skipping an item is unlikely
/// but never impossible.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicMatrix {
    rows: Vec<Vec<f64>>,
}

impl HeuristicMatrix {
    pub fn new(problem: &ProblemData, zero_level: f64) -> Self {
        let rows = (0..problem.n_items())
            .map(|i| {
                let (w, v) = (problem.weights()[i], problem.values()[i]);
                (0..=problem.max_qty()[i])
                    .map(|k| {
                        if k == 0 {
                            zero_level
                        } else {
                            let k = k as f64;
                            (k * v) / (k * w)
                        }
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn row(&self, item: usize) -> &[f64] {
        &self.rows[item]
    }
}
