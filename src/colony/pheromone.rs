//! Pheromone trail matrix with optional MAX-MIN bounding.
//!
//! Trails are stored symmetrically, mutated by exactly one writer per
//! iteration: a global evaporation pass followed by per-edge deposits. When
//! MAX-MIN bounds are attached, every mutation re-clamps the touched entries
//! so no value ever leaves the range, even transiently.

/// Pheromone trail matrix
#[derive(Debug, Clone)]
pub struct PheromoneMatrix {
    values: Vec<Vec<f64>>,
    bounds: Option<(f64, f64)>,
}

/// Initial trail level on every edge
const INITIAL_PHEROMONE: f64 = 1.0;

impl PheromoneMatrix {
    /// Create an unbounded matrix with all trails at the initial level
    pub fn new(n: usize) -> Self {
        PheromoneMatrix {
            values: vec![vec![INITIAL_PHEROMONE; n]; n],
            bounds: None,
        }
    }

    /// Create a matrix with MAX-MIN bounds attached.
    ///
    /// Initial trails are clamped into `[min, max]` so the in-range invariant
    /// holds from the first read.
    pub fn with_bounds(n: usize, min: f64, max: f64) -> Self {
        let initial = INITIAL_PHEROMONE.clamp(min, max);
        PheromoneMatrix {
            values: vec![vec![initial; n]; n],
            bounds: Some((min, max)),
        }
    }

    /// The bounds in effect, if any
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.bounds
    }

    /// Matrix dimension
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Trail level on edge (i, j)
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    #[inline]
    fn clamp(&self, value: f64) -> f64 {
        match self.bounds {
            Some((min, max)) => value.clamp(min, max),
            None => value,
        }
    }

    /// Decay every trail by the evaporation rate, re-clamping each entry
    pub fn evaporate(&mut self, rate: f64) {
        debug_assert!((0.0..=1.0).contains(&rate));
        let n = self.values.len();
        for i in 0..n {
            for j in 0..n {
                let decayed = self.values[i][j] * (1.0 - rate);
                self.values[i][j] = self.clamp(decayed);
            }
        }
    }

    /// Add `amount` to edge (u, v) and its mirror, re-clamping both entries.
    /// The TSP is undirected, so trails are kept symmetric.
    pub fn deposit(&mut self, u: usize, v: usize, amount: f64) {
        let reinforced = self.clamp(self.values[u][v] + amount);
        self.values[u][v] = reinforced;
        self.values[v][u] = reinforced;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_within_bounds(matrix: &PheromoneMatrix) {
        let (min, max) = matrix.bounds().unwrap();
        let n = matrix.len();
        for i in 0..n {
            for j in 0..n {
                let value = matrix.get(i, j);
                assert!(value >= min && value <= max, "trail {} outside [{}, {}]", value, min, max);
            }
        }
    }

    #[test]
    fn test_initial_level() {
        let matrix = PheromoneMatrix::new(3);
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.get(0, 2), 1.0);
    }

    #[test]
    fn test_initial_level_clamped_into_bounds() {
        let matrix = PheromoneMatrix::with_bounds(3, 0.001, 0.05);
        assert_eq!(matrix.get(0, 1), 0.05);
        assert_within_bounds(&matrix);
    }

    #[test]
    fn test_evaporation_decays_and_respects_lower_bound() {
        let mut matrix = PheromoneMatrix::with_bounds(4, 0.01, 0.5);
        for _ in 0..100 {
            matrix.evaporate(0.5);
            assert_within_bounds(&matrix);
        }
        assert_eq!(matrix.get(1, 3), 0.01);
    }

    #[test]
    fn test_deposit_is_symmetric_and_respects_upper_bound() {
        let mut matrix = PheromoneMatrix::with_bounds(4, 0.01, 0.5);
        matrix.evaporate(0.9);
        for _ in 0..100 {
            matrix.deposit(0, 2, 0.2);
            assert_within_bounds(&matrix);
        }
        assert_eq!(matrix.get(0, 2), 0.5);
        assert_eq!(matrix.get(2, 0), 0.5);
    }

    #[test]
    fn test_unbounded_matrix_accumulates_freely() {
        let mut matrix = PheromoneMatrix::new(3);
        matrix.deposit(0, 1, 2.5);
        assert_eq!(matrix.get(0, 1), 3.5);
        assert_eq!(matrix.get(1, 0), 3.5);
        matrix.evaporate(0.5);
        assert_eq!(matrix.get(0, 1), 1.75);
    }
}
