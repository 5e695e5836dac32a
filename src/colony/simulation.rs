//! Colony simulations driving the full search.
//!
//! Two variants share the construction machinery: the MAX-MIN Ant System,
//! where every ant reinforces within dynamically computed trail bounds, and a
//! rank-based elitist variant where only the top-ranked ants deposit.
//!
//! Each iteration runs construction as a parallel batch (ants only read the
//! matrices), then applies best-tracking and the pheromone update serially.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use ordered_float::OrderedFloat;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::colony::construction::construct_tour;
use crate::colony::{ColonyConfig, PheromoneMatrix};
use crate::error::SolverError;
use crate::instance::TspInstance;
use crate::solution::Solution;

/// Ratio between the upper and lower MAX-MIN trail bounds
const MIN_MAX_RATIO: f64 = 50.0;

/// Construct one tour per ant as a parallel batch.
///
/// Sub-seeds are drawn serially from the master RNG, so the batch is
/// deterministic regardless of how the work is scheduled across threads.
fn construct_batch(
    instance: &TspInstance,
    pheromone: &PheromoneMatrix,
    alpha: f64,
    beta: f64,
    num_ants: usize,
    rng: &mut ChaCha8Rng,
) -> Vec<(Vec<usize>, f64)> {
    let seeds: Vec<u64> = (0..num_ants).map(|_| rng.gen()).collect();

    seeds
        .into_par_iter()
        .map(|seed| {
            let mut ant_rng = ChaCha8Rng::seed_from_u64(seed);
            construct_tour(instance, pheromone, alpha, beta, &mut ant_rng)
        })
        .collect()
}

/// Deposit `delta` on every edge of a tour, closing edge included
fn deposit_along_tour(pheromone: &mut PheromoneMatrix, tour: &[usize], delta: f64) {
    let m = tour.len();
    for i in 0..m {
        let from = tour[i];
        let to = tour[(i + 1) % m];
        pheromone.deposit(from, to, delta);
    }
}

/// Max-Min Ant System solver
pub struct MaxMinAntSystem {
    config: ColonyConfig,
    instance: TspInstance,
    pheromone: PheromoneMatrix,
    best_tour: Vec<usize>,
    best_distance: f64,
    rng: ChaCha8Rng,
    cancel: Option<Arc<AtomicBool>>,
}

impl MaxMinAntSystem {
    /// Create a solver with trail bounds derived from the distance matrix:
    /// `max = 1 / (n * mean distance)`, `min = max / 50`.
    pub fn new(instance: TspInstance, config: ColonyConfig) -> Result<Self, SolverError> {
        config.validate()?;

        let n = instance.dimension;
        let mean = instance.mean_distance();
        // All-coincident instances have no usable distance scale
        let pheromone = if mean > 0.0 {
            let max = 1.0 / (n as f64 * mean);
            PheromoneMatrix::with_bounds(n, max / MIN_MAX_RATIO, max)
        } else {
            PheromoneMatrix::new(n)
        };

        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        Ok(MaxMinAntSystem {
            config,
            instance,
            pheromone,
            best_tour: Vec::new(),
            best_distance: f64::INFINITY,
            rng,
            cancel: None,
        })
    }

    /// Attach a flag checked at the top of each iteration; raising it
    /// finalizes the run early with the best tour found so far.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn best_distance(&self) -> f64 {
        self.best_distance
    }

    pub fn pheromone(&self) -> &PheromoneMatrix {
        &self.pheromone
    }

    /// Run the full search
    pub fn run(&mut self) -> Result<Solution, SolverError> {
        let start = Instant::now();
        let mut iterations_done = 0;

        for iteration in 0..self.config.max_iterations {
            if let Some(flag) = &self.cancel {
                if flag.load(Ordering::Relaxed) {
                    log::info!("cancelled at iteration {}", iteration);
                    break;
                }
            }

            let tours = construct_batch(
                &self.instance,
                &self.pheromone,
                self.config.alpha,
                self.config.beta,
                self.config.num_ants,
                &mut self.rng,
            );

            for (tour, distance) in &tours {
                if *distance < self.best_distance {
                    self.best_distance = *distance;
                    self.best_tour = tour.clone();
                    log::debug!("iteration {}: new best {:.2}", iteration, distance);
                }
            }

            self.update_pheromones(&tours);
            iterations_done = iteration + 1;
        }

        if self.best_tour.is_empty() {
            return Err(SolverError::NoSolution);
        }

        log::info!(
            "MMAS finished after {} iterations, best distance {:.2}",
            iterations_done,
            self.best_distance
        );

        let mut solution = Solution::from_tour(&self.instance, self.best_tour.clone(), "MMAS");
        solution.computation_time = start.elapsed().as_secs_f64();
        solution.iterations = iterations_done;

        Ok(solution)
    }

    /// Evaporation and reinforcement, committed together for the iteration.
    /// Every ant's tour reinforces its edges by `1 / distance`.
    fn update_pheromones(&mut self, tours: &[(Vec<usize>, f64)]) {
        self.pheromone.evaporate(self.config.evaporation_rate);

        for (tour, distance) in tours {
            if *distance > 0.0 {
                deposit_along_tour(&mut self.pheromone, tour, 1.0 / distance);
            }
        }
    }
}

/// Rank-based elitist solver.
///
/// Only the top `elite_fraction` of each iteration's ants deposit pheromone,
/// weighted by rank; trails are unbounded. Best-tracking likewise considers
/// elite ants only.
pub struct ElitistAntSystem {
    config: ColonyConfig,
    instance: TspInstance,
    pheromone: PheromoneMatrix,
    best_tour: Vec<usize>,
    best_distance: f64,
    rng: ChaCha8Rng,
    cancel: Option<Arc<AtomicBool>>,
}

impl ElitistAntSystem {
    pub fn new(instance: TspInstance, config: ColonyConfig) -> Result<Self, SolverError> {
        config.validate()?;

        let pheromone = PheromoneMatrix::new(instance.dimension);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        Ok(ElitistAntSystem {
            config,
            instance,
            pheromone,
            best_tour: Vec::new(),
            best_distance: f64::INFINITY,
            rng,
            cancel: None,
        })
    }

    /// Attach a flag checked at the top of each iteration
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Number of ants allowed to deposit, at least 1
    fn elite_count(&self) -> usize {
        ((self.config.elite_fraction * self.config.num_ants as f64).ceil() as usize)
            .clamp(1, self.config.num_ants)
    }

    /// Run the full search
    pub fn run(&mut self) -> Result<Solution, SolverError> {
        let start = Instant::now();
        let elite_count = self.elite_count();
        let mut iterations_done = 0;

        for iteration in 0..self.config.max_iterations {
            if let Some(flag) = &self.cancel {
                if flag.load(Ordering::Relaxed) {
                    log::info!("cancelled at iteration {}", iteration);
                    break;
                }
            }

            let tours = construct_batch(
                &self.instance,
                &self.pheromone,
                self.config.alpha,
                self.config.beta,
                self.config.num_ants,
                &mut self.rng,
            );

            // Rank ants by tour length, shortest first
            let mut order: Vec<usize> = (0..tours.len()).collect();
            order.sort_by_key(|&i| OrderedFloat(tours[i].1));
            let elite = &order[..elite_count];

            for &idx in elite {
                let (tour, distance) = &tours[idx];
                if *distance < self.best_distance {
                    self.best_distance = *distance;
                    self.best_tour = tour.clone();
                    log::debug!("iteration {}: new best {:.2}", iteration, distance);
                }
            }

            self.update_pheromones(&tours, elite);
            iterations_done = iteration + 1;
        }

        if self.best_tour.is_empty() {
            return Err(SolverError::NoSolution);
        }

        log::info!(
            "elitist run finished after {} iterations, best distance {:.2}",
            iterations_done,
            self.best_distance
        );

        let mut solution = Solution::from_tour(&self.instance, self.best_tour.clone(), "Elitist");
        solution.computation_time = start.elapsed().as_secs_f64();
        solution.iterations = iterations_done;

        Ok(solution)
    }

    /// Rank-based update: the elite ant with rank r of k deposits
    /// `(k - r) / distance` on each of its edges.
    fn update_pheromones(&mut self, tours: &[(Vec<usize>, f64)], elite: &[usize]) {
        self.pheromone.evaporate(self.config.evaporation_rate);

        let k = elite.len();
        for (rank, &idx) in elite.iter().enumerate() {
            let (tour, distance) = &tours[idx];
            if *distance > 0.0 {
                let delta = (k - rank) as f64 / distance;
                deposit_along_tour(&mut self.pheromone, tour, delta);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::City;

    fn instance_from_coords(coords: &[(f64, f64)]) -> TspInstance {
        let cities = coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| City::new(i + 1, x, y))
            .collect();
        TspInstance::from_cities("test".to_string(), String::new(), cities).unwrap()
    }

    fn unit_square() -> TspInstance {
        instance_from_coords(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])
    }

    fn small_config(num_ants: usize, max_iterations: usize) -> ColonyConfig {
        ColonyConfig {
            num_ants,
            max_iterations,
            ..Default::default()
        }
    }

    #[test]
    fn test_square_converges_to_perimeter() {
        for num_ants in [2, 8] {
            let mut solver = MaxMinAntSystem::new(unit_square(), small_config(num_ants, 30)).unwrap();
            let solution = solver.run().unwrap();
            assert_eq!(solution.cost, 4.0);
            assert_eq!(solution.tour.len(), 4);
        }
    }

    #[test]
    fn test_two_cities_there_and_back() {
        let instance = instance_from_coords(&[(0.0, 0.0), (3.0, 4.0)]);
        let expected = 2.0 * instance.distance(0, 1);
        let mut solver = MaxMinAntSystem::new(instance, small_config(3, 5)).unwrap();
        let solution = solver.run().unwrap();
        assert_eq!(solution.cost, expected);
    }

    #[test]
    fn test_solution_is_complete_permutation() {
        let instance = instance_from_coords(&[
            (0.0, 0.0),
            (2.0, 1.0),
            (5.0, 3.0),
            (1.0, 4.0),
            (3.0, 3.0),
        ]);
        let mut solver = MaxMinAntSystem::new(instance.clone(), small_config(5, 10)).unwrap();
        let solution = solver.run().unwrap();
        assert!(solution.is_complete(&instance));
    }

    #[test]
    fn test_deterministic_given_seed() {
        let coords = [(0.0, 0.0), (4.0, 1.0), (2.0, 5.0), (6.0, 3.0), (1.0, 2.0)];
        let run = || {
            let mut solver =
                MaxMinAntSystem::new(instance_from_coords(&coords), small_config(6, 15)).unwrap();
            solver.run().unwrap()
        };

        let first = run();
        let second = run();
        assert_eq!(first.tour, second.tour);
        assert_eq!(first.cost, second.cost);
    }

    #[test]
    fn test_best_distance_non_increasing_across_iterations() {
        let coords = [(0.0, 0.0), (4.0, 1.0), (2.0, 5.0), (6.0, 3.0), (1.0, 2.0)];
        // Same seed: a longer run replays the shorter run's iterations exactly
        let mut previous = f64::INFINITY;
        for max_iterations in [1, 5, 15, 40] {
            let mut solver = MaxMinAntSystem::new(
                instance_from_coords(&coords),
                small_config(4, max_iterations),
            )
            .unwrap();
            let solution = solver.run().unwrap();
            assert!(solution.cost <= previous);
            previous = solution.cost;
        }
    }

    #[test]
    fn test_pheromone_stays_within_bounds_after_run() {
        let coords = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (5.0, 5.0)];
        let mut solver =
            MaxMinAntSystem::new(instance_from_coords(&coords), small_config(6, 25)).unwrap();
        solver.run().unwrap();

        let pheromone = solver.pheromone();
        let (min, max) = pheromone.bounds().unwrap();
        assert!(min < max);
        for i in 0..pheromone.len() {
            for j in 0..pheromone.len() {
                let value = pheromone.get(i, j);
                assert!(value >= min && value <= max);
            }
        }
    }

    #[test]
    fn test_zero_ants_rejected_before_running() {
        let config = ColonyConfig {
            num_ants: 0,
            ..Default::default()
        };
        assert!(matches!(
            MaxMinAntSystem::new(unit_square(), config),
            Err(SolverError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_iterations_rejected_before_running() {
        let config = ColonyConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(matches!(
            ElitistAntSystem::new(unit_square(), config),
            Err(SolverError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_cancel_before_first_iteration_yields_no_solution() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut solver = MaxMinAntSystem::new(unit_square(), small_config(4, 100))
            .unwrap()
            .with_cancel_flag(flag);
        assert!(matches!(solver.run(), Err(SolverError::NoSolution)));
    }

    #[test]
    fn test_elitist_finds_square_perimeter() {
        let mut solver = ElitistAntSystem::new(unit_square(), small_config(8, 30)).unwrap();
        let solution = solver.run().unwrap();
        assert_eq!(solution.cost, 4.0);
        assert_eq!(solution.algorithm, "Elitist");
    }

    #[test]
    fn test_elitist_deterministic_given_seed() {
        let coords = [(0.0, 0.0), (4.0, 1.0), (2.0, 5.0), (6.0, 3.0), (1.0, 2.0)];
        let run = || {
            let mut solver =
                ElitistAntSystem::new(instance_from_coords(&coords), small_config(6, 15)).unwrap();
            solver.run().unwrap()
        };

        let first = run();
        let second = run();
        assert_eq!(first.tour, second.tour);
        assert_eq!(first.cost, second.cost);
    }

    #[test]
    fn test_elite_count_never_zero() {
        let config = ColonyConfig {
            num_ants: 2,
            elite_fraction: 0.1,
            ..Default::default()
        };
        let solver = ElitistAntSystem::new(unit_square(), config).unwrap();
        assert_eq!(solver.elite_count(), 1);
    }
}
