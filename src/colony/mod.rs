//! Ant colony module for the TSP.
//!
//! This module exports the pheromone matrix, the probabilistic tour
//! constructor, and the colony simulations built on top of them.

pub mod construction;
pub mod pheromone;
pub mod simulation;

pub use pheromone::PheromoneMatrix;
pub use simulation::{ElitistAntSystem, MaxMinAntSystem};

use crate::error::SolverError;

/// Colony configuration parameters
#[derive(Debug, Clone)]
pub struct ColonyConfig {
    /// Number of ants per iteration
    pub num_ants: usize,
    /// Number of iterations
    pub max_iterations: usize,
    /// Pheromone importance (alpha)
    pub alpha: f64,
    /// Heuristic importance (beta)
    pub beta: f64,
    /// Evaporation rate (rho)
    pub evaporation_rate: f64,
    /// Fraction of top-ranked ants that deposit pheromone (elitist variant only)
    pub elite_fraction: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        ColonyConfig {
            num_ants: 20,
            max_iterations: 200,
            alpha: 1.0,
            beta: 2.5,
            evaporation_rate: 0.1,
            elite_fraction: 0.25,
            seed: 42,
        }
    }
}

impl ColonyConfig {
    /// Reject unusable parameter combinations before any simulation work
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.num_ants < 1 {
            return Err(SolverError::InvalidInput(
                "num_ants must be at least 1".to_string(),
            ));
        }
        if self.max_iterations < 1 {
            return Err(SolverError::InvalidInput(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.evaporation_rate) {
            return Err(SolverError::InvalidInput(format!(
                "evaporation_rate must be in [0, 1], got {}",
                self.evaporation_rate
            )));
        }
        if self.alpha < 0.0 || !self.alpha.is_finite() {
            return Err(SolverError::InvalidInput(format!(
                "alpha must be non-negative, got {}",
                self.alpha
            )));
        }
        if self.beta < 0.0 || !self.beta.is_finite() {
            return Err(SolverError::InvalidInput(format!(
                "beta must be non-negative, got {}",
                self.beta
            )));
        }
        if !(self.elite_fraction > 0.0 && self.elite_fraction <= 1.0) {
            return Err(SolverError::InvalidInput(format!(
                "elite_fraction must be in (0, 1], got {}",
                self.elite_fraction
            )));
        }
        Ok(())
    }
}
