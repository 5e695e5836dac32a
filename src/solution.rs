//! Solution representation for the TSP.
//!
//! This module provides the data structure for representing and reporting
//! tours produced by the colony simulations.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::instance::TspInstance;

/// Represents a solution to the TSP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The tour as a sequence of internal city indices (closing edge implicit)
    pub tour: Vec<usize>,
    /// Total tour length
    pub cost: f64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of iterations performed
    pub iterations: usize,
}

impl Solution {
    /// Create a solution from a tour
    pub fn from_tour(instance: &TspInstance, tour: Vec<usize>, algorithm: &str) -> Self {
        let cost = instance.tour_length(&tour);

        Solution {
            tour,
            cost,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: 0,
        }
    }

    /// Check if the tour visits every city exactly once
    pub fn is_complete(&self, instance: &TspInstance) -> bool {
        if self.tour.len() != instance.dimension {
            return false;
        }

        let unique: HashSet<usize> = self.tour.iter().cloned().collect();
        unique.len() == instance.dimension
    }

    /// Map the tour back to the 1-based city ids from the input file
    pub fn city_ids(&self, instance: &TspInstance) -> Vec<usize> {
        self.tour.iter().map(|&i| instance.cities[i].id).collect()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Cost: {:.2}", self.cost)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Tour: {:?}", self.tour)
    }
}
