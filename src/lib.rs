//! ACO TSP Solver Library
//!
//! An Ant Colony Optimization solver for the symmetric Euclidean TSP.
//!
//! # Features
//!
//! - TSP-LIB instance parsing (2D Euclidean coordinates)
//! - Max-Min Ant System with dynamically bounded pheromone trails
//! - Rank-based elitist ant system
//! - Seeded, reproducible runs with parallel tour construction
//! - Benchmarking tools comparing the two update policies
//!
//! # Example
//!
//! ```no_run
//! use aco_tsp_solver::colony::{ColonyConfig, MaxMinAntSystem};
//! use aco_tsp_solver::instance::TspInstance;
//!
//! // Load instance
//! let instance = TspInstance::from_file("instance.tsp").unwrap();
//!
//! // Run the search
//! let config = ColonyConfig::default();
//! let mut solver = MaxMinAntSystem::new(instance.clone(), config).unwrap();
//! let solution = solver.run().unwrap();
//!
//! println!("Best tour: {:?}", solution.city_ids(&instance));
//! println!("Best distance: {:.2}", solution.cost);
//! ```

pub mod benchmark;
pub mod colony;
pub mod error;
pub mod instance;
pub mod solution;

pub use error::SolverError;
pub use instance::TspInstance;
pub use solution::Solution;
