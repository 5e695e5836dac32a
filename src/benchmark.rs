//! Benchmarking module for the colony solvers.
//!
//! Provides tools for running repeated experiments, collecting statistics,
//! and comparing the two pheromone-update policies.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::colony::{ColonyConfig, ElitistAntSystem, MaxMinAntSystem};
use crate::error::SolverError;
use crate::instance::TspInstance;
use crate::solution::Solution;

/// Result of a single solver run on an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmResult {
    /// Algorithm name
    pub algorithm: String,
    /// Instance name
    pub instance: String,
    /// Instance dimension
    pub dimension: usize,
    /// Best tour length found
    pub cost: f64,
    /// Computation time in seconds
    pub time: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Seed used for this run
    pub seed: u64,
}

/// Aggregated statistics for an algorithm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    /// Algorithm name
    pub algorithm: String,
    /// Number of runs
    pub num_runs: usize,
    /// Best cost over all runs
    pub best_cost: f64,
    /// Average cost
    pub avg_cost: f64,
    /// Worst cost
    pub worst_cost: f64,
    /// Standard deviation of cost
    pub std_cost: f64,
    /// Average time per run
    pub avg_time: f64,
    /// Total time
    pub total_time: f64,
}

/// Repeated-run comparison of the two solvers on one instance
pub struct Benchmark {
    config: ColonyConfig,
    num_runs: usize,
    results: Vec<AlgorithmResult>,
}

impl Benchmark {
    pub fn new(config: ColonyConfig, num_runs: usize) -> Self {
        Benchmark {
            config,
            num_runs,
            results: Vec::new(),
        }
    }

    /// Run both algorithms `num_runs` times each, with a distinct derived
    /// seed per run
    pub fn run_all(&mut self, instance: &TspInstance) -> Result<(), SolverError> {
        log::info!("Running benchmark on instance: {}", instance.name);

        for run in 0..self.num_runs {
            let seed = self.config.seed.wrapping_add(run as u64);
            let config = ColonyConfig {
                seed,
                ..self.config.clone()
            };

            let mut mmas = MaxMinAntSystem::new(instance.clone(), config.clone())?;
            let solution = mmas.run()?;
            self.record_result(instance, &solution, seed);

            let mut elitist = ElitistAntSystem::new(instance.clone(), config)?;
            let solution = elitist.run()?;
            self.record_result(instance, &solution, seed);
        }

        Ok(())
    }

    /// Record a result
    fn record_result(&mut self, instance: &TspInstance, solution: &Solution, seed: u64) {
        self.results.push(AlgorithmResult {
            algorithm: solution.algorithm.clone(),
            instance: instance.name.clone(),
            dimension: instance.dimension,
            cost: solution.cost,
            time: solution.computation_time,
            iterations: solution.iterations,
            seed,
        });
    }

    pub fn results(&self) -> &[AlgorithmResult] {
        &self.results
    }

    /// Compute statistics for each algorithm
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut stats_map: HashMap<String, Vec<&AlgorithmResult>> = HashMap::new();

        for result in &self.results {
            stats_map
                .entry(result.algorithm.clone())
                .or_insert_with(Vec::new)
                .push(result);
        }

        let mut statistics = Vec::new();

        for (algo, results) in stats_map {
            let costs: Vec<f64> = results.iter().map(|r| r.cost).collect();
            let times: Vec<f64> = results.iter().map(|r| r.time).collect();

            let avg_cost = costs.iter().sum::<f64>() / costs.len() as f64;
            let best_cost = costs.iter().cloned().fold(f64::INFINITY, f64::min);
            let worst_cost = costs.iter().cloned().fold(0.0, f64::max);

            let variance =
                costs.iter().map(|c| (c - avg_cost).powi(2)).sum::<f64>() / costs.len() as f64;
            let std_cost = variance.sqrt();

            let avg_time = times.iter().sum::<f64>() / times.len() as f64;
            let total_time = times.iter().sum::<f64>();

            statistics.push(AlgorithmStatistics {
                algorithm: algo,
                num_runs: results.len(),
                best_cost,
                avg_cost,
                worst_cost,
                std_cost,
                avg_time,
                total_time,
            });
        }

        statistics.sort_by(|a, b| a.avg_cost.partial_cmp(&b.avg_cost).unwrap());

        statistics
    }

    /// Export per-run results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export aggregated statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate a plain-text comparison report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str("========== Benchmark Report ==========\n\n");

        for stat in self.compute_statistics() {
            report.push_str(&format!("{}\n", stat.algorithm));
            report.push_str(&format!("  Runs: {}\n", stat.num_runs));
            report.push_str(&format!("  Best cost: {:.2}\n", stat.best_cost));
            report.push_str(&format!(
                "  Avg cost: {:.2} (std {:.2})\n",
                stat.avg_cost, stat.std_cost
            ));
            report.push_str(&format!("  Worst cost: {:.2}\n", stat.worst_cost));
            report.push_str(&format!("  Avg time: {:.4}s\n\n", stat.avg_time));
        }

        report
    }
}
