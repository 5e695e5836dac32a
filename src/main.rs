//! ACO TSP Solver - Command Line Interface
//!
//! An Ant Colony Optimization solver for the symmetric Euclidean TSP.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use aco_tsp_solver::benchmark::Benchmark;
use aco_tsp_solver::colony::{ColonyConfig, ElitistAntSystem, MaxMinAntSystem};
use aco_tsp_solver::instance::TspInstance;
use aco_tsp_solver::solution::Solution;

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aco-tsp-solver")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "An Ant Colony Optimization solver for the symmetric Euclidean TSP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an instance
    Solve {
        /// Path to the TSP-LIB instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Algorithm to use
        #[arg(short, long, value_enum, default_value = "mmas")]
        algorithm: Algorithm,

        /// Number of ants per iteration
        #[arg(long, default_value = "20")]
        ants: usize,

        /// Number of iterations
        #[arg(long, default_value = "200")]
        iterations: usize,

        /// Pheromone importance
        #[arg(long, default_value = "1.0")]
        alpha: f64,

        /// Heuristic importance
        #[arg(long, default_value = "2.5")]
        beta: f64,

        /// Evaporation rate in [0, 1]
        #[arg(long, default_value = "0.1")]
        evaporation_rate: f64,

        /// Fraction of top ants that deposit (elitist only)
        #[arg(long, default_value = "0.25")]
        elite_fraction: f64,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output solution to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,
    },

    /// Compare both algorithms on an instance
    Compare {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Number of runs per algorithm
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Output CSV file for per-run results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Algorithm {
    /// Max-Min Ant System
    Mmas,
    /// Rank-based elitist ant system
    Elitist,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            instance,
            algorithm,
            ants,
            iterations,
            alpha,
            beta,
            evaporation_rate,
            elite_fraction,
            seed,
            output,
            verbose,
        } => {
            let config = ColonyConfig {
                num_ants: ants,
                max_iterations: iterations,
                alpha,
                beta,
                evaporation_rate,
                elite_fraction,
                seed,
            };
            solve_instance(&instance, algorithm, config, output, verbose);
        }

        Commands::Analyze { instance } => {
            analyze_instance(&instance);
        }

        Commands::Compare {
            instance,
            runs,
            output,
        } => {
            compare_algorithms(&instance, runs, output);
        }
    }
}

fn load_instance(path: &PathBuf) -> TspInstance {
    match TspInstance::from_file(path) {
        Ok(inst) => inst,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    }
}

/// Solution as written to the JSON output file, with the file's 1-based ids
#[derive(Serialize)]
struct SolutionReport {
    #[serde(flatten)]
    solution: Solution,
    city_ids: Vec<usize>,
}

fn solve_instance(
    path: &PathBuf,
    algorithm: Algorithm,
    config: ColonyConfig,
    output: Option<PathBuf>,
    verbose: bool,
) {
    println!("Loading instance from {:?}...", path);
    let instance = load_instance(path);

    if !instance.name.is_empty() {
        println!("NAME : {}", instance.name);
    }
    if !instance.comment.is_empty() {
        println!("COMMENT : {}", instance.comment);
    }
    println!("DIMENSION : {}", instance.dimension);

    if verbose {
        println!("{}", instance.statistics());
    }

    println!("Solving with {:?} algorithm...", algorithm);

    let result = match algorithm {
        Algorithm::Mmas => {
            MaxMinAntSystem::new(instance.clone(), config).and_then(|mut solver| solver.run())
        }
        Algorithm::Elitist => {
            ElitistAntSystem::new(instance.clone(), config).and_then(|mut solver| solver.run())
        }
    };

    let solution = match result {
        Ok(sol) => sol,
        Err(e) => {
            eprintln!("Solver error: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n========== Results ==========");
    println!("Algorithm: {}", solution.algorithm);
    println!("Best tour: {:?}", solution.city_ids(&instance));
    println!("Best distance: {:.2}", solution.cost);
    println!("Time: {:.4}s", solution.computation_time);
    println!("Iterations: {}", solution.iterations);

    if let Some(out_path) = output {
        let report = SolutionReport {
            city_ids: solution.city_ids(&instance),
            solution,
        };
        let json = serde_json::to_string_pretty(&report).unwrap();
        if let Err(e) = std::fs::write(&out_path, json) {
            eprintln!("Failed to write output: {}", e);
            std::process::exit(1);
        }
        println!("\nSolution saved to {:?}", out_path);
    }
}

fn analyze_instance(path: &PathBuf) {
    let instance = load_instance(path);

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());
}

fn compare_algorithms(path: &PathBuf, runs: usize, output: Option<PathBuf>) {
    let instance = load_instance(path);

    let config = ColonyConfig::default();
    let mut benchmark = Benchmark::new(config, runs);

    if let Err(e) = benchmark.run_all(&instance) {
        eprintln!("Benchmark error: {}", e);
        std::process::exit(1);
    }

    println!("{}", benchmark.generate_report());

    if let Some(out_path) = output {
        if let Err(e) = benchmark.export_to_csv(&out_path) {
            eprintln!("Failed to export results: {}", e);
            std::process::exit(1);
        }
        println!("Results exported to {:?}", out_path);
    }
}
