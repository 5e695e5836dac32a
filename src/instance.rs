//! Module for parsing and representing TSP instances.
//!
//! This module handles TSP-LIB format files with 2D Euclidean coordinates.
//! It manages city coordinates and the precomputed distance matrix consumed
//! by the colony simulation.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SolverError;

/// Represents a city in the TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    /// City identifier (1-indexed in files, positional 0-indexed internally)
    pub id: usize,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl City {
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        City { id, x, y }
    }
}

/// Represents a complete symmetric TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TspInstance {
    /// Name of the instance
    pub name: String,
    /// Comment/description
    pub comment: String,
    /// Number of cities
    pub dimension: usize,
    /// List of all cities
    pub cities: Vec<City>,
    /// Precomputed distance matrix
    #[serde(skip)]
    pub distance_matrix: Vec<Vec<f64>>,
}

impl TspInstance {
    /// Parse a TSP instance from a TSP-LIB format file.
    ///
    /// Header lines (`NAME`, `COMMENT`, `DIMENSION`, matched case-insensitively)
    /// are stored as metadata. Coordinates are read from `NODE_COORD_SECTION`
    /// until a blank line or `EOF`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SolverError> {
        let file = File::open(&path)
            .map_err(|e| SolverError::InvalidInput(format!("cannot open file: {}", e)))?;
        let reader = BufReader::new(file);

        let mut name = String::new();
        let mut comment = String::new();
        let mut declared_dimension: Option<usize> = None;
        let mut cities: Vec<City> = Vec::new();

        let mut in_coords = false;
        let mut section_found = false;

        for line in reader.lines() {
            let line = line.map_err(|e| SolverError::InvalidInput(format!("read error: {}", e)))?;
            let line = line.trim();

            if in_coords {
                if line.is_empty() || line == "EOF" {
                    break;
                }
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < 3 {
                    continue;
                }
                let id: usize = parts[0].parse().map_err(|_| {
                    SolverError::InvalidInput(format!("invalid city id: {}", parts[0]))
                })?;
                let x: f64 = parts[1].parse().map_err(|_| {
                    SolverError::InvalidInput(format!("invalid x coordinate: {}", parts[1]))
                })?;
                let y: f64 = parts[2].parse().map_err(|_| {
                    SolverError::InvalidInput(format!("invalid y coordinate: {}", parts[2]))
                })?;
                cities.push(City::new(id, x, y));
                continue;
            }

            if line.starts_with("NODE_COORD_SECTION") {
                in_coords = true;
                section_found = true;
                continue;
            }

            if let Some((key, value)) = line.split_once(':') {
                match key.trim().to_lowercase().as_str() {
                    "name" => name = value.trim().to_string(),
                    "comment" => comment = value.trim().to_string(),
                    "dimension" => {
                        declared_dimension = Some(value.trim().parse().map_err(|_| {
                            SolverError::InvalidInput(format!(
                                "invalid dimension: {}",
                                value.trim()
                            ))
                        })?);
                    }
                    _ => {}
                }
            }
        }

        if !section_found {
            return Err(SolverError::InvalidInput(
                "missing NODE_COORD_SECTION marker".to_string(),
            ));
        }

        if let Some(dim) = declared_dimension {
            if dim != cities.len() {
                log::warn!(
                    "declared dimension {} does not match {} parsed cities",
                    dim,
                    cities.len()
                );
            }
        }

        Self::from_cities(name, comment, cities)
    }

    /// Build an instance from an already-parsed city list.
    ///
    /// Rejects instances with fewer than 2 cities or non-finite coordinates
    /// before any matrix work.
    pub fn from_cities(
        name: String,
        comment: String,
        cities: Vec<City>,
    ) -> Result<Self, SolverError> {
        if cities.len() < 2 {
            return Err(SolverError::InvalidInput(format!(
                "need at least 2 cities, got {}",
                cities.len()
            )));
        }
        for city in &cities {
            if !city.x.is_finite() || !city.y.is_finite() {
                return Err(SolverError::InvalidInput(format!(
                    "city {} has non-finite coordinates ({}, {})",
                    city.id, city.x, city.y
                )));
            }
        }

        let distance_matrix = Self::compute_distance_matrix(&cities);
        let dimension = cities.len();

        Ok(TspInstance {
            name,
            comment,
            dimension,
            cities,
            distance_matrix,
        })
    }

    /// Compute the Euclidean distance matrix, one evaluation per unordered pair
    fn compute_distance_matrix(cities: &[City]) -> Vec<Vec<f64>> {
        let n = cities.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in i + 1..n {
                let dx = cities[i].x - cities[j].x;
                let dy = cities[i].y - cities[j].y;
                let dist = (dx * dx + dy * dy).sqrt();
                matrix[i][j] = dist;
                matrix[j][i] = dist;
            }
        }

        matrix
    }

    /// Get the distance between two cities
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distance_matrix[i][j]
    }

    /// Mean over all matrix entries, diagonal included
    pub fn mean_distance(&self) -> f64 {
        let n = self.dimension;
        let total: f64 = self.distance_matrix.iter().flatten().sum();
        total / (n * n) as f64
    }

    /// Calculate total tour length, including the closing edge back to the start
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        if tour.len() < 2 {
            return 0.0;
        }

        let mut length = 0.0;
        for i in 0..tour.len() - 1 {
            length += self.distance(tour[i], tour[i + 1]);
        }

        length += self.distance(tour[tour.len() - 1], tour[0]);

        length
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let mut distances: Vec<f64> = Vec::new();
        for i in 0..self.dimension {
            for j in i + 1..self.dimension {
                distances.push(self.distance(i, j));
            }
        }
        let avg_distance = distances.iter().sum::<f64>() / distances.len() as f64;
        let max_distance = distances.iter().cloned().fold(0.0, f64::max);
        let min_distance = distances.iter().cloned().fold(f64::INFINITY, f64::min);

        InstanceStatistics {
            name: self.name.clone(),
            dimension: self.dimension,
            avg_distance,
            min_distance,
            max_distance,
        }
    }
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub avg_distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Cities: {}", self.dimension)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Min distance: {:.2}", self.min_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}
