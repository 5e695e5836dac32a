//! Probabilistic tour construction for a single ant.
//!
//! Each step weighs every unvisited city by pheromone strength and inverse
//! distance, then samples the next city by roulette wheel. The RNG is passed
//! in explicitly so runs are reproducible from a seed.

use rand::Rng;

use crate::colony::PheromoneMatrix;
use crate::instance::TspInstance;

/// Build one complete tour and return it with its total length.
///
/// The returned tour is always a permutation of all cities; the closing edge
/// back to the start is included in the length.
pub fn construct_tour<R: Rng>(
    instance: &TspInstance,
    pheromone: &PheromoneMatrix,
    alpha: f64,
    beta: f64,
    rng: &mut R,
) -> (Vec<usize>, f64) {
    let n = instance.dimension;
    let start = rng.gen_range(0..n);

    let mut tour = Vec::with_capacity(n);
    tour.push(start);
    let mut visited = vec![false; n];
    visited[start] = true;

    let mut current = start;
    let mut length = 0.0;

    while tour.len() < n {
        let next = select_next_city(instance, pheromone, alpha, beta, current, &visited, rng);
        length += instance.distance(current, next);
        visited[next] = true;
        tour.push(next);
        current = next;
    }

    length += instance.distance(current, start);

    (tour, length)
}

/// Select the next city among the unvisited ones.
///
/// Cities at zero distance get zero weight; if every candidate weighs zero
/// the choice falls back to uniform random so construction always completes.
fn select_next_city<R: Rng>(
    instance: &TspInstance,
    pheromone: &PheromoneMatrix,
    alpha: f64,
    beta: f64,
    current: usize,
    visited: &[bool],
    rng: &mut R,
) -> usize {
    let n = instance.dimension;

    let mut candidates: Vec<(usize, f64)> = Vec::new();
    for j in 0..n {
        if visited[j] {
            continue;
        }

        let dist = instance.distance(current, j);
        let weight = if dist > 0.0 {
            let tau = pheromone.get(current, j).powf(alpha);
            let eta = (1.0 / dist).powf(beta);
            tau * eta
        } else {
            0.0
        };
        candidates.push((j, weight));
    }

    let total: f64 = candidates.iter().map(|&(_, w)| w).sum();
    if total <= 0.0 {
        // Degenerate case, e.g. coincident cities
        let (j, _) = candidates[rng.gen_range(0..candidates.len())];
        return j;
    }

    // Roulette wheel
    let mut pick = rng.gen::<f64>() * total;
    for &(j, weight) in &candidates {
        pick -= weight;
        if pick <= 0.0 {
            return j;
        }
    }

    // Rounding can leave a sliver past the last candidate
    candidates[candidates.len() - 1].0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::City;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn instance_from_coords(coords: &[(f64, f64)]) -> TspInstance {
        let cities = coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| City::new(i + 1, x, y))
            .collect();
        TspInstance::from_cities("test".to_string(), String::new(), cities).unwrap()
    }

    fn assert_permutation(tour: &[usize], n: usize) {
        assert_eq!(tour.len(), n);
        let mut seen = vec![false; n];
        for &city in tour {
            assert!(!seen[city], "city {} visited twice", city);
            seen[city] = true;
        }
    }

    #[test]
    fn test_tour_is_permutation() {
        let instance = instance_from_coords(&[
            (0.0, 0.0),
            (2.0, 1.0),
            (5.0, 3.0),
            (1.0, 4.0),
            (3.0, 3.0),
            (4.0, 0.0),
        ]);
        let pheromone = PheromoneMatrix::new(instance.dimension);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..50 {
            let (tour, length) = construct_tour(&instance, &pheromone, 1.0, 2.5, &mut rng);
            assert_permutation(&tour, instance.dimension);
            assert!(length.is_finite() && length > 0.0);
        }
    }

    #[test]
    fn test_two_cities_there_and_back() {
        let instance = instance_from_coords(&[(0.0, 0.0), (3.0, 4.0)]);
        let pheromone = PheromoneMatrix::new(2);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for _ in 0..10 {
            let (tour, length) = construct_tour(&instance, &pheromone, 1.0, 2.5, &mut rng);
            assert_permutation(&tour, 2);
            assert_eq!(length, 2.0 * instance.distance(0, 1));
        }
    }

    #[test]
    fn test_coincident_cities_fall_back_to_uniform() {
        let instance = instance_from_coords(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]);
        let pheromone = PheromoneMatrix::new(4);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let (tour, length) = construct_tour(&instance, &pheromone, 1.0, 2.5, &mut rng);
        assert_permutation(&tour, 4);
        assert_eq!(length, 0.0);
    }
}
