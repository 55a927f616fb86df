//! Random-key TSP decoder with 2-opt local search.
//!
//! A chromosome of `n - 1` keys encodes a tour that starts at point 0:
//! point `i + 1` is visited in the position of key `i` in ascending key
//! order. [`TspDecoder::decode`] improves that tour with a budgeted,
//! randomized, first-improvement 2-opt and then **re-encodes the improved
//! tour into the chromosome**, so the population keeps what the local
//! search found.

use super::point::{DistanceMatrix, Point};
use crate::brkga::BrkgaDecoder;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A 2-opt move is applied only if it shortens the tour by more than this.
pub const IMPROVEMENT_EPSILON: f64 = 1e-10;

/// Limits for one 2-opt run.
///
/// The deadline and the cancellation flag are checked once per full scan,
/// never in the middle of one.
#[derive(Debug, Clone, Default)]
pub struct SearchBudget {
    /// Maximum number of improving moves (0 disables the search).
    pub max_improvements: usize,

    /// Wall-clock instant after which no new scan starts.
    pub deadline: Option<Instant>,

    /// External abort signal.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SearchBudget {
    pub fn new(max_improvements: usize) -> Self {
        Self {
            max_improvements,
            deadline: None,
            cancel: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// `true` once the deadline has passed or cancellation was requested.
    pub fn is_exhausted(&self) -> bool {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return true;
            }
        }
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Randomized first-improvement 2-opt on a closed tour, in place.
///
/// Each pass shuffles the tour positions and scans position pairs in
/// shuffled order. The first pair whose edge exchange shortens the tour by
/// more than [`IMPROVEMENT_EPSILON`] is applied and the pass restarts with a
/// new shuffle. Stops after a pass without improvement, after
/// `budget.max_improvements` moves, or when the budget is exhausted.
///
/// The tour may no longer start with the same point afterwards.
/// Returns the number of moves applied.
pub fn two_opt<R: Rng + ?Sized>(
    cycle: &mut [usize],
    dist: &DistanceMatrix,
    budget: &SearchBudget,
    rng: &mut R,
) -> usize {
    let len = cycle.len();
    let mut indexes: Vec<usize> = (0..len).collect();
    let mut improvements = 0;
    let mut found = true;

    while found && improvements < budget.max_improvements && !budget.is_exhausted() {
        found = false;
        indexes.shuffle(rng);

        'scan: for (pos, &a) in indexes.iter().enumerate() {
            let a_next = (a + 1) % len;
            for &b in &indexes[pos + 1..] {
                let b_next = (b + 1) % len;
                let delta = dist.get(cycle[a], cycle[b]) + dist.get(cycle[a_next], cycle[b_next])
                    - dist.get(cycle[a], cycle[a_next])
                    - dist.get(cycle[b], cycle[b_next]);

                if delta < -IMPROVEMENT_EPSILON {
                    if a_next < b {
                        cycle[a_next..=b].reverse();
                    } else {
                        cycle[b_next..=a].reverse();
                    }
                    improvements += 1;
                    found = true;
                    break 'scan;
                }
            }
        }
    }
    improvements
}

/// Tour encoded by `chromosome`: point 0, then points `1..=n` ordered by
/// ascending key. Equal keys keep their position order.
pub fn decode_tour(chromosome: &[f64]) -> Vec<usize> {
    let mut keyed: Vec<(f64, usize)> = chromosome
        .iter()
        .enumerate()
        .map(|(i, &key)| (key, i + 1))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    std::iter::once(0)
        .chain(keyed.into_iter().map(|(_, point)| point))
        .collect()
}

/// Rewrites `chromosome` so that [`decode_tour`] yields `cycle`.
///
/// `cycle` is first rotated in place until point 0 leads. The chromosome's
/// existing keys are reused: the i-th smallest key goes to the i-th point
/// after 0.
///
/// `cycle` must be a permutation of `0..=chromosome.len()`.
pub fn encode(cycle: &mut [usize], chromosome: &mut [f64]) {
    debug_assert_eq!(cycle.len(), chromosome.len() + 1);

    if let Some(anchor) = cycle.iter().position(|&point| point == 0) {
        cycle.rotate_left(anchor);
    }

    chromosome.sort_by(f64::total_cmp);
    let sorted = chromosome.to_vec();
    for (&key, &point) in sorted.iter().zip(&cycle[1..]) {
        chromosome[point - 1] = key;
    }
}

/// Fresh random chromosome that decodes to `cycle` (up to rotation).
pub fn encode_new_chromosome<R: Rng + ?Sized>(cycle: &[usize], rng: &mut R) -> Vec<f64> {
    let mut chromosome: Vec<f64> = (0..cycle.len().saturating_sub(1))
        .map(|_| rng.random_range(0.0..1.0))
        .collect();
    let mut cycle = cycle.to_vec();
    encode(&mut cycle, &mut chromosome);
    chromosome
}

/// BRKGA decoder for the Euclidean TSP.
///
/// Point 0 is the fixed tour anchor; chromosomes have `points.len() - 1`
/// keys.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_tsp::brkga::BrkgaDecoder;
/// use u_tsp::tsp::{Point, TspDecoder};
///
/// let points = vec![
///     Point::new(0, 0.0, 0.0),
///     Point::new(1, 0.0, 1.0),
///     Point::new(2, 1.0, 1.0),
///     Point::new(3, 1.0, 0.0),
/// ];
/// let decoder = TspDecoder::new(points, 100);
/// let mut rng = StdRng::seed_from_u64(1);
///
/// // visits 0, 2, 1, 3: two crossing diagonals
/// let mut keys = vec![0.5, 0.1, 0.9];
/// let cost = decoder.decode(&mut keys, &mut rng);
///
/// assert!((cost - 4.0).abs() < 1e-9);
/// let tour: Vec<u64> = decoder.solution(&keys).iter().map(|p| p.id).collect();
/// assert!(tour == [0, 1, 2, 3] || tour == [0, 3, 2, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct TspDecoder {
    points: Vec<Point>,
    distances: DistanceMatrix,
    budget: SearchBudget,
}

impl TspDecoder {
    /// Creates a decoder over `points`, allowing at most `max_improvements`
    /// 2-opt moves per decode.
    pub fn new(points: Vec<Point>, max_improvements: usize) -> Self {
        let distances = DistanceMatrix::from_points(&points);
        Self {
            points,
            distances,
            budget: SearchBudget::new(max_improvements),
        }
    }

    /// Stops starting new 2-opt scans after `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.budget.deadline = Some(deadline);
        self
    }

    /// Stops starting new 2-opt scans once `cancel` is set.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.budget.cancel = Some(cancel);
        self
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    pub fn budget(&self) -> &SearchBudget {
        &self.budget
    }

    /// Number of keys per chromosome.
    pub fn chromosome_len(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

impl BrkgaDecoder for TspDecoder {
    type Solution = Vec<Point>;

    /// Decodes, runs 2-opt, re-encodes the improved tour into `keys` and
    /// returns the length of the tour `keys` now encodes.
    fn decode<R: Rng>(&self, keys: &mut [f64], rng: &mut R) -> f64 {
        let mut cycle = decode_tour(keys);
        two_opt(&mut cycle, &self.distances, &self.budget, rng);
        encode(&mut cycle, keys);
        // Crossover can copy one key into two genes. Tied keys decode in
        // position order, which may not be the order encode gave them.
        self.distances.cycle_cost(&decode_tour(keys))
    }

    /// Points in the order encoded by `keys`, starting at point 0. No local
    /// search is run.
    fn solution(&self, keys: &[f64]) -> Vec<Point> {
        decode_tour(keys)
            .into_iter()
            .map(|i| self.points[i])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tsp::point::tests::unit_square;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn is_permutation(cycle: &[usize]) -> bool {
        let mut seen = vec![false; cycle.len()];
        for &c in cycle {
            if c >= cycle.len() || seen[c] {
                return false;
            }
            seen[c] = true;
        }
        true
    }

    fn random_points(n: usize, seed: u64) -> Vec<Point> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|i| Point::new(i as u64, rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect()
    }

    #[test]
    fn test_decode_tour_sorts_keys() {
        assert_eq!(decode_tour(&[0.3, 0.1, 0.2]), vec![0, 2, 3, 1]);
        assert_eq!(decode_tour(&[]), vec![0]);
    }

    #[test]
    fn test_decode_tour_ties_keep_position_order() {
        assert_eq!(decode_tour(&[0.5, 0.5, 0.1]), vec![0, 3, 1, 2]);
    }

    #[test]
    fn test_encode_rotates_and_round_trips() {
        let mut cycle = vec![2, 0, 3, 1];
        let mut chromosome = vec![0.7, 0.2, 0.4];
        encode(&mut cycle, &mut chromosome);

        assert_eq!(cycle, vec![0, 3, 1, 2]);
        assert_eq!(decode_tour(&chromosome), cycle);

        let mut keys = chromosome.clone();
        keys.sort_by(f64::total_cmp);
        assert_eq!(keys, vec![0.2, 0.4, 0.7]);
    }

    #[test]
    fn test_encode_new_chromosome() {
        let mut rng = StdRng::seed_from_u64(3);
        let chromosome = encode_new_chromosome(&[0, 4, 2, 1, 3], &mut rng);
        assert_eq!(chromosome.len(), 4);
        assert!(chromosome.iter().all(|k| (0.0..1.0).contains(k)));
        assert_eq!(decode_tour(&chromosome), vec![0, 4, 2, 1, 3]);
    }

    #[test]
    fn test_two_opt_uncrosses_square() {
        let dm = DistanceMatrix::from_points(&unit_square());
        let mut cycle = vec![0, 2, 1, 3];
        let mut rng = StdRng::seed_from_u64(1);

        let moves = two_opt(&mut cycle, &dm, &SearchBudget::new(10), &mut rng);

        assert!(moves >= 1);
        assert!(is_permutation(&cycle));
        assert!((dm.cycle_cost(&cycle) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_two_opt_zero_budget_is_noop() {
        let dm = DistanceMatrix::from_points(&unit_square());
        let mut cycle = vec![0, 2, 1, 3];
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(two_opt(&mut cycle, &dm, &SearchBudget::new(0), &mut rng), 0);
        assert_eq!(cycle, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_two_opt_respects_move_cap() {
        let points = random_points(40, 9);
        let dm = DistanceMatrix::from_points(&points);
        let mut cycle: Vec<usize> = (0..40).collect();
        let mut rng = StdRng::seed_from_u64(2);
        let moves = two_opt(&mut cycle, &dm, &SearchBudget::new(3), &mut rng);
        assert!(moves <= 3);
    }

    #[test]
    fn test_two_opt_expired_deadline_is_noop() {
        let dm = DistanceMatrix::from_points(&unit_square());
        let mut cycle = vec![0, 2, 1, 3];
        let mut rng = StdRng::seed_from_u64(1);
        let budget = SearchBudget::new(10).with_deadline(Instant::now() - Duration::from_millis(1));
        assert!(budget.is_exhausted());
        assert_eq!(two_opt(&mut cycle, &dm, &budget, &mut rng), 0);
        assert_eq!(cycle, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_two_opt_cancelled_is_noop() {
        let dm = DistanceMatrix::from_points(&unit_square());
        let mut cycle = vec![0, 2, 1, 3];
        let mut rng = StdRng::seed_from_u64(1);
        let budget = SearchBudget::new(10).with_cancel(Arc::new(AtomicBool::new(true)));
        assert_eq!(two_opt(&mut cycle, &dm, &budget, &mut rng), 0);
    }

    #[test]
    fn test_two_opt_tiny_tours() {
        let points = random_points(2, 4);
        let dm = DistanceMatrix::from_points(&points);
        let mut rng = StdRng::seed_from_u64(4);

        let mut cycle = vec![0, 1];
        assert_eq!(two_opt(&mut cycle, &dm, &SearchBudget::new(5), &mut rng), 0);
        let mut single = vec![0];
        assert_eq!(two_opt(&mut single, &dm, &SearchBudget::new(5), &mut rng), 0);
    }

    #[test]
    fn test_decode_rewrites_chromosome() {
        let decoder = TspDecoder::new(random_points(30, 5), 1000);
        let mut rng = StdRng::seed_from_u64(5);
        let mut keys: Vec<f64> = (0..29).map(|_| rng.random_range(0.0..1.0)).collect();

        let before = decoder.distances().cycle_cost(&decode_tour(&keys));
        let mut original = keys.clone();
        let cost = decoder.decode(&mut keys, &mut rng);

        assert!(cost <= before + 1e-9);
        let tour = decode_tour(&keys);
        assert_eq!(tour[0], 0);
        assert!(is_permutation(&tour));
        assert!((decoder.distances().cycle_cost(&tour) - cost).abs() < 1e-9);

        // same key multiset, new assignment
        let mut after = keys.clone();
        original.sort_by(f64::total_cmp);
        after.sort_by(f64::total_cmp);
        assert_eq!(original, after);
    }

    #[test]
    fn test_solution_does_not_mutate() {
        let decoder = TspDecoder::new(unit_square(), 10);
        let keys = vec![0.5, 0.1, 0.9];
        let ids: Vec<u64> = decoder.solution(&keys).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10, 12, 11, 13]);
        assert_eq!(keys, vec![0.5, 0.1, 0.9]);
        assert_eq!(decoder.chromosome_len(), 3);
    }

    fn cycle_and_keys() -> impl Strategy<Value = (Vec<usize>, Vec<f64>)> {
        (2usize..25).prop_flat_map(|n| {
            (
                Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
                prop::collection::vec(0.0f64..1.0, n - 1),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_encode_decode_round_trip((cycle, keys) in cycle_and_keys()) {
            let mut sorted = keys.clone();
            sorted.sort_by(f64::total_cmp);
            prop_assume!(sorted.windows(2).all(|w| w[0] < w[1]));

            let points = random_points(cycle.len(), 11);
            let dm = DistanceMatrix::from_points(&points);
            let cost = dm.cycle_cost(&cycle);

            let mut rotated = cycle.clone();
            let mut chromosome = keys;
            encode(&mut rotated, &mut chromosome);
            let decoded = decode_tour(&chromosome);

            prop_assert_eq!(&decoded, &rotated);
            prop_assert_eq!(decoded[0], 0);
            let anchor = cycle.iter().position(|&c| c == 0).unwrap();
            let mut expected = cycle.clone();
            expected.rotate_left(anchor);
            prop_assert_eq!(&decoded, &expected);
            prop_assert!((dm.cycle_cost(&decoded) - cost).abs() < 1e-9);
        }

        #[test]
        fn prop_two_opt_never_worsens(n in 3usize..40, seed in any::<u64>()) {
            let dm = DistanceMatrix::from_points(&random_points(n, seed));
            let mut rng = StdRng::seed_from_u64(seed);
            let mut cycle: Vec<usize> = (0..n).collect();
            cycle.shuffle(&mut rng);
            let before = dm.cycle_cost(&cycle);

            two_opt(&mut cycle, &dm, &SearchBudget::new(usize::MAX), &mut rng);

            prop_assert!(is_permutation(&cycle));
            prop_assert!(dm.cycle_cost(&cycle) <= before + 1e-9);
        }
    }
}
