//! End-to-end TSP solve: warm start, generation loop, result assembly.

use super::config::SolverConfig;
use super::construct::{greedy_2approx, mst_2approx};
use super::decoder::{encode_new_chromosome, TspDecoder};
use super::error::SolveError;
use super::point::Point;
use crate::brkga::Brkga;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Result of a solve.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TspResult {
    /// Length of the best tour found.
    pub best_cost: f64,

    /// Best tour as a closed loop: starts and ends at the anchor point.
    pub tour: Vec<Point>,

    /// Wall-clock time of the solve, in seconds.
    pub elapsed_secs: f64,

    /// Number of generations executed.
    pub generations: usize,

    /// Whether the run was stopped by the cancellation flag.
    pub cancelled: bool,

    /// Best cost at the end of each generation.
    pub cost_history: Vec<f64>,
}

/// Euclidean TSP solver.
///
/// The first point is the tour anchor. Tours are encoded as random keys
/// over the remaining points and evolved by a multi-population BRKGA whose
/// decoder runs 2-opt on every evaluation.
///
/// # Examples
///
/// ```
/// use u_tsp::tsp::{Point, SolverConfig, TspSolver};
///
/// let points = vec![
///     Point::new(1, 0.0, 0.0),
///     Point::new(2, 0.0, 1.0),
///     Point::new(3, 1.0, 1.0),
///     Point::new(4, 1.0, 0.0),
/// ];
/// let config = SolverConfig::default()
///     .with_population_size(20)
///     .with_max_generations(50)
///     .with_seed(42);
///
/// let result = TspSolver::solve(&points, &config).unwrap();
/// assert!((result.best_cost - 4.0).abs() < 1e-9);
/// assert_eq!(result.tour.len(), 5);
/// assert_eq!(result.tour.first(), result.tour.last());
/// ```
pub struct TspSolver;

impl TspSolver {
    /// Solves the instance until a limit in `config` is reached.
    pub fn solve(points: &[Point], config: &SolverConfig) -> Result<TspResult, SolveError> {
        Self::solve_with_cancel(points, config, None)
    }

    /// Solves with an optional cancellation flag.
    ///
    /// The flag is checked before every generation and before every 2-opt
    /// pass. A cancelled solve still returns the best tour found so far.
    ///
    /// # Errors
    /// [`SolveError::TooFewPoints`] for fewer than 2 points, otherwise any
    /// [`SolverConfig::validate`] failure. Nothing is computed on error.
    pub fn solve_with_cancel(
        points: &[Point],
        config: &SolverConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<TspResult, SolveError> {
        if points.len() < 2 {
            return Err(SolveError::TooFewPoints(points.len()));
        }
        config.validate()?;

        let start = Instant::now();
        let seed = config.seed.unwrap_or_else(rand::random);

        let mut decoder = TspDecoder::new(points.to_vec(), config.max_local_search_improvements);
        let deadline = Duration::try_from_secs_f64(config.time_limit_secs)
            .ok()
            .filter(|limit| !limit.is_zero())
            .and_then(|limit| start.checked_add(limit));
        if let Some(deadline) = deadline {
            decoder = decoder.with_deadline(deadline);
        }
        if let Some(flag) = &cancel {
            decoder = decoder.with_cancel(Arc::clone(flag));
        }

        let brkga_config = config.to_brkga_config(points.len()).with_seed(seed);
        let mut engine = Brkga::new(&brkga_config, &decoder)?;

        info!(
            "tsp: solving {} points, K={} p={} time_limit={}s max_generations={}",
            points.len(),
            engine.k(),
            engine.p(),
            config.time_limit_secs,
            config.max_generations
        );

        if config.warm_start {
            Self::warm_start(&mut engine, seed)?;
        }

        let mut generations = 0;
        let mut cancelled = false;
        let mut cost_history = Vec::new();

        loop {
            if cancel.as_ref().is_some_and(|c| c.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }
            if config.is_finished(start.elapsed().as_secs_f64(), generations) {
                break;
            }

            engine.evolve(1)?;
            generations += 1;

            if config.exchanges() && generations % config.exchange_interval == 0 {
                engine.exchange_elite(config.exchange_size)?;
            }
            cost_history.push(engine.best_fitness());
        }

        let best_cost = engine.best_fitness();
        let mut tour = engine.best_solution();
        if let Some(&anchor) = tour.first() {
            tour.push(anchor);
        }
        let elapsed_secs = start.elapsed().as_secs_f64();

        info!(
            "tsp: best={:.6} after {} generations in {:.3}s{}",
            best_cost,
            generations,
            elapsed_secs,
            if cancelled { " (cancelled)" } else { "" }
        );

        Ok(TspResult {
            best_cost,
            tour,
            elapsed_secs,
            generations,
            cancelled,
            cost_history,
        })
    }

    /// Injects the greedy and MST tours into every population.
    fn warm_start(engine: &mut Brkga<'_, TspDecoder>, seed: u64) -> Result<(), SolveError> {
        let decoder = engine.decoder();
        let dist = decoder.distances();
        let n = dist.len();
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));

        let greedy = greedy_2approx(dist);
        let mst = mst_2approx(n, &mut dist.edges());
        debug!(
            "tsp: warm start greedy={:.6} mst={:.6}",
            dist.cycle_cost(&greedy),
            dist.cycle_cost(&mst)
        );

        let mut seeds = vec![
            encode_new_chromosome(&greedy, &mut rng),
            encode_new_chromosome(&mst, &mut rng),
        ];
        seeds.truncate(engine.p());

        for k in 0..engine.k() {
            engine.inject_chromosomes(&seeds, k)?;
        }
        Ok(())
    }
}
