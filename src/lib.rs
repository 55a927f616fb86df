//! Heuristic solver for the Euclidean travelling salesman problem.
//!
//! - **BRKGA**: multi-population Biased Random-Key Genetic Algorithm with
//!   elite exchange and chromosome injection. Generic over a decoder, so
//!   it knows nothing about tours.
//! - **TSP**: random-key decoder with 2-opt local search, greedy and MST
//!   2-approximation tours for warm starts, and the [`TspSolver`] driver.
//! - **Union-find**: disjoint-set forest backing Kruskal's algorithm.
//!
//! # Example
//!
//! ```
//! use u_tsp::tsp::{Point, SolverConfig, TspSolver};
//!
//! let points: Vec<Point> = (0..12)
//!     .map(|i| {
//!         let angle = i as f64 * std::f64::consts::TAU / 12.0;
//!         Point::new(i, angle.cos(), angle.sin())
//!     })
//!     .collect();
//!
//! let config = SolverConfig::default()
//!     .with_population_size(30)
//!     .with_max_generations(30)
//!     .with_seed(1);
//! let result = TspSolver::solve(&points, &config).unwrap();
//!
//! // the convex polygon is optimal
//! let perimeter = 12.0 * 2.0 * (std::f64::consts::PI / 12.0).sin();
//! assert!((result.best_cost - perimeter).abs() < 1e-9);
//! ```
//!
//! # Features
//!
//! - `parallel`: evolve populations on the rayon thread pool.
//! - `serde`: serialization of points, configurations and results.
//! - `wasm`: `solveTsp` JavaScript binding.
//!
//! [`TspSolver`]: tsp::TspSolver

pub mod brkga;
pub mod tsp;
pub mod union_find;

#[cfg(feature = "wasm")]
pub mod wasm;
