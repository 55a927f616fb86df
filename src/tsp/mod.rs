//! Euclidean travelling salesman problem.
//!
//! [`TspSolver`] runs the multi-population [`Brkga`](crate::brkga::Brkga)
//! with [`TspDecoder`], which turns random keys into a tour anchored at the
//! first point and improves it with 2-opt. Populations can be warm-started
//! with the tours of [`greedy_2approx`] and [`mst_2approx`].
//!
//! # References
//!
//! - Croes (1958), "A Method for Solving Traveling-Salesman Problems"
//! - Rosenkrantz, Stearns & Lewis (1977), "An Analysis of Several Heuristics
//!   for the Traveling Salesman Problem"

mod config;
mod construct;
mod decoder;
mod error;
mod point;
mod solver;

pub use config::SolverConfig;
pub use construct::{greedy_2approx, kruskal, mst_2approx};
pub use decoder::{
    decode_tour, encode, encode_new_chromosome, two_opt, SearchBudget, TspDecoder,
    IMPROVEMENT_EPSILON,
};
pub use error::SolveError;
pub use point::{DistanceMatrix, Edge, Point};
pub use solver::{TspResult, TspSolver};
