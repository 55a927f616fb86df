//! Solver error types.

use crate::brkga::BrkgaError;
use thiserror::Error;

/// Errors returned by [`TspSolver`](super::TspSolver).
///
/// All of them are raised before the engine is built; a failed solve
/// produces no partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("at least 2 points are required, got {0}")]
    TooFewPoints(usize),

    #[error("time limit must be a finite, non-negative number of seconds, got {0}")]
    InvalidTimeLimit(f64),

    #[error("either a time limit or a generation limit must be set")]
    NoTerminationCriterion,

    #[error("elite fraction must be in (0, 1], got {0}")]
    InvalidEliteFraction(f64),

    #[error("mutant fraction must be in [0, 1), got {0}")]
    InvalidMutantFraction(f64),

    #[error("elite fraction {elite} plus mutant fraction {mutant} exceeds 1")]
    FractionsExceedOne { elite: f64, mutant: f64 },

    #[error("elite inheritance probability must be in (0, 1), got {0}")]
    InvalidInheritanceProb(f64),

    #[error(transparent)]
    Brkga(#[from] BrkgaError),
}
