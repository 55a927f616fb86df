//! BRKGA error types.

use thiserror::Error;

/// Errors raised by [`Population`](super::Population) and
/// [`Brkga`](super::Brkga).
///
/// Every variant is a caller-input error. They are detected before any
/// population is allocated or mutated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BrkgaError {
    #[error("chromosome length must be positive")]
    NonPositiveChromosomeLength,

    #[error("population size must be positive")]
    NonPositivePopulationSize,

    #[error("elite-set size must be positive (floor({fraction} * {population_size}) = 0)")]
    EmptyEliteSet { fraction: f64, population_size: usize },

    #[error("elite-set size {elite} greater than population size {population_size}")]
    EliteExceedsPopulation { elite: usize, population_size: usize },

    #[error("mutant fraction must not be negative, got {0}")]
    NegativeMutantSet(f64),

    #[error("mutant-set size {mutants} greater than population size {population_size}")]
    MutantExceedsPopulation {
        mutants: usize,
        population_size: usize,
    },

    #[error("elite ({elite}) + mutant ({mutants}) sets greater than population size {population_size}")]
    EliteAndMutantExceedPopulation {
        elite: usize,
        mutants: usize,
        population_size: usize,
    },

    #[error("number of parallel populations must be positive")]
    NoPopulations,

    #[error("cannot evolve for 0 generations")]
    NonPositiveGenerations,

    #[error("exchange size must be in 1..{population_size}, got {size}")]
    InvalidExchangeSize { size: usize, population_size: usize },

    #[error("exchanging {size} elites from each of {sources} populations overflows population size {population_size}")]
    ExchangeOverflow {
        size: usize,
        sources: usize,
        population_size: usize,
    },

    #[error("invalid population index {index} (have {count})")]
    InvalidPopulationIndex { index: usize, count: usize },

    #[error("wrong chromosome size: expected {expected}, got {actual}")]
    ChromosomeLengthMismatch { expected: usize, actual: usize },

    #[error("cannot inject {count} chromosomes into a population of {population_size}")]
    TooManyChromosomes { count: usize, population_size: usize },

    #[error("invalid individual rank {rank} (population size {population_size})")]
    RankOutOfRange { rank: usize, population_size: usize },
}
