//! BRKGA configuration.

use super::error::BrkgaError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the BRKGA engine.
///
/// # Parameters
///
/// The elite and mutant set sizes are `floor(fraction * population_size)`.
/// They must satisfy `elite >= 1` and `elite + mutants <= population_size`;
/// the remaining `population_size - elite - mutants` slots are filled by
/// crossover offspring each generation.
///
/// # Examples
///
/// ```
/// use u_tsp::brkga::BrkgaConfig;
///
/// let config = BrkgaConfig::new(50) // 50 random keys
///     .with_population_size(200)
///     .with_elite_fraction(0.20)
///     .with_mutant_fraction(0.15)
///     .with_elite_inheritance_prob(0.70)
///     .with_num_populations(3);
///
/// assert_eq!(config.elite_count(), 40);
/// assert_eq!(config.mutant_count(), 30);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BrkgaConfig {
    /// Number of random keys per chromosome.
    pub chromosome_length: usize,

    /// Number of chromosomes in each population.
    pub population_size: usize,

    /// Fraction of each population preserved as elite.
    pub elite_fraction: f64,

    /// Fraction of each population replaced by random mutants.
    pub mutant_fraction: f64,

    /// Probability that an offspring inherits the elite parent's allele
    /// during biased uniform crossover.
    pub elite_inheritance_prob: f64,

    /// Number of independent populations evolved side by side.
    pub num_populations: usize,

    /// Whether to evolve populations in parallel (requires the `parallel`
    /// feature; ignored otherwise).
    pub parallel: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl BrkgaConfig {
    /// Creates a new configuration with the given chromosome length.
    pub fn new(chromosome_length: usize) -> Self {
        Self {
            chromosome_length,
            population_size: 100,
            elite_fraction: 0.20,
            mutant_fraction: 0.10,
            elite_inheritance_prob: 0.70,
            num_populations: 1,
            parallel: false,
            seed: None,
        }
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_elite_fraction(mut self, f: f64) -> Self {
        self.elite_fraction = f;
        self
    }

    pub fn with_mutant_fraction(mut self, f: f64) -> Self {
        self.mutant_fraction = f;
        self
    }

    pub fn with_elite_inheritance_prob(mut self, p: f64) -> Self {
        self.elite_inheritance_prob = p;
        self
    }

    pub fn with_num_populations(mut self, k: usize) -> Self {
        self.num_populations = k;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Elite-set size `pe`.
    pub fn elite_count(&self) -> usize {
        (self.elite_fraction * self.population_size as f64).floor() as usize
    }

    /// Mutant-set size `pm`.
    pub fn mutant_count(&self) -> usize {
        (self.mutant_fraction * self.population_size as f64).floor() as usize
    }

    /// Validates the configuration.
    ///
    /// Checks run in a fixed order and the first violation is reported.
    pub fn validate(&self) -> Result<(), BrkgaError> {
        if self.chromosome_length == 0 {
            return Err(BrkgaError::NonPositiveChromosomeLength);
        }
        if self.population_size == 0 {
            return Err(BrkgaError::NonPositivePopulationSize);
        }

        let elite = self.elite_count();
        if elite == 0 {
            return Err(BrkgaError::EmptyEliteSet {
                fraction: self.elite_fraction,
                population_size: self.population_size,
            });
        }
        if elite > self.population_size {
            return Err(BrkgaError::EliteExceedsPopulation {
                elite,
                population_size: self.population_size,
            });
        }

        if self.mutant_fraction < 0.0 {
            return Err(BrkgaError::NegativeMutantSet(self.mutant_fraction));
        }
        let mutants = self.mutant_count();
        if mutants > self.population_size {
            return Err(BrkgaError::MutantExceedsPopulation {
                mutants,
                population_size: self.population_size,
            });
        }
        if elite + mutants > self.population_size {
            return Err(BrkgaError::EliteAndMutantExceedPopulation {
                elite,
                mutants,
                population_size: self.population_size,
            });
        }

        if self.num_populations == 0 {
            return Err(BrkgaError::NoPopulations);
        }
        Ok(())
    }
}
