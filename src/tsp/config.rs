//! Solver configuration.

use super::error::SolveError;
use crate::brkga::{BrkgaConfig, BrkgaError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of one [`TspSolver`](super::TspSolver) run.
///
/// # Termination
///
/// The run stops at the first generation boundary where the time limit or
/// the generation limit is reached. A limit of 0 disables it; at least one
/// must be set.
///
/// # Examples
///
/// ```
/// use u_tsp::tsp::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_time_limit_secs(2.0)
///     .with_max_generations(0)
///     .with_num_populations(3)
///     .with_exchange(2, 50)
///     .with_seed(42);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Wall-clock limit in seconds (0 = unlimited).
    pub time_limit_secs: f64,

    /// Generation limit (0 = unlimited).
    pub max_generations: usize,

    /// Chromosomes per population.
    pub population_size: usize,

    /// Fraction of each population kept as elite, in `(0, 1]`.
    pub elite_fraction: f64,

    /// Fraction of each population replaced by mutants, in `[0, 1)`.
    pub mutant_fraction: f64,

    /// Probability of inheriting the elite parent's key, in `(0, 1)`.
    pub elite_inheritance_prob: f64,

    /// Number of independent populations.
    pub num_populations: usize,

    /// Chromosomes migrated from each population at every exchange.
    pub exchange_size: usize,

    /// Generations between elite exchanges (0 = never).
    pub exchange_interval: usize,

    /// 2-opt move cap per decode (0 disables local search).
    pub max_local_search_improvements: usize,

    /// Seed every population with the greedy and MST tours.
    pub warm_start: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Evolve populations on the rayon pool (requires the `parallel`
    /// feature; ignored otherwise).
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 0.0,
            max_generations: 1000,
            population_size: 100,
            elite_fraction: 0.20,
            mutant_fraction: 0.10,
            elite_inheritance_prob: 0.70,
            num_populations: 1,
            exchange_size: 2,
            exchange_interval: 100,
            max_local_search_improvements: 1000,
            warm_start: true,
            seed: None,
            parallel: false,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit_secs(mut self, secs: f64) -> Self {
        self.time_limit_secs = secs;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
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

    /// Migrates `size` elites between every pair of populations once every
    /// `interval` generations.
    pub fn with_exchange(mut self, size: usize, interval: usize) -> Self {
        self.exchange_size = size;
        self.exchange_interval = interval;
        self
    }

    pub fn with_max_local_search_improvements(mut self, n: usize) -> Self {
        self.max_local_search_improvements = n;
        self
    }

    pub fn with_warm_start(mut self, warm_start: bool) -> Self {
        self.warm_start = warm_start;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether elite exchange runs at all.
    pub fn exchanges(&self) -> bool {
        self.num_populations > 1 && self.exchange_interval > 0
    }

    /// Engine configuration for tours over `num_points` points.
    pub fn to_brkga_config(&self, num_points: usize) -> BrkgaConfig {
        let mut config = BrkgaConfig::new(num_points.saturating_sub(1))
            .with_population_size(self.population_size)
            .with_elite_fraction(self.elite_fraction)
            .with_mutant_fraction(self.mutant_fraction)
            .with_elite_inheritance_prob(self.elite_inheritance_prob)
            .with_num_populations(self.num_populations)
            .with_parallel(self.parallel);
        config.seed = self.seed;
        config
    }

    /// `true` once either enabled limit is reached.
    pub fn is_finished(&self, elapsed_secs: f64, generations: usize) -> bool {
        (self.time_limit_secs > 0.0 && elapsed_secs >= self.time_limit_secs)
            || (self.max_generations > 0 && generations >= self.max_generations)
    }

    /// Validates the solve parameters.
    ///
    /// Set sizes and the exchange size are checked against the population
    /// size with the engine's own rules, so a config that passes here
    /// builds an engine.
    pub fn validate(&self) -> Result<(), SolveError> {
        if !self.time_limit_secs.is_finite() || self.time_limit_secs < 0.0 {
            return Err(SolveError::InvalidTimeLimit(self.time_limit_secs));
        }
        if self.time_limit_secs == 0.0 && self.max_generations == 0 {
            return Err(SolveError::NoTerminationCriterion);
        }

        if !(self.elite_fraction > 0.0 && self.elite_fraction <= 1.0) {
            return Err(SolveError::InvalidEliteFraction(self.elite_fraction));
        }
        if !(self.mutant_fraction >= 0.0 && self.mutant_fraction < 1.0) {
            return Err(SolveError::InvalidMutantFraction(self.mutant_fraction));
        }
        if self.elite_fraction + self.mutant_fraction > 1.0 + 1e-12 {
            return Err(SolveError::FractionsExceedOne {
                elite: self.elite_fraction,
                mutant: self.mutant_fraction,
            });
        }
        if !(self.elite_inheritance_prob > 0.0 && self.elite_inheritance_prob < 1.0) {
            return Err(SolveError::InvalidInheritanceProb(
                self.elite_inheritance_prob,
            ));
        }

        // chromosome length is checked by the solver against the point count
        self.to_brkga_config(2).validate()?;

        if self.exchanges() {
            let p = self.population_size;
            let m = self.exchange_size;
            if m == 0 || m >= p {
                return Err(BrkgaError::InvalidExchangeSize {
                    size: m,
                    population_size: p,
                }
                .into());
            }
            let sources = self.num_populations - 1;
            if sources * m > p {
                return Err(BrkgaError::ExchangeOverflow {
                    size: m,
                    sources,
                    population_size: p,
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SolverConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.exchanges());
    }

    #[test]
    fn test_no_termination_criterion() {
        let config = SolverConfig::default()
            .with_time_limit_secs(0.0)
            .with_max_generations(0);
        assert_eq!(config.validate(), Err(SolveError::NoTerminationCriterion));
    }

    #[test]
    fn test_time_limit_only_is_valid() {
        let config = SolverConfig::default()
            .with_time_limit_secs(0.5)
            .with_max_generations(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_time_limit() {
        for secs in [-1.0, f64::NAN, f64::INFINITY] {
            let config = SolverConfig::default().with_time_limit_secs(secs);
            assert!(matches!(
                config.validate(),
                Err(SolveError::InvalidTimeLimit(_))
            ));
        }
    }

    #[test]
    fn test_fraction_bounds() {
        let config = SolverConfig::default().with_elite_fraction(0.0);
        assert_eq!(config.validate(), Err(SolveError::InvalidEliteFraction(0.0)));

        let config = SolverConfig::default().with_elite_fraction(1.2);
        assert_eq!(config.validate(), Err(SolveError::InvalidEliteFraction(1.2)));

        let config = SolverConfig::default().with_mutant_fraction(1.0);
        assert_eq!(config.validate(), Err(SolveError::InvalidMutantFraction(1.0)));

        let config = SolverConfig::default()
            .with_elite_fraction(0.7)
            .with_mutant_fraction(0.4);
        assert!(matches!(
            config.validate(),
            Err(SolveError::FractionsExceedOne { .. })
        ));

        let config = SolverConfig::default()
            .with_elite_fraction(0.7)
            .with_mutant_fraction(0.3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inheritance_prob_bounds() {
        for prob in [0.0, 1.0, f64::NAN] {
            let config = SolverConfig::default().with_elite_inheritance_prob(prob);
            assert!(matches!(
                config.validate(),
                Err(SolveError::InvalidInheritanceProb(_))
            ));
        }
    }

    #[test]
    fn test_engine_rules_apply() {
        let config = SolverConfig::default()
            .with_population_size(4)
            .with_elite_fraction(0.2);
        assert!(matches!(
            config.validate(),
            Err(SolveError::Brkga(BrkgaError::EmptyEliteSet { .. }))
        ));

        let config = SolverConfig::default().with_num_populations(0);
        assert_eq!(
            config.validate(),
            Err(SolveError::Brkga(BrkgaError::NoPopulations))
        );
    }

    #[test]
    fn test_exchange_size_checked_only_when_exchanging() {
        let config = SolverConfig::default().with_exchange(0, 10);
        assert!(config.validate().is_ok());

        let config = config.with_num_populations(2);
        assert!(matches!(
            config.validate(),
            Err(SolveError::Brkga(BrkgaError::InvalidExchangeSize { size: 0, .. }))
        ));

        let config = SolverConfig::default()
            .with_num_populations(3)
            .with_exchange(60, 10);
        assert!(matches!(
            config.validate(),
            Err(SolveError::Brkga(BrkgaError::ExchangeOverflow { sources: 2, .. }))
        ));

        let config = SolverConfig::default()
            .with_num_populations(3)
            .with_exchange(100, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_to_brkga_config() {
        let config = SolverConfig::default()
            .with_population_size(40)
            .with_num_populations(2)
            .with_seed(9);
        let brkga = config.to_brkga_config(11);
        assert_eq!(brkga.chromosome_length, 10);
        assert_eq!(brkga.population_size, 40);
        assert_eq!(brkga.num_populations, 2);
        assert_eq!(brkga.seed, Some(9));
        assert_eq!(brkga.elite_count(), 8);
    }

    #[test]
    fn test_is_finished() {
        let config = SolverConfig::default()
            .with_time_limit_secs(1.0)
            .with_max_generations(10);
        assert!(!config.is_finished(0.5, 9));
        assert!(config.is_finished(1.0, 0));
        assert!(config.is_finished(0.0, 10));

        let unlimited_time = config.clone().with_time_limit_secs(0.0);
        assert!(!unlimited_time.is_finished(1e9, 9));

        let unlimited_gens = config.with_max_generations(0);
        assert!(!unlimited_gens.is_finished(0.5, usize::MAX));
    }
}
