//! Multi-population BRKGA engine.
//!
//! [`Brkga`] owns `K` independent populations ("islands"). Each island has
//! two generation buffers that are swapped every generation and its own
//! random source, so an island's generation step touches nothing outside
//! the island. Islands only interact through [`Brkga::exchange_elite`].

use super::config::BrkgaConfig;
use super::error::BrkgaError;
use super::population::Population;
use super::types::BrkgaDecoder;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Population sizing shared by every island.
#[derive(Debug, Clone, Copy)]
struct Params {
    n: usize,
    p: usize,
    pe: usize,
    pm: usize,
    rhoe: f64,
}

/// One population with its generation buffers and random source.
#[derive(Debug, Clone)]
struct Island {
    current: Population,
    previous: Population,
    rng: StdRng,
}

impl Island {
    fn new(params: &Params, seed: u64) -> Result<Self, BrkgaError> {
        Ok(Self {
            current: Population::new(params.n, params.p)?,
            previous: Population::new(params.n, params.p)?,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Fills the current buffer with random chromosomes, decodes and sorts.
    fn initialize<D: BrkgaDecoder>(&mut self, params: &Params, decoder: &D) {
        let pop = &mut self.current;
        for j in 0..params.p {
            for gene in pop.chromosome_at_mut(j) {
                *gene = self.rng.random_range(0.0..1.0);
            }
        }
        for j in 0..params.p {
            let cost = decoder.decode(pop.chromosome_at_mut(j), &mut self.rng);
            pop.set_fitness(j, cost);
        }
        pop.sort_fitness();
    }

    /// Builds the next generation into `previous`, then swaps the buffers.
    fn step<D: BrkgaDecoder>(&mut self, params: &Params, decoder: &D) {
        evolution(
            &self.current,
            &mut self.previous,
            params,
            decoder,
            &mut self.rng,
        );
        std::mem::swap(&mut self.current, &mut self.previous);
    }
}

/// One BRKGA generation from `curr` into `next`.
///
/// Layout of `next` before sorting: `[0, pe)` elites with their carried-over
/// cost, `[pe, p - pm)` crossover offspring, `[p - pm, p)` mutants.
fn evolution<D: BrkgaDecoder, R: Rng>(
    curr: &Population,
    next: &mut Population,
    params: &Params,
    decoder: &D,
    rng: &mut R,
) {
    let Params { p, pe, pm, rhoe, .. } = *params;

    for i in 0..pe {
        let (cost, src) = curr.entry(i);
        next.chromosome_at_mut(i)
            .copy_from_slice(curr.chromosome_at(src));
        next.set_fitness(i, cost);
    }

    // Parents are drawn from [0, pe - 1) and [pe, p - 1): the last candidate
    // of each pool is never picked. Pools are clamped to one candidate.
    let elite_pool = pe.saturating_sub(1).max(1);
    let non_elite_pool = (p - pe).saturating_sub(1).max(1);
    for i in pe..p - pm {
        let elite_parent = curr.storage_index(rng.random_range(0..elite_pool));
        let non_elite_parent = curr.storage_index(pe + rng.random_range(0..non_elite_pool));

        let child = next.chromosome_at_mut(i);
        for (j, gene) in child.iter_mut().enumerate() {
            let source = if rng.random_range(0.0..1.0) < rhoe {
                elite_parent
            } else {
                non_elite_parent
            };
            *gene = curr.allele(source, j);
        }
    }

    for i in p - pm..p {
        for gene in next.chromosome_at_mut(i) {
            *gene = rng.random_range(0.0..1.0);
        }
    }

    for i in pe..p {
        let cost = decoder.decode(next.chromosome_at_mut(i), rng);
        next.set_fitness(i, cost);
    }

    next.sort_fitness();
}

/// Biased random-key genetic algorithm over `K` independent populations.
///
/// The engine borrows its decoder; the same decoder evaluates every
/// chromosome of every population.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_tsp::brkga::{Brkga, BrkgaConfig, BrkgaDecoder};
///
/// struct SumDecoder;
///
/// impl BrkgaDecoder for SumDecoder {
///     type Solution = f64;
///     fn decode<R: Rng>(&self, keys: &mut [f64], _rng: &mut R) -> f64 {
///         keys.iter().sum()
///     }
///     fn solution(&self, keys: &[f64]) -> f64 {
///         keys.iter().sum()
///     }
/// }
///
/// let config = BrkgaConfig::new(4)
///     .with_population_size(30)
///     .with_num_populations(2)
///     .with_seed(7);
/// let mut engine = Brkga::new(&config, &SumDecoder).unwrap();
/// let initial = engine.best_fitness();
///
/// engine.evolve(20).unwrap();
/// engine.exchange_elite(2).unwrap();
///
/// assert!(engine.best_fitness() <= initial);
/// ```
#[derive(Debug)]
pub struct Brkga<'d, D: BrkgaDecoder> {
    decoder: &'d D,
    params: Params,
    islands: Vec<Island>,
    parallel: bool,
}

impl<'d, D: BrkgaDecoder> Brkga<'d, D> {
    /// Validates `config`, then allocates, randomizes, decodes and sorts
    /// every population.
    ///
    /// # Errors
    /// Any [`BrkgaConfig::validate`] failure; nothing is allocated in that
    /// case.
    pub fn new(config: &BrkgaConfig, decoder: &'d D) -> Result<Self, BrkgaError> {
        config.validate()?;

        let params = Params {
            n: config.chromosome_length,
            p: config.population_size,
            pe: config.elite_count(),
            pm: config.mutant_count(),
            rhoe: config.elite_inheritance_prob,
        };

        let mut master = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        let mut islands = Vec::with_capacity(config.num_populations);
        for _ in 0..config.num_populations {
            islands.push(Island::new(&params, master.random())?);
        }

        let mut engine = Self {
            decoder,
            params,
            islands,
            parallel: config.parallel,
        };
        engine.reset();

        debug!(
            "brkga: n={} p={} pe={} pm={} rhoe={} K={} best={}",
            params.n,
            params.p,
            params.pe,
            params.pm,
            params.rhoe,
            engine.islands.len(),
            engine.best_fitness()
        );
        Ok(engine)
    }

    /// Re-initializes every population with fresh random chromosomes.
    pub fn reset(&mut self) {
        for island in &mut self.islands {
            island.initialize(&self.params, self.decoder);
        }
    }

    /// Evolves every population for `generations` generations.
    ///
    /// # Errors
    /// Fails with [`BrkgaError::NonPositiveGenerations`] if `generations` is
    /// 0; the populations are left untouched.
    pub fn evolve(&mut self, generations: usize) -> Result<(), BrkgaError> {
        if generations == 0 {
            return Err(BrkgaError::NonPositiveGenerations);
        }

        for _ in 0..generations {
            self.evolve_islands();
            trace!("brkga: generation done, best={}", self.best_fitness());
        }
        Ok(())
    }

    fn evolve_islands(&mut self) {
        let params = &self.params;
        let decoder = self.decoder;

        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                self.islands
                    .par_iter_mut()
                    .for_each(|island| island.step(params, decoder));
                return;
            }
        }

        for island in &mut self.islands {
            island.step(params, decoder);
        }
    }

    /// Copies the `m` best chromosomes of every population into the worst
    /// ranked slots of every other population, then re-sorts all of them.
    ///
    /// Elites are taken from a snapshot made before any write, so the
    /// result does not depend on the order populations are visited.
    ///
    /// # Errors
    /// - [`BrkgaError::InvalidExchangeSize`] if `m == 0` or `m >= p`.
    /// - [`BrkgaError::ExchangeOverflow`] if `(K - 1) * m > p`.
    ///
    /// No population is modified on error.
    pub fn exchange_elite(&mut self, m: usize) -> Result<(), BrkgaError> {
        let p = self.params.p;
        if m == 0 || m >= p {
            return Err(BrkgaError::InvalidExchangeSize {
                size: m,
                population_size: p,
            });
        }
        let sources = self.islands.len() - 1;
        if sources * m > p {
            return Err(BrkgaError::ExchangeOverflow {
                size: m,
                sources,
                population_size: p,
            });
        }

        let elites: Vec<Vec<(Vec<f64>, f64)>> = self
            .islands
            .iter()
            .map(|island| {
                (0..m)
                    .map(|rank| {
                        let (cost, slot) = island.current.entry(rank);
                        (island.current.chromosome_at(slot).to_vec(), cost)
                    })
                    .collect()
            })
            .collect();

        for (i, island) in self.islands.iter_mut().enumerate() {
            let mut dest = p;
            for (j, migrants) in elites.iter().enumerate() {
                if i == j {
                    continue;
                }
                for (genes, cost) in migrants {
                    dest -= 1;
                    let slot = island.current.storage_index(dest);
                    island.current.chromosome_at_mut(slot).copy_from_slice(genes);
                    island.current.set_rank_fitness(dest, *cost);
                }
            }
            island.current.sort_fitness();
        }

        debug!(
            "brkga: exchanged {} elites across {} populations, best={}",
            m,
            self.islands.len(),
            self.best_fitness()
        );
        Ok(())
    }

    /// Replaces the worst ranked chromosomes of population `k` with
    /// `chromosomes` (the first one takes the worst slot), decodes them and
    /// re-sorts.
    ///
    /// # Errors
    /// - [`BrkgaError::InvalidPopulationIndex`] if `k >= K`.
    /// - [`BrkgaError::ChromosomeLengthMismatch`] if any chromosome's length
    ///   differs from `n`.
    /// - [`BrkgaError::TooManyChromosomes`] if more than `p` are supplied.
    ///
    /// The population is unchanged on error.
    pub fn inject_chromosomes(
        &mut self,
        chromosomes: &[Vec<f64>],
        k: usize,
    ) -> Result<(), BrkgaError> {
        if k >= self.islands.len() {
            return Err(BrkgaError::InvalidPopulationIndex {
                index: k,
                count: self.islands.len(),
            });
        }
        if let Some(bad) = chromosomes.iter().find(|c| c.len() != self.params.n) {
            return Err(BrkgaError::ChromosomeLengthMismatch {
                expected: self.params.n,
                actual: bad.len(),
            });
        }
        let p = self.params.p;
        if chromosomes.len() > p {
            return Err(BrkgaError::TooManyChromosomes {
                count: chromosomes.len(),
                population_size: p,
            });
        }

        let island = &mut self.islands[k];
        for (i, chromosome) in chromosomes.iter().enumerate() {
            let rank = p - 1 - i;
            let slot = island.current.storage_index(rank);
            let genes = island.current.chromosome_at_mut(slot);
            genes.copy_from_slice(chromosome);
            let cost = self.decoder.decode(genes, &mut island.rng);
            island.current.set_rank_fitness(rank, cost);
        }
        island.current.sort_fitness();

        debug!(
            "brkga: injected {} chromosomes into population {}, best={}",
            chromosomes.len(),
            k,
            island.current.best_fitness()
        );
        Ok(())
    }

    fn best_island(&self) -> &Island {
        let mut best = &self.islands[0];
        for island in &self.islands[1..] {
            if island.current.best_fitness() < best.current.best_fitness() {
                best = island;
            }
        }
        best
    }

    /// Lowest cost over all populations.
    pub fn best_fitness(&self) -> f64 {
        self.best_island().current.best_fitness()
    }

    /// Chromosome with the lowest cost over all populations. On ties the
    /// population with the lowest index wins.
    pub fn best_chromosome(&self) -> &[f64] {
        let pop = &self.best_island().current;
        pop.chromosome_at(pop.storage_index(0))
    }

    /// Decodes the best chromosome into a solution.
    pub fn best_solution(&self) -> D::Solution {
        self.decoder.solution(self.best_chromosome())
    }

    /// Current generation of population `k`.
    pub fn population(&self, k: usize) -> Result<&Population, BrkgaError> {
        self.islands
            .get(k)
            .map(|island| &island.current)
            .ok_or(BrkgaError::InvalidPopulationIndex {
                index: k,
                count: self.islands.len(),
            })
    }

    pub fn decoder(&self) -> &'d D {
        self.decoder
    }

    /// Chromosome length.
    pub fn n(&self) -> usize {
        self.params.n
    }

    /// Population size.
    pub fn p(&self) -> usize {
        self.params.p
    }

    /// Elite-set size.
    pub fn pe(&self) -> usize {
        self.params.pe
    }

    /// Mutant-set size.
    pub fn pm(&self) -> usize {
        self.params.pm
    }

    /// Offspring count per generation.
    pub fn po(&self) -> usize {
        self.params.p - self.params.pe - self.params.pm
    }

    /// Elite inheritance probability.
    pub fn rhoe(&self) -> f64 {
        self.params.rhoe
    }

    /// Number of populations.
    pub fn k(&self) -> usize {
        self.islands.len()
    }

    /// Whether populations are evolved on the rayon pool.
    pub fn is_parallel(&self) -> bool {
        cfg!(feature = "parallel") && self.parallel
    }
}
