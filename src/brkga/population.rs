//! Fixed-size chromosome container with a fitness ranking.

use super::error::BrkgaError;

/// A population of `p` random-key chromosomes of length `n`.
///
/// Chromosomes live in *storage* slots `0..p`. A separate fitness ranking
/// of `(cost, storage index)` pairs orders them by cost; rank 0 is the best.
/// The population neither decodes nor draws random numbers itself.
///
/// Rank-based accessors ([`chromosome`](Self::chromosome),
/// [`fitness`](Self::fitness)) are only meaningful after
/// [`sort_fitness`](Self::sort_fitness) has been called following the last
/// mutation.
///
/// # Examples
///
/// ```
/// use u_tsp::brkga::Population;
///
/// let mut pop = Population::new(3, 2).unwrap();
/// pop.set_allele(1, 0, 0.25);
/// pop.set_fitness(0, 10.0);
/// pop.set_fitness(1, 4.0);
/// pop.sort_fitness();
///
/// assert_eq!(pop.fitness(0).unwrap(), 4.0);
/// assert_eq!(pop.chromosome(0).unwrap()[0], 0.25);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    chromosomes: Vec<Vec<f64>>,
    ranking: Vec<(f64, usize)>,
}

impl Population {
    /// Creates a population of `p` zeroed chromosomes of length `n`.
    ///
    /// # Errors
    /// Fails if `n == 0` or `p == 0`.
    pub fn new(n: usize, p: usize) -> Result<Self, BrkgaError> {
        if p == 0 {
            return Err(BrkgaError::NonPositivePopulationSize);
        }
        if n == 0 {
            return Err(BrkgaError::NonPositiveChromosomeLength);
        }

        Ok(Self {
            chromosomes: vec![vec![0.0; n]; p],
            ranking: (0..p).map(|i| (0.0, i)).collect(),
        })
    }

    /// Number of genes per chromosome.
    pub fn chromosome_len(&self) -> usize {
        self.chromosomes[0].len()
    }

    /// Number of chromosomes.
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    /// Always `false`; construction rejects empty populations.
    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Cost of the rank-0 chromosome.
    pub fn best_fitness(&self) -> f64 {
        self.ranking[0].0
    }

    /// Cost of the chromosome at `rank`.
    pub fn fitness(&self, rank: usize) -> Result<f64, BrkgaError> {
        self.check_rank(rank)?;
        Ok(self.ranking[rank].0)
    }

    /// The chromosome at `rank`.
    pub fn chromosome(&self, rank: usize) -> Result<&[f64], BrkgaError> {
        self.check_rank(rank)?;
        Ok(&self.chromosomes[self.ranking[rank].1])
    }

    /// Storage slot currently holding the chromosome at `rank`.
    ///
    /// # Panics
    /// Panics if `rank >= len()`.
    pub fn storage_index(&self, rank: usize) -> usize {
        self.ranking[rank].1
    }

    /// `(cost, storage index)` at `rank`, unchecked.
    pub(crate) fn entry(&self, rank: usize) -> (f64, usize) {
        self.ranking[rank]
    }

    /// The chromosome in storage slot `index`.
    pub fn chromosome_at(&self, index: usize) -> &[f64] {
        &self.chromosomes[index]
    }

    /// Mutable access to the chromosome in storage slot `index`.
    pub fn chromosome_at_mut(&mut self, index: usize) -> &mut [f64] {
        &mut self.chromosomes[index]
    }

    /// Sets the cost of storage slot `index` and pairs ranking slot `index`
    /// with it.
    ///
    /// Meant for filling a freshly generated population, where ranking slot
    /// `i` describes storage slot `i`. Call [`sort_fitness`](Self::sort_fitness)
    /// afterwards.
    pub fn set_fitness(&mut self, index: usize, cost: f64) {
        self.ranking[index] = (cost, index);
    }

    /// Overwrites the cost recorded at `rank`, keeping its storage pairing.
    pub fn set_rank_fitness(&mut self, rank: usize, cost: f64) {
        self.ranking[rank].0 = cost;
    }

    /// Stable ascending sort of the ranking by cost.
    pub fn sort_fitness(&mut self) {
        self.ranking.sort_by(|a, b| a.0.total_cmp(&b.0));
    }

    /// Gene `gene` of the chromosome in storage slot `chromosome`.
    #[inline]
    pub fn allele(&self, chromosome: usize, gene: usize) -> f64 {
        self.chromosomes[chromosome][gene]
    }

    /// Sets gene `gene` of the chromosome in storage slot `chromosome`.
    #[inline]
    pub fn set_allele(&mut self, chromosome: usize, gene: usize, value: f64) {
        self.chromosomes[chromosome][gene] = value;
    }

    fn check_rank(&self, rank: usize) -> Result<(), BrkgaError> {
        if rank >= self.len() {
            return Err(BrkgaError::RankOutOfRange {
                rank,
                population_size: self.len(),
            });
        }
        Ok(())
    }
}
