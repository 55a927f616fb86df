//! Core trait for BRKGA.

use rand::Rng;

/// Decoder trait for BRKGA.
///
/// This is the **only** problem-specific piece the engine needs. It maps a
/// random-key chromosome (a slice of `f64` in `[0, 1)`) to a cost, and to
/// the concrete solution the keys describe. Lower cost is better
/// (minimization).
///
/// A decoder is shared by reference across every evaluation of every
/// population, possibly from several threads, so it must not keep
/// chromosome-specific state between calls.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_tsp::brkga::BrkgaDecoder;
///
/// /// keys > 0.5 select an item; cost is the number of unselected items.
/// struct OneMax;
///
/// impl BrkgaDecoder for OneMax {
///     type Solution = Vec<bool>;
///
///     fn decode<R: Rng>(&self, keys: &mut [f64], _rng: &mut R) -> f64 {
///         keys.iter().filter(|&&k| k <= 0.5).count() as f64
///     }
///
///     fn solution(&self, keys: &[f64]) -> Vec<bool> {
///         keys.iter().map(|&k| k > 0.5).collect()
///     }
/// }
/// ```
///
/// # References
///
/// Bean (1994), Goncalves & Resende (2011)
pub trait BrkgaDecoder: Send + Sync {
    /// The problem solution a chromosome decodes to.
    type Solution;

    /// Decodes a random-key chromosome and returns its cost.
    ///
    /// The decoder may rewrite `keys` (for example to store the result of
    /// a local search); the engine keeps whatever the chromosome holds when
    /// this returns, together with the returned cost.
    ///
    /// `rng` is the random source of the population being evaluated.
    fn decode<R: Rng>(&self, keys: &mut [f64], rng: &mut R) -> f64;

    /// Builds the solution described by `keys` without modifying them.
    fn solution(&self, keys: &[f64]) -> Self::Solution;
}
