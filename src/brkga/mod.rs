//! Biased Random-Key Genetic Algorithm (BRKGA).
//!
//! BRKGA separates the evolutionary engine from the problem by using a
//! random-key representation: chromosomes are vectors of `f64` in `[0, 1)`,
//! and a user-provided **decoder** maps keys to a solution and its cost.
//!
//! [`Brkga`] evolves `K` independent populations. Each generation keeps the
//! elite set, fills the mutant set with fresh random keys and breeds the
//! rest by biased uniform crossover between one elite and one non-elite
//! parent. Populations share their best chromosomes through
//! [`Brkga::exchange_elite`], and external chromosomes (for example
//! heuristic solutions) enter through [`Brkga::inject_chromosomes`].
//!
//! # References
//!
//! - Bean (1994), "Genetic algorithms and random keys for sequencing and optimization"
//! - Goncalves & Resende (2011), "Biased random-key genetic algorithms for
//!   combinatorial optimization", *J. Heuristics* 17(5), 487–525

mod config;
mod engine;
mod error;
mod population;
mod types;

pub use config::BrkgaConfig;
pub use engine::Brkga;
pub use error::BrkgaError;
pub use population::Population;
pub use types::BrkgaDecoder;
