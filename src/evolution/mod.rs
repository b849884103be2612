//! Evolution driver.
//!
//! A truncation-selection genetic algorithm over any [`Chromosome`]
//! implementation. Each generation:
//!
//! 1. produces `crossovers_per_generation` offspring from random distinct
//!    parent pairs,
//! 2. mutates offspring and a random unprotected subset of the population,
//! 3. merges offspring into the population and scores everyone (memoized),
//! 4. keeps the `population_size` fittest (higher fitness is better).
//!
//! # Key Types
//!
//! - [`EvolutionConfig`]: Numeric parameters of the loop
//! - [`Evolution`]: The driver, holding factory, constraints and observer
//! - [`EvolutionResult`]: Final ranked population and run statistics
//! - [`GenerationObserver`]: Per-generation report sink
//!
//! [`Chromosome`]: crate::chromosome::Chromosome
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Coello (2002), "Theoretical and numerical constraint-handling techniques
//!   used with evolutionary algorithms: a survey of the state of the art"

mod config;
mod observer;
mod runner;

pub use config::EvolutionConfig;
pub use observer::{GenerationObserver, GenerationStats, LogObserver, SilentObserver};
pub use runner::{Evolution, EvolutionResult};
