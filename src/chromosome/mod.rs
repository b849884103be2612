//! Chromosome abstraction.
//!
//! A chromosome is the problem-specific encoding of a candidate solution.
//! Users implement [`Chromosome`] with four operators (initialize,
//! randomize, mutate, crossover); the engine wraps every chromosome in an
//! [`Individual`], which owns the memoized fitness and clears it whenever
//! the representation changes.
//!
//! # Core Types
//!
//! - [`Chromosome`]: The operator contract implemented by problem encodings
//! - [`Individual`]: A chromosome plus its cached fitness
//! - [`InitParams`]: Opaque run configuration passed to
//!   [`Chromosome::initialize`]

mod individual;
mod params;
mod types;

pub use individual::Individual;
pub use params::{InitParams, ParamError};
pub use types::Chromosome;
