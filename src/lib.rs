//! Constrained evolutionary optimization core.
//!
//! Searches for a high-fitness candidate of any problem encoding through
//! iterated crossover, mutation and truncation selection:
//!
//! - **Chromosome**: The problem encoding implements four operators
//!   (initialize, randomize, mutate, crossover). Fitness is memoized per
//!   individual and cleared whenever the representation changes.
//! - **Constraints**: Hard constraints decide feasibility; soft constraints
//!   add up to the fitness of feasible candidates. Infeasible candidates get
//!   a strictly negative penalty.
//! - **Evolution**: The generational driver. Every phase runs as a parallel
//!   batch on rayon with per-task generators derived from one run seed, so
//!   runs are reproducible.
//!
//! # Example
//!
//! ```
//! use rand::Rng;
//! use u_evolve::chromosome::{Chromosome, InitParams};
//! use u_evolve::constraint::{ConstraintSet, InfeasiblePenalty};
//! use u_evolve::evolution::{Evolution, EvolutionConfig, SilentObserver};
//!
//! #[derive(Default)]
//! struct Point(Vec<f64>);
//!
//! impl Chromosome for Point {
//!     fn initialize(&mut self, params: &InitParams) -> anyhow::Result<()> {
//!         self.0 = vec![0.0; *params.get::<usize>("dim")?];
//!         Ok(())
//!     }
//!     fn randomize<R: Rng>(&mut self, rng: &mut R) -> anyhow::Result<()> {
//!         self.0.iter_mut().for_each(|x| *x = rng.random_range(-5.0..5.0));
//!         Ok(())
//!     }
//!     fn mutate<R: Rng>(&mut self, rng: &mut R) -> anyhow::Result<()> {
//!         let i = rng.random_range(0..self.0.len());
//!         self.0[i] += rng.random_range(-0.5..0.5);
//!         Ok(())
//!     }
//!     fn crossover<R: Rng>(&self, other: &Self, _rng: &mut R) -> anyhow::Result<Self> {
//!         Ok(Point(self.0.iter().zip(&other.0).map(|(a, b)| (a + b) / 2.0).collect()))
//!     }
//! }
//!
//! let config = EvolutionConfig::default()
//!     .with_population_size(30)
//!     .with_crossovers_per_generation(15)
//!     .with_max_generations(50)
//!     .with_seed(7);
//!
//! let constraints = ConstraintSet::new()
//!     .with_hard(|p: &Point| -> anyhow::Result<bool> { Ok(p.0[0] >= 0.0) })
//!     .with_soft(|p: &Point| -> anyhow::Result<f64> {
//!         Ok(-p.0.iter().map(|x| x * x).sum::<f64>())
//!     })
//!     .with_penalty(InfeasiblePenalty::Fixed(-1e9));
//!
//! let result = Evolution::<Point>::new(config)
//!     .with_init_params(InitParams::new().with("dim", 3usize))
//!     .with_constraints(constraints)
//!     .with_observer(SilentObserver)
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(result.generations, 51);
//! assert!(result.best().chromosome().0[0] >= 0.0);
//! ```

pub mod chromosome;
pub mod constraint;
pub mod error;
pub mod evolution;
pub mod random;

pub use error::{EvolutionError, Result};
