//! A chromosome paired with its memoized fitness.

use super::params::InitParams;
use super::types::Chromosome;
use crate::constraint::ConstraintSet;
use crate::error::{EvolutionError, Operator, Result};
use rand::Rng;

/// A member of the population.
///
/// The cached fitness is either `None` (stale) or the value computed for
/// the current representation. The chromosome is only reachable through
/// `&C`, and every operator that changes it clears the cache, so a stale
/// value can never be observed.
#[derive(Debug, Clone)]
pub struct Individual<C> {
    chromosome: C,
    fitness: Option<f64>,
}

impl<C> Individual<C> {
    /// Wraps `chromosome` with no cached fitness.
    pub fn new(chromosome: C) -> Self {
        Self {
            chromosome,
            fitness: None,
        }
    }

    /// The wrapped chromosome.
    pub fn chromosome(&self) -> &C {
        &self.chromosome
    }

    /// Unwraps the chromosome, discarding the cached fitness.
    pub fn into_chromosome(self) -> C {
        self.chromosome
    }

    /// The cached fitness, `None` if not evaluated since the last change.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Drops the cached fitness, forcing the next evaluation to recompute.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }
}

impl<C: Chromosome> Individual<C> {
    /// Builds a random individual: `factory`, then
    /// [`Chromosome::initialize`], then [`Chromosome::randomize`].
    pub fn random<F, R>(factory: &F, params: &InitParams, rng: &mut R) -> Result<Self>
    where
        F: Fn() -> C + ?Sized,
        R: Rng,
    {
        let mut chromosome = factory();
        chromosome
            .initialize(params)
            .map_err(|source| EvolutionError::Initialization { source })?;
        chromosome
            .randomize(rng)
            .map_err(|source| EvolutionError::operator(Operator::Randomize, source))?;
        Ok(Self::new(chromosome))
    }

    /// Mutates the chromosome in place and clears the cached fitness.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        // cleared first: a failed mutation may leave a partial change behind
        self.fitness = None;
        self.chromosome
            .mutate(rng)
            .map_err(|source| EvolutionError::operator(Operator::Mutate, source))
    }

    /// Produces an unevaluated offspring from `self` and `other`.
    ///
    /// Both parents keep their representation and their cached fitness.
    pub fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> Result<Self> {
        self.chromosome
            .crossover(&other.chromosome, rng)
            .map(Self::new)
            .map_err(|source| EvolutionError::operator(Operator::Crossover, source))
    }
}

impl<C: Sync> Individual<C> {
    /// Returns the fitness against `constraints`, computing it only if no
    /// value is cached.
    ///
    /// A cached value is returned as is, without calling any constraint.
    pub fn evaluate<R: Rng>(
        &mut self,
        constraints: &ConstraintSet<C>,
        rng: &mut R,
    ) -> Result<f64> {
        if let Some(fitness) = self.fitness {
            return Ok(fitness);
        }
        let fitness = constraints.score(&self.chromosome, rng)?;
        self.fitness = Some(fitness);
        Ok(fitness)
    }
}
