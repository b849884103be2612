//! Generational loop execution.
//!
//! [`Evolution`] orchestrates a run:
//! creation → (crossover → mutation → merge → scoring → truncation) × G.
//!
//! Every phase is a batch of independent tasks joined before the next phase
//! starts. Tasks touch exactly one individual mutably, and each task gets its
//! own generator seeded from the run generator in issue order, so a run is
//! reproducible for a fixed seed whether or not it executes in parallel.

use super::config::EvolutionConfig;
use super::observer::{GenerationObserver, GenerationStats, LogObserver};
use crate::chromosome::{Chromosome, Individual, InitParams};
use crate::constraint::{Constraint, ConstraintSet};
use crate::error::{EvolutionError, Result};
use crate::random::{create_rng, distinct_pair, sample_indices, task_rng, task_seeds};
use rand::Rng;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::sync::atomic::{self, AtomicBool};
use std::sync::Arc;
use tracing::debug;

/// Result of an evolution run.
#[derive(Debug, Clone)]
pub struct EvolutionResult<C> {
    /// Final population, ranked by descending fitness. Never empty.
    pub population: Vec<Individual<C>>,

    /// Fitness of the rank-0 individual.
    pub best_fitness: f64,

    /// Number of generations completed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best fitness at the end of each completed generation.
    pub fitness_history: Vec<f64>,

    /// Fitness computations over the whole run, initial population included.
    ///
    /// Memoized lookups are not counted.
    pub evaluations: usize,
}

impl<C> EvolutionResult<C> {
    /// The rank-0 individual.
    pub fn best(&self) -> &Individual<C> {
        &self.population[0]
    }

    /// Consumes the result and returns the rank-0 individual.
    pub fn into_best(mut self) -> Individual<C> {
        self.population.swap_remove(0)
    }
}

/// Evolution driver.
///
/// # Usage
///
/// ```ignore
/// let config = EvolutionConfig::default().with_seed(42);
/// let result = Evolution::<MyChromosome>::new(config)
///     .with_init_params(InitParams::new().with("len", 32usize))
///     .with_hard_constraint(|c: &MyChromosome| -> anyhow::Result<bool> { Ok(c.is_valid()) })
///     .with_soft_constraint(|c: &MyChromosome| -> anyhow::Result<f64> { Ok(c.score()) })
///     .run()?;
/// println!("best fitness: {}", result.best_fitness);
/// ```
pub struct Evolution<C> {
    factory: Box<dyn Fn() -> C + Send + Sync>,
    config: EvolutionConfig,
    constraints: ConstraintSet<C>,
    params: InitParams,
    observer: Box<dyn GenerationObserver>,
}

impl<C: Chromosome + Default + 'static> Evolution<C> {
    /// Creates a driver building chromosomes with [`Default::default`].
    pub fn new(config: EvolutionConfig) -> Self {
        Self::with_factory(C::default, config)
    }
}

impl<C: Chromosome + 'static> Evolution<C> {
    /// Creates a driver building chromosomes with `factory`.
    pub fn with_factory(
        factory: impl Fn() -> C + Send + Sync + 'static,
        config: EvolutionConfig,
    ) -> Self {
        Self {
            factory: Box::new(factory),
            config,
            constraints: ConstraintSet::new(),
            params: InitParams::new(),
            observer: Box::new(LogObserver),
        }
    }

    /// Appends a hard (feasibility) constraint.
    pub fn with_hard_constraint(mut self, constraint: impl Constraint<C, bool> + 'static) -> Self {
        self.constraints = self.constraints.with_hard(constraint);
        self
    }

    /// Appends a soft (scoring) constraint.
    pub fn with_soft_constraint(mut self, constraint: impl Constraint<C, f64> + 'static) -> Self {
        self.constraints = self.constraints.with_soft(constraint);
        self
    }

    /// Replaces the whole constraint set.
    pub fn with_constraints(mut self, constraints: ConstraintSet<C>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the parameters passed to [`Chromosome::initialize`].
    pub fn with_init_params(mut self, params: InitParams) -> Self {
        self.params = params;
        self
    }

    /// Replaces the default [`LogObserver`].
    pub fn with_observer(mut self, observer: impl GenerationObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn constraints(&self) -> &ConstraintSet<C> {
        &self.constraints
    }

    /// Runs the optimization to completion.
    ///
    /// # Errors
    ///
    /// [`EvolutionError::InvalidConfig`] before any work starts, or the
    /// first operator/constraint error raised by any task. A failure aborts
    /// the run; no partial result is returned.
    pub fn run(&self) -> Result<EvolutionResult<C>> {
        self.run_with_cancel(None)
    }

    /// Runs the optimization with an optional cancellation token.
    ///
    /// The flag is checked at the start of each generation, after the
    /// crossover barrier and after the mutation barrier. When set, the run
    /// stops at that barrier, discards uncommitted offspring and returns the
    /// current population, scored and ranked, with `cancelled = true`.
    #[tracing::instrument(
        skip_all,
        fields(
            population_size = self.config.population_size,
            generations = self.config.generations(),
        )
    )]
    pub fn run_with_cancel(&self, cancel: Option<Arc<AtomicBool>>) -> Result<EvolutionResult<C>> {
        let config = &self.config;
        config.validate().map_err(EvolutionError::InvalidConfig)?;
        self.constraints
            .penalty()
            .validate()
            .map_err(EvolutionError::InvalidConfig)?;

        let mut rng = create_rng(config.seed);

        // 1. Create and rank the initial population
        let mut population = self.create_population(&mut rng)?;
        let mut evaluations = self.score(&mut population, &mut rng)?;
        rank(&mut population);
        debug!(
            size = population.len(),
            best_fitness = fitness_of(&population[0]),
            "initial population ready"
        );

        let mut fitness_history = Vec::with_capacity(config.generations().min(1 << 16));
        let mut cancelled = false;

        // 2. Generational loop
        for generation in 0..=config.max_generations {
            if is_cancelled(&cancel) {
                cancelled = true;
                break;
            }

            // a. Crossover
            let parents =
                pick_parents(config.crossovers_per_generation, population.len(), &mut rng);
            let mut offspring = self.crossover(&population, &parents, &mut rng)?;

            if is_cancelled(&cancel) {
                cancelled = true;
                break;
            }

            if config.invalidate_parents_on_crossover {
                for &(first, _) in &parents {
                    population[first].invalidate();
                }
            }

            // b, c. Plan mutations, then d. run them as one batch
            let offspring_plan = plan_offspring_mutations(config, offspring.len(), &mut rng);
            let population_plan =
                plan_population_mutations(config, population.len(), &mut rng);
            let mutations = self.mutate(
                &mut population,
                &population_plan,
                &mut offspring,
                &offspring_plan,
            )?;

            if is_cancelled(&cancel) {
                // mutated members lost their cached fitness; offspring are dropped
                evaluations += self.score(&mut population, &mut rng)?;
                rank(&mut population);
                cancelled = true;
                break;
            }

            // e. Merge
            let offspring_count = offspring.len();
            population.append(&mut offspring);

            // f. Score
            let generation_evaluations = self.score(&mut population, &mut rng)?;
            evaluations += generation_evaluations;

            // g. Truncation selection
            select(&mut population, config.population_size);

            // h. Report
            let stats = GenerationStats {
                generation,
                best_fitness: fitness_of(&population[0]),
                mean_fitness: mean_fitness(&population),
                population_size: population.len(),
                offspring: offspring_count,
                mutations,
                evaluations: generation_evaluations,
            };
            fitness_history.push(stats.best_fitness);
            self.observer.on_generation(&stats);
        }

        if cancelled {
            debug!(completed = fitness_history.len(), "run cancelled");
        }

        Ok(EvolutionResult {
            best_fitness: fitness_of(&population[0]),
            population,
            generations: fitness_history.len(),
            cancelled,
            fitness_history,
            evaluations,
        })
    }

    /// Builds `population_size` random individuals concurrently.
    fn create_population<R: Rng>(&self, rng: &mut R) -> Result<Vec<Individual<C>>> {
        let seeds = task_seeds(rng, self.config.population_size);
        let factory = &*self.factory;
        let params = &self.params;

        if self.config.parallel {
            seeds
                .into_par_iter()
                .map(|seed| Individual::random(factory, params, &mut task_rng(seed)))
                .collect()
        } else {
            seeds
                .into_iter()
                .map(|seed| Individual::random(factory, params, &mut task_rng(seed)))
                .collect()
        }
    }

    /// Produces one offspring per parent pair; offspring `i` comes from
    /// `parents[i]`.
    fn crossover<R: Rng>(
        &self,
        population: &[Individual<C>],
        parents: &[(usize, usize)],
        rng: &mut R,
    ) -> Result<Vec<Individual<C>>> {
        let seeds = task_seeds(rng, parents.len());

        let offspring: Result<Vec<_>> = if self.config.parallel {
            parents
                .par_iter()
                .zip(seeds)
                .map(|(&(a, b), seed)| population[a].crossover(&population[b], &mut task_rng(seed)))
                .collect()
        } else {
            parents
                .iter()
                .zip(seeds)
                .map(|(&(a, b), seed)| population[a].crossover(&population[b], &mut task_rng(seed)))
                .collect()
        };

        let offspring = offspring?;
        debug!(offspring = offspring.len(), "crossover batch joined");
        Ok(offspring)
    }

    /// Applies every planned mutation, offspring and population alike, in a
    /// single batch. Returns the number of mutations applied.
    fn mutate(
        &self,
        population: &mut [Individual<C>],
        population_plan: &[Option<u64>],
        offspring: &mut [Individual<C>],
        offspring_plan: &[Option<u64>],
    ) -> Result<usize> {
        if self.config.parallel {
            population
                .par_iter_mut()
                .zip(population_plan.par_iter())
                .chain(offspring.par_iter_mut().zip(offspring_plan.par_iter()))
                .try_for_each(|(individual, seed)| mutate_planned(individual, *seed))?;
        } else {
            population
                .iter_mut()
                .zip(population_plan)
                .chain(offspring.iter_mut().zip(offspring_plan))
                .try_for_each(|(individual, seed)| mutate_planned(individual, *seed))?;
        }

        let mutations = population_plan
            .iter()
            .chain(offspring_plan)
            .filter(|seed| seed.is_some())
            .count();
        debug!(mutations, "mutation batch joined");
        Ok(mutations)
    }

    /// Evaluates every individual concurrently. Returns how many were not
    /// served from cache.
    fn score<R: Rng>(&self, population: &mut [Individual<C>], rng: &mut R) -> Result<usize> {
        let pending = population.iter().filter(|ind| !ind.is_evaluated()).count();
        let seeds = task_seeds(rng, population.len());
        let constraints = &self.constraints;

        if self.config.parallel {
            population
                .par_iter_mut()
                .zip(seeds)
                .try_for_each(|(individual, seed)| {
                    individual
                        .evaluate(constraints, &mut task_rng(seed))
                        .map(|_| ())
                })?;
        } else {
            population
                .iter_mut()
                .zip(seeds)
                .try_for_each(|(individual, seed)| {
                    individual
                        .evaluate(constraints, &mut task_rng(seed))
                        .map(|_| ())
                })?;
        }

        debug!(evaluated = pending, "fitness batch joined");
        Ok(pending)
    }
}

fn mutate_planned<C: Chromosome>(individual: &mut Individual<C>, seed: Option<u64>) -> Result<()> {
    match seed {
        Some(seed) => individual.mutate(&mut task_rng(seed)),
        None => Ok(()),
    }
}

fn is_cancelled(cancel: &Option<Arc<AtomicBool>>) -> bool {
    cancel
        .as_ref()
        .is_some_and(|flag| flag.load(atomic::Ordering::Relaxed))
}

/// Draws `count` parent pairs, each made of two distinct indices. The same
/// parent may appear in several pairs.
fn pick_parents<R: Rng>(count: usize, len: usize, rng: &mut R) -> Vec<(usize, usize)> {
    (0..count).map(|_| distinct_pair(rng, len)).collect()
}

/// One draw per offspring; mutated when the draw exceeds the mutation rate.
fn plan_offspring_mutations<R: Rng>(
    config: &EvolutionConfig,
    count: usize,
    rng: &mut R,
) -> Vec<Option<u64>> {
    let mut plan = Vec::with_capacity(count);
    for _ in 0..count {
        let draw: f64 = rng.random();
        plan.push(if draw > config.mutation_rate {
            Some(rng.random())
        } else {
            None
        });
    }
    plan
}

/// Uniform subset of the unprotected ranks, sized by the mutation rate.
///
/// `len` is the ranked population before the offspring merge.
fn plan_population_mutations<R: Rng>(
    config: &EvolutionConfig,
    len: usize,
    rng: &mut R,
) -> Vec<Option<u64>> {
    let protected = config.protected_count().min(len);
    let candidates = len - protected;
    let mut plan = vec![None; len];
    for index in sample_indices(rng, candidates, config.mutation_count(candidates)) {
        plan[protected + index] = Some(rng.random());
    }
    plan
}

/// Fitness used for ranking. Unevaluated individuals rank last.
fn fitness_of<C>(individual: &Individual<C>) -> f64 {
    individual.fitness().unwrap_or(f64::NEG_INFINITY)
}

/// Descending order with NaN ranked after every number.
fn compare_fitness_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Stable sort by descending fitness. Ties keep their current order.
fn rank<C>(population: &mut [Individual<C>]) {
    population.sort_by(|a, b| compare_fitness_desc(fitness_of(a), fitness_of(b)));
}

/// Truncation selection: keeps the `size` fittest individuals.
fn select<C>(population: &mut Vec<Individual<C>>, size: usize) {
    rank(population);
    population.truncate(size);
}

fn mean_fitness<C>(population: &[Individual<C>]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    population.iter().map(fitness_of).sum::<f64>() / population.len() as f64
}

// ============================================================================
// Tests
// ============================================================================
