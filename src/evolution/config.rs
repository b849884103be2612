//! Evolution run configuration.
//!
//! [`EvolutionConfig`] holds the numeric parameters of the generational
//! loop. Constraints, initialization parameters and the chromosome factory
//! live on [`Evolution`](super::Evolution) itself.

/// Configuration for one evolution run.
///
/// Immutable for the duration of a run.
///
/// # Defaults
///
/// ```
/// use u_evolve::evolution::EvolutionConfig;
///
/// let config = EvolutionConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 100);
/// assert_eq!(config.generations(), 101);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evolve::evolution::EvolutionConfig;
///
/// let config = EvolutionConfig::default()
///     .with_population_size(50)
///     .with_crossovers_per_generation(20)
///     .with_mutation_rate(0.8)
///     .with_protect_top(5)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionConfig {
    /// Index of the last generation. The loop runs `max_generations + 1`
    /// times, generation 0 included.
    pub max_generations: usize,

    /// Number of individuals kept after each truncation.
    pub population_size: usize,

    /// Offspring produced per generation.
    ///
    /// The population grows to `population_size + crossovers_per_generation`
    /// before truncation.
    pub crossovers_per_generation: usize,

    /// Mutation rate (0.0–1.0), read two ways:
    ///
    /// - each offspring draws `u ∈ [0, 1)` and is mutated when
    ///   `u > mutation_rate`, so an offspring is mutated with probability
    ///   `1 - mutation_rate`;
    /// - `round(mutation_rate × unprotected)` members of the existing
    ///   population, chosen uniformly without replacement, are mutated.
    ///
    /// The offspring rule is the inverse of the usual reading and is kept
    /// exactly as defined.
    pub mutation_rate: f64,

    /// Number of top-ranked individuals exempt from population mutation.
    ///
    /// Offspring are unaffected. `None` disables elitism.
    pub protect_top: Option<usize>,

    /// Whether phases run on the rayon pool.
    ///
    /// Results are identical either way for a fixed seed.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Clears the cached fitness of the first parent of every crossover.
    ///
    /// Reproduces a legacy side effect which forces parents to be
    /// re-evaluated even though their representation did not change.
    /// Off by default.
    pub invalidate_parents_on_crossover: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            max_generations: 100,
            population_size: 100,
            crossovers_per_generation: 50,
            mutation_rate: 0.1,
            protect_top: None,
            parallel: true,
            seed: None,
            invalidate_parents_on_crossover: false,
        }
    }
}

impl EvolutionConfig {
    /// Sets the index of the last generation.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of offspring per generation.
    pub fn with_crossovers_per_generation(mut self, n: usize) -> Self {
        self.crossovers_per_generation = n;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Protects the top `k` individuals from population mutation.
    pub fn with_protect_top(mut self, k: usize) -> Self {
        self.protect_top = Some(k);
        self
    }

    /// Enables or disables parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables the legacy parent invalidation on crossover.
    pub fn with_invalidate_parents_on_crossover(mut self, enabled: bool) -> Self {
        self.invalidate_parents_on_crossover = enabled;
        self
    }

    /// Number of generations a full run executes.
    pub fn generations(&self) -> usize {
        self.max_generations.saturating_add(1)
    }

    /// Number of individuals exempt from population mutation.
    pub fn protected_count(&self) -> usize {
        self.protect_top.unwrap_or(0).min(self.population_size)
    }

    /// Number of population members mutated out of `candidates`
    /// unprotected ones.
    pub fn mutation_count(&self, candidates: usize) -> usize {
        ((self.mutation_rate * candidates as f64).round() as usize).min(candidates)
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size == 0 {
            return Err("population_size must be at least 1".into());
        }
        if self.crossovers_per_generation > 0 && self.population_size < 2 {
            return Err("crossover needs a population_size of at least 2".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(format!(
                "mutation_rate must be within [0, 1], got {}",
                self.mutation_rate
            ));
        }
        if let Some(k) = self.protect_top {
            if k > self.population_size {
                return Err(format!(
                    "protect_top ({k}) exceeds population_size ({})",
                    self.population_size
                ));
            }
        }
        Ok(())
    }
}
