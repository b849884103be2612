//! Per-generation reporting.

/// Snapshot emitted at the end of every generation, after truncation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Zero-based generation index.
    pub generation: usize,

    /// Fitness of the rank-0 individual.
    pub best_fitness: f64,

    /// Mean fitness of the retained population.
    pub mean_fitness: f64,

    /// Population size after truncation.
    pub population_size: usize,

    /// Offspring produced by crossover in this generation.
    pub offspring: usize,

    /// Mutations applied to offspring and existing individuals.
    pub mutations: usize,

    /// Fitness computations that were not served from cache.
    pub evaluations: usize,
}

/// Receives the per-generation report of a run.
///
/// Closures taking `&GenerationStats` implement this trait.
pub trait GenerationObserver: Send + Sync {
    fn on_generation(&self, stats: &GenerationStats);
}

impl<F> GenerationObserver for F
where
    F: Fn(&GenerationStats) + Send + Sync,
{
    fn on_generation(&self, stats: &GenerationStats) {
        self(stats)
    }
}

/// Default observer: one `tracing` event per generation.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl GenerationObserver for LogObserver {
    fn on_generation(&self, stats: &GenerationStats) {
        tracing::info!(
            generation = stats.generation,
            mean_fitness = stats.mean_fitness,
            evaluations = stats.evaluations,
            "best fitness: {}",
            stats.best_fitness
        );
    }
}

/// Observer that discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl GenerationObserver for SilentObserver {
    fn on_generation(&self, _stats: &GenerationStats) {}
}
