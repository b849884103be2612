//! Criterion benchmarks for the evolution driver.
//!
//! Uses a synthetic Sphere chromosome to measure driver overhead
//! independent of any domain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_evolve::chromosome::{Chromosome, InitParams};
use u_evolve::constraint::ConstraintSet;
use u_evolve::evolution::{Evolution, EvolutionConfig, SilentObserver};

// ===========================================================================
// Sphere function: maximize -sum(x_i^2)
// ===========================================================================

#[derive(Default)]
struct Sphere {
    genes: Vec<f64>,
}

impl Chromosome for Sphere {
    fn initialize(&mut self, params: &InitParams) -> anyhow::Result<()> {
        self.genes = vec![0.0; *params.get::<usize>("dim")?];
        Ok(())
    }

    fn randomize<R: Rng>(&mut self, rng: &mut R) -> anyhow::Result<()> {
        for gene in &mut self.genes {
            *gene = rng.random_range(-5.0..5.0);
        }
        Ok(())
    }

    fn mutate<R: Rng>(&mut self, rng: &mut R) -> anyhow::Result<()> {
        let i = rng.random_range(0..self.genes.len());
        self.genes[i] += rng.random_range(-0.5..0.5);
        Ok(())
    }

    fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> anyhow::Result<Self> {
        let point = rng.random_range(0..self.genes.len());
        let mut genes = self.genes.clone();
        genes[point..].copy_from_slice(&other.genes[point..]);
        Ok(Sphere { genes })
    }
}

fn sphere_constraints() -> ConstraintSet<Sphere> {
    ConstraintSet::new()
        .with_hard(|s: &Sphere| -> anyhow::Result<bool> { Ok(s.genes.iter().all(|x| x.abs() < 10.0)) })
        .with_soft(|s: &Sphere| -> anyhow::Result<f64> {
            Ok(-s.genes.iter().map(|x| x * x).sum::<f64>())
        })
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolve_sphere");
    group.sample_size(10);

    for (dim, pop, gen) in [(10usize, 50usize, 50usize), (50, 100, 30), (100, 100, 20)] {
        for parallel in [false, true] {
            let config = EvolutionConfig::default()
                .with_population_size(pop)
                .with_crossovers_per_generation(pop / 2)
                .with_max_generations(gen)
                .with_mutation_rate(0.2)
                .with_parallel(parallel)
                .with_seed(42);
            let evolution = Evolution::<Sphere>::new(config)
                .with_init_params(InitParams::new().with("dim", dim))
                .with_constraints(sphere_constraints())
                .with_observer(SilentObserver);

            let mode = if parallel { "par" } else { "seq" };
            group.bench_with_input(
                BenchmarkId::new(format!("d{}_p{}_g{}_{}", dim, pop, gen, mode), dim),
                &evolution,
                |b, e| {
                    b.iter(|| {
                        let result = black_box(e).run().unwrap();
                        black_box(result.best_fitness)
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_sphere);
criterion_main!(benches);
