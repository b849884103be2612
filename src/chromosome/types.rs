//! Core trait for problem encodings.

use super::params::InitParams;
use rand::Rng;

/// A problem-specific candidate-solution encoding.
///
/// The engine never constructs a chromosome directly: it calls a factory
/// (by default [`Default::default`]), then [`initialize`](Self::initialize)
/// with the run's [`InitParams`], then [`randomize`](Self::randomize).
///
/// Operators return [`anyhow::Result`]; the engine tags failures with the
/// phase they came from and aborts the run.
///
/// # Thread Safety
///
/// Operators of different individuals run concurrently on the rayon pool,
/// and crossover reads both parents from several tasks at once, hence
/// `Send + Sync`.
///
/// # Implementing
///
/// ```
/// use rand::Rng;
/// use u_evolve::chromosome::{Chromosome, InitParams};
///
/// #[derive(Default)]
/// struct Bits(Vec<bool>);
///
/// impl Chromosome for Bits {
///     fn initialize(&mut self, params: &InitParams) -> anyhow::Result<()> {
///         let len = *params.get::<usize>("len")?;
///         self.0 = vec![false; len];
///         Ok(())
///     }
///
///     fn randomize<R: Rng>(&mut self, rng: &mut R) -> anyhow::Result<()> {
///         self.0.iter_mut().for_each(|b| *b = rng.random_bool(0.5));
///         Ok(())
///     }
///
///     fn mutate<R: Rng>(&mut self, rng: &mut R) -> anyhow::Result<()> {
///         let i = rng.random_range(0..self.0.len());
///         self.0[i] = !self.0[i];
///         Ok(())
///     }
///
///     fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> anyhow::Result<Self> {
///         let cut = rng.random_range(0..self.0.len());
///         let mut bits = self.0[..cut].to_vec();
///         bits.extend_from_slice(&other.0[cut..]);
///         Ok(Bits(bits))
///     }
/// }
/// ```
pub trait Chromosome: Sized + Send + Sync {
    /// Sets up the representation from the run configuration.
    ///
    /// Fails if required parameters are missing or malformed.
    fn initialize(&mut self, params: &InitParams) -> anyhow::Result<()>;

    /// Fills the representation with a uniformly random valid candidate.
    ///
    /// Always called after [`initialize`](Self::initialize).
    fn randomize<R: Rng>(&mut self, rng: &mut R) -> anyhow::Result<()>;

    /// Perturbs the representation in place.
    ///
    /// The magnitude of the perturbation is up to the implementation.
    fn mutate<R: Rng>(&mut self, rng: &mut R) -> anyhow::Result<()>;

    /// Produces a new offspring combining `self` and `other`.
    ///
    /// Neither parent is modified.
    fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> anyhow::Result<Self>;
}
