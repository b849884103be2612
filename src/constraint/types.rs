//! Core constraint trait.

/// A side-effect-free evaluator over a chromosome.
///
/// Implementations are called concurrently, on the same or on different
/// chromosomes, so they must not rely on interior mutability that is not
/// thread-safe.
///
/// Closures of the form `Fn(&C) -> anyhow::Result<T>` implement this trait
/// directly:
///
/// ```
/// use u_evolve::constraint::ConstraintSet;
///
/// let non_empty = |v: &Vec<u8>| -> anyhow::Result<bool> { Ok(!v.is_empty()) };
/// let set: ConstraintSet<Vec<u8>> = ConstraintSet::new().with_hard(non_empty);
/// assert_eq!(set.hard_len(), 1);
/// ```
pub trait Constraint<C, T>: Send + Sync {
    /// Evaluates the constraint on `chromosome`.
    fn compute(&self, chromosome: &C) -> anyhow::Result<T>;
}

impl<C, T, F> Constraint<C, T> for F
where
    F: Fn(&C) -> anyhow::Result<T> + Send + Sync,
{
    fn compute(&self, chromosome: &C) -> anyhow::Result<T> {
        self(chromosome)
    }
}

/// A feasibility constraint.
pub type HardConstraint<C> = dyn Constraint<C, bool>;

/// A scoring constraint.
pub type SoftConstraint<C> = dyn Constraint<C, f64>;
