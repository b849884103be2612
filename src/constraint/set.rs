//! Ordered hard/soft constraint lists and the fitness rule built on them.

use super::types::Constraint;
use crate::error::{ConstraintKind, EvolutionError, Result};
use rand::Rng;
use rayon::prelude::*;
use std::fmt;

/// Fitness assigned to a chromosome that violates a hard constraint.
///
/// Every variant yields a strictly negative value, so an infeasible
/// chromosome always ranks below a feasible one with non-negative score.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfeasiblePenalty {
    /// Uniform random value in `[-1, 0)`, drawn from the evaluating task's
    /// seeded generator.
    ///
    /// Ranking among infeasible chromosomes is then unrelated to how badly
    /// they violate the constraints. Reproducible for a fixed run seed.
    #[default]
    Random,

    /// The same negative constant for every infeasible chromosome.
    Fixed(f64),

    /// `-weight × number_of_violated_hard_constraints`.
    PerViolation(f64),
}

impl InfeasiblePenalty {
    /// Computes the penalty for a chromosome with `violations` failing
    /// hard constraints.
    pub fn penalty<R: Rng>(&self, violations: usize, rng: &mut R) -> f64 {
        match *self {
            // random() is in [0, 1), so 1 - random() is in (0, 1]
            InfeasiblePenalty::Random => -(1.0 - rng.random::<f64>()),
            InfeasiblePenalty::Fixed(value) => value,
            InfeasiblePenalty::PerViolation(weight) => -(weight * violations as f64),
        }
    }

    /// Checks that the policy always produces a strictly negative value.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match *self {
            InfeasiblePenalty::Random => Ok(()),
            InfeasiblePenalty::Fixed(value) if value < 0.0 && value.is_finite() => Ok(()),
            InfeasiblePenalty::Fixed(value) => Err(format!(
                "fixed infeasible penalty must be finite and negative, got {value}"
            )),
            InfeasiblePenalty::PerViolation(weight) if weight > 0.0 && weight.is_finite() => {
                Ok(())
            }
            InfeasiblePenalty::PerViolation(weight) => Err(format!(
                "per-violation penalty weight must be finite and positive, got {weight}"
            )),
        }
    }
}

/// Hard and soft constraints for one optimization run.
///
/// Fitness of a chromosome is computed as:
///
/// 1. if any hard constraint returns `false`, the [`InfeasiblePenalty`];
/// 2. otherwise the sum of all soft scores, if there are any;
/// 3. otherwise `0.0`.
///
/// All constraints of one list are evaluated concurrently when the set is
/// parallel (the default). Results are combined in declaration order, so the
/// floating-point sum does not depend on thread scheduling.
///
/// # Examples
///
/// ```
/// use u_evolve::constraint::ConstraintSet;
///
/// let set: ConstraintSet<Vec<f64>> = ConstraintSet::new()
///     .with_hard(|v: &Vec<f64>| -> anyhow::Result<bool> { Ok(v.iter().all(|x| *x >= 0.0)) })
///     .with_soft(|v: &Vec<f64>| -> anyhow::Result<f64> { Ok(v.iter().sum()) });
///
/// let mut rng = rand::rng();
/// assert_eq!(set.score(&vec![1.0, 2.0], &mut rng).unwrap(), 3.0);
/// assert!(set.score(&vec![-1.0, 2.0], &mut rng).unwrap() < 0.0);
/// ```
pub struct ConstraintSet<C> {
    hard: Vec<Box<dyn Constraint<C, bool>>>,
    soft: Vec<Box<dyn Constraint<C, f64>>>,
    penalty: InfeasiblePenalty,
    parallel: bool,
}

impl<C> Default for ConstraintSet<C> {
    fn default() -> Self {
        Self {
            hard: Vec::new(),
            soft: Vec::new(),
            penalty: InfeasiblePenalty::default(),
            parallel: true,
        }
    }
}

impl<C> fmt::Debug for ConstraintSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintSet")
            .field("hard", &self.hard.len())
            .field("soft", &self.soft.len())
            .field("penalty", &self.penalty)
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl<C> ConstraintSet<C> {
    /// Creates an empty set. Every chromosome scores `0.0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a hard (feasibility) constraint.
    pub fn with_hard(mut self, constraint: impl Constraint<C, bool> + 'static) -> Self {
        self.hard.push(Box::new(constraint));
        self
    }

    /// Appends a soft (scoring) constraint.
    pub fn with_soft(mut self, constraint: impl Constraint<C, f64> + 'static) -> Self {
        self.soft.push(Box::new(constraint));
        self
    }

    /// Sets the infeasible penalty policy.
    pub fn with_penalty(mut self, penalty: InfeasiblePenalty) -> Self {
        self.penalty = penalty;
        self
    }

    /// Enables or disables concurrent evaluation of the constraints.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of hard constraints.
    pub fn hard_len(&self) -> usize {
        self.hard.len()
    }

    /// Number of soft constraints.
    pub fn soft_len(&self) -> usize {
        self.soft.len()
    }

    /// Returns `true` if the set holds no constraint at all.
    pub fn is_empty(&self) -> bool {
        self.hard.is_empty() && self.soft.is_empty()
    }

    /// The configured infeasible penalty policy.
    pub fn penalty(&self) -> InfeasiblePenalty {
        self.penalty
    }
}

impl<C: Sync> ConstraintSet<C> {
    /// Computes the fitness of `chromosome`.
    ///
    /// `rng` is only consumed by [`InfeasiblePenalty::Random`].
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::ConstraintEvaluation`] if any evaluated
    /// constraint fails. The remaining evaluations of that list are
    /// abandoned.
    pub fn score<R: Rng>(&self, chromosome: &C, rng: &mut R) -> Result<f64> {
        if !self.hard.is_empty() {
            let verdicts = self.evaluate(&self.hard, ConstraintKind::Hard, chromosome)?;
            let violations = verdicts.iter().filter(|feasible| !**feasible).count();
            if violations > 0 {
                return Ok(self.penalty.penalty(violations, rng));
            }
        }

        if !self.soft.is_empty() {
            let scores = self.evaluate(&self.soft, ConstraintKind::Soft, chromosome)?;
            return Ok(scores.iter().sum());
        }

        Ok(0.0)
    }

    /// Checks every hard constraint and reports whether all of them hold.
    pub fn is_feasible(&self, chromosome: &C) -> Result<bool> {
        let verdicts = self.evaluate(&self.hard, ConstraintKind::Hard, chromosome)?;
        Ok(verdicts.into_iter().all(|feasible| feasible))
    }

    fn evaluate<T: Send>(
        &self,
        constraints: &[Box<dyn Constraint<C, T>>],
        kind: ConstraintKind,
        chromosome: &C,
    ) -> Result<Vec<T>> {
        if self.parallel && constraints.len() > 1 {
            constraints
                .par_iter()
                .enumerate()
                .map(|(index, constraint)| {
                    constraint
                        .compute(chromosome)
                        .map_err(|source| EvolutionError::ConstraintEvaluation {
                            kind,
                            index,
                            source,
                        })
                })
                .collect()
        } else {
            constraints
                .iter()
                .enumerate()
                .map(|(index, constraint)| {
                    constraint
                        .compute(chromosome)
                        .map_err(|source| EvolutionError::ConstraintEvaluation {
                            kind,
                            index,
                            source,
                        })
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn always(value: bool) -> impl Fn(&i32) -> anyhow::Result<bool> + Send + Sync {
        move |_: &i32| Ok(value)
    }

    fn constant(value: f64) -> impl Fn(&i32) -> anyhow::Result<f64> + Send + Sync {
        move |_: &i32| Ok(value)
    }

    #[test]
    fn test_empty_set_scores_zero() {
        let set: ConstraintSet<i32> = ConstraintSet::new();
        let mut rng = create_rng(Some(1));
        assert_eq!(set.score(&5, &mut rng).unwrap(), 0.0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_soft_scores_are_summed() {
        let set = ConstraintSet::new()
            .with_soft(constant(1.5))
            .with_soft(constant(2.0))
            .with_soft(|x: &i32| -> anyhow::Result<f64> { Ok(*x as f64) });
        let mut rng = create_rng(Some(1));
        assert_eq!(set.score(&10, &mut rng).unwrap(), 13.5);
    }

    #[test]
    fn test_feasible_with_no_soft_is_zero() {
        let set = ConstraintSet::new().with_hard(always(true));
        let mut rng = create_rng(Some(1));
        assert_eq!(set.score(&0, &mut rng).unwrap(), 0.0);
    }

    #[test]
    fn test_infeasible_is_strictly_negative() {
        let set = ConstraintSet::new()
            .with_hard(always(true))
            .with_hard(always(false))
            .with_soft(constant(100.0));
        let mut rng = create_rng(Some(9));
        for _ in 0..1000 {
            let f = set.score(&0, &mut rng).unwrap();
            assert!(f < 0.0 && f >= -1.0, "random penalty out of range: {f}");
        }
    }

    #[test]
    fn test_soft_not_evaluated_when_infeasible() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let set = ConstraintSet::new()
            .with_hard(always(false))
            .with_soft(move |_: &i32| -> anyhow::Result<f64> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(1.0)
            });
        let mut rng = create_rng(Some(1));
        set.score(&0, &mut rng).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fixed_penalty() {
        let set = ConstraintSet::new()
            .with_hard(always(false))
            .with_penalty(InfeasiblePenalty::Fixed(-1e6));
        let mut rng = create_rng(Some(1));
        assert_eq!(set.score(&0, &mut rng).unwrap(), -1e6);
    }

    #[test]
    fn test_per_violation_penalty() {
        let set = ConstraintSet::new()
            .with_hard(always(false))
            .with_hard(always(true))
            .with_hard(always(false))
            .with_penalty(InfeasiblePenalty::PerViolation(10.0));
        let mut rng = create_rng(Some(1));
        assert_eq!(set.score(&0, &mut rng).unwrap(), -20.0);
    }

    #[test]
    fn test_random_penalty_reproducible() {
        let set = ConstraintSet::new().with_hard(always(false));
        let a = set.score(&0, &mut create_rng(Some(77))).unwrap();
        let b = set.score(&0, &mut create_rng(Some(77))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_failure_reports_kind_and_index() {
        let set = ConstraintSet::new()
            .with_soft(constant(1.0))
            .with_soft(|_: &i32| -> anyhow::Result<f64> { anyhow::bail!("bad input") });
        let mut rng = create_rng(Some(1));
        match set.score(&0, &mut rng) {
            Err(EvolutionError::ConstraintEvaluation { kind, index, .. }) => {
                assert_eq!(kind, ConstraintKind::Soft);
                assert_eq!(index, 1);
            }
            other => panic!("expected constraint error, got {other:?}"),
        }
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let build = |parallel| {
            ConstraintSet::new()
                .with_soft(constant(0.1))
                .with_soft(constant(0.2))
                .with_soft(constant(0.3))
                .with_parallel(parallel)
        };
        let mut rng = create_rng(Some(1));
        let par = build(true).score(&0, &mut rng).unwrap();
        let seq = build(false).score(&0, &mut rng).unwrap();
        assert_eq!(par.to_bits(), seq.to_bits());
    }

    #[test]
    fn test_is_feasible() {
        let set = ConstraintSet::new()
            .with_hard(|x: &i32| -> anyhow::Result<bool> { Ok(*x > 0) });
        assert!(set.is_feasible(&1).unwrap());
        assert!(!set.is_feasible(&-1).unwrap());
    }

    #[test]
    fn test_penalty_validation() {
        assert!(InfeasiblePenalty::Random.validate().is_ok());
        assert!(InfeasiblePenalty::Fixed(-5.0).validate().is_ok());
        assert!(InfeasiblePenalty::Fixed(0.0).validate().is_err());
        assert!(InfeasiblePenalty::Fixed(f64::NEG_INFINITY).validate().is_err());
        assert!(InfeasiblePenalty::PerViolation(1.0).validate().is_ok());
        assert!(InfeasiblePenalty::PerViolation(-1.0).validate().is_err());
    }
}
