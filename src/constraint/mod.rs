//! Constraint abstraction.
//!
//! Constraints are pure evaluators over a chromosome. Two flavours share a
//! single trait, [`Constraint<C, T>`]:
//!
//! - **Hard** (`T = bool`): a feasibility predicate. Any failing hard
//!   constraint makes the chromosome infeasible, and its fitness becomes a
//!   strictly negative penalty.
//! - **Soft** (`T = f64`): a score. The fitness of a feasible chromosome is
//!   the sum of all soft scores.
//!
//! A [`ConstraintSet`] groups both lists together with the
//! [`InfeasiblePenalty`] policy and computes the scalar fitness.

mod set;
mod types;

pub use set::{ConstraintSet, InfeasiblePenalty};
pub use types::{Constraint, HardConstraint, SoftConstraint};
