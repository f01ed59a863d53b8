//! # ldi-math
//!
//! Numerical building blocks: array/matrix newtypes (over nalgebra),
//! constrained optimization, return statistics (via statrs) and seedable
//! random number generation.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// One-dimensional real vectors.
pub mod array;

/// Floating-point comparison utilities.
pub mod comparison;

/// Two-dimensional real matrices.
pub mod matrix;

/// Constrained minimization.
pub mod optimization;

/// Random number generators.
pub mod random_numbers;

/// Return statistics.
pub mod statistics;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use array::Array;
pub use comparison::is_negligible;
pub use matrix::Matrix;
pub use optimization::{
    Bounds, EndCriteria, EndCriteriaType, EqualityConstraint, ObjectiveFunction,
    OptimizationResult, Sqp,
};
pub use random_numbers::MersenneTwisterRng;
