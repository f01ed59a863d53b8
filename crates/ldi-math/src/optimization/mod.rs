//! Constrained optimization framework.
//!
//! Provides the objective / constraint traits, box bounds, end criteria, and
//! a sequential quadratic programming minimizer ([`Sqp`]) for problems of
//! the form
//!
//! ```text
//! min f(x)   s.t.   c_j(x) = 0  (j = 1..m),   lo ≤ x ≤ hi
//! ```
//!
//! Constraints are plain descriptor values implementing
//! [`EqualityConstraint`]; the solver never needs to know what they mean.

mod qp;
mod sqp;

pub use sqp::Sqp;

use crate::array::Array;
use ldi_core::{ensure, ensure_dim, errors::Result, Real, Size};

// ── Objective & constraint traits ─────────────────────────────────────────────

/// A scalar objective function `f(x)`.
pub trait ObjectiveFunction {
    /// Evaluate the objective at `x`.
    fn value(&self, x: &Array) -> Real;

    /// Gradient of the objective. Default uses central finite differences.
    fn gradient(&self, x: &Array) -> Array {
        finite_difference_gradient(|p| self.value(p), x)
    }
}

/// An equality constraint `c(x) = 0`.
pub trait EqualityConstraint {
    /// Evaluate the constraint residual at `x`; zero when satisfied.
    fn value(&self, x: &Array) -> Real;

    /// Gradient of the residual. Default uses central finite differences.
    fn gradient(&self, x: &Array) -> Array {
        finite_difference_gradient(|p| self.value(p), x)
    }
}

/// Central finite-difference gradient of `f` at `x`.
pub fn finite_difference_gradient<F: Fn(&Array) -> Real>(f: F, x: &Array) -> Array {
    let n = x.size();
    let mut grad = Array::zeros(n);
    let mut shifted = x.clone();
    for j in 0..n {
        let h = 1e-7 * x[j].abs().max(1.0);
        shifted[j] = x[j] + h;
        let up = f(&shifted);
        shifted[j] = x[j] - h;
        let down = f(&shifted);
        shifted[j] = x[j];
        grad[j] = (up - down) / (2.0 * h);
    }
    grad
}

// ── Bounds ────────────────────────────────────────────────────────────────────

/// Per-coordinate box bounds `lower_i ≤ x_i ≤ upper_i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Array,
    upper: Array,
}

impl Bounds {
    /// Create bounds from explicit lower and upper vectors.
    pub fn new(lower: Array, upper: Array) -> Result<Self> {
        ensure_dim!("upper bounds", lower.size(), upper.size());
        ensure!(
            lower.iter().zip(upper.iter()).all(|(lo, hi)| lo <= hi),
            "every lower bound must not exceed its upper bound"
        );
        Ok(Self { lower, upper })
    }

    /// The same interval `[lo, hi]` for each of `n` coordinates.
    pub fn uniform(n: Size, lo: Real, hi: Real) -> Self {
        Self {
            lower: Array::from_element(n, lo),
            upper: Array::from_element(n, hi),
        }
    }

    /// `[0, 1]` for each of `n` coordinates (long-only, unlevered weights).
    pub fn unit(n: Size) -> Self {
        Self::uniform(n, 0.0, 1.0)
    }

    /// Number of bounded coordinates.
    pub fn size(&self) -> Size {
        self.lower.size()
    }

    /// Lower bounds.
    pub fn lower(&self) -> &Array {
        &self.lower
    }

    /// Upper bounds.
    pub fn upper(&self) -> &Array {
        &self.upper
    }

    /// Return `true` if every coordinate of `x` lies within its bounds.
    pub fn contains(&self, x: &Array) -> bool {
        x.size() == self.size()
            && (0..x.size()).all(|i| x[i] >= self.lower[i] && x[i] <= self.upper[i])
    }

    /// Project `x` onto the box.
    pub fn clamp(&self, x: &Array) -> Array {
        let mut out = x.clone();
        for i in 0..out.size() {
            out[i] = out[i].max(self.lower[i]).min(self.upper[i]);
        }
        out
    }
}

// ── End criteria ──────────────────────────────────────────────────────────────

/// Criteria to stop an optimization.
#[derive(Debug, Clone, PartialEq)]
pub struct EndCriteria {
    /// Maximum number of outer iterations.
    pub max_iterations: usize,
    /// Stop when the largest search-direction component drops below this
    /// while the constraints are satisfied.
    pub step_tolerance: Real,
    /// Stop when a full step changes the objective by less than this
    /// (relative to `1 + |f|`) while the constraints are satisfied.
    pub function_epsilon: Real,
    /// Largest constraint residual accepted as "satisfied".
    pub feasibility_tolerance: Real,
}

impl EndCriteria {
    /// Create new end criteria.
    pub fn new(
        max_iterations: usize,
        step_tolerance: Real,
        function_epsilon: Real,
        feasibility_tolerance: Real,
    ) -> Self {
        Self {
            max_iterations,
            step_tolerance,
            function_epsilon,
            feasibility_tolerance,
        }
    }

    /// Override the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Default for EndCriteria {
    fn default() -> Self {
        Self::new(100, 1e-10, 1e-12, 1e-8)
    }
}

/// The reason an optimization terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCriteriaType {
    /// Search direction vanished at a feasible point.
    StepTolerance,
    /// Objective stopped changing at a feasible point.
    FunctionEpsilon,
    /// Maximum iterations reached.
    MaxIterations,
    /// The linearised constraints cannot be satisfied within the bounds.
    IncompatibleConstraints,
    /// No step along the search direction decreased the merit function.
    LineSearchFailure,
}

impl EndCriteriaType {
    /// `true` for the two convergence outcomes.
    pub fn is_success(self) -> bool {
        matches!(self, Self::StepTolerance | Self::FunctionEpsilon)
    }
}

/// Result of an optimization.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Final parameter values (the best-effort iterate when not converged).
    pub x: Array,
    /// Objective value at `x`.
    pub value: Real,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Reason for termination.
    pub end_type: EndCriteriaType,
    /// Largest absolute constraint residual at `x`.
    pub constraint_violation: Real,
}

impl OptimizationResult {
    /// `true` if the solver converged to a feasible point.
    pub fn is_optimal(&self) -> bool {
        self.end_type.is_success()
    }
}
