//! Sequential quadratic programming with box bounds and equality constraints.
//!
//! Each iteration solves the quadratic model
//!
//! ```text
//! min ½ dᵀBd + ∇f·d   s.t.   J d = −c,   lo − x ≤ d ≤ hi − x
//! ```
//!
//! where `B` is a damped BFGS approximation of the Hessian of the
//! Lagrangian `f − λᵀc`, then backtracks along `d` on the L1 merit function
//! `f + ρ‖c‖₁`. Iterates never leave the box.

use super::qp::{self, QpOutcome, QpProblem};
use super::{Bounds, EndCriteria, EndCriteriaType, EqualityConstraint, ObjectiveFunction, OptimizationResult};
use crate::array::Array;
use ldi_core::{ensure_dim, errors::Result, Real};
use nalgebra::{DMatrix, DVector};
use tracing::debug;

const ARMIJO: Real = 1e-4;
const MAX_BACKTRACKS: usize = 40;

/// Sequential quadratic programming minimizer.
///
/// Non-convergence is reported through [`OptimizationResult::end_type`],
/// never as an error; callers decide whether a best-effort iterate is
/// acceptable.
#[derive(Debug, Clone, Default)]
pub struct Sqp {
    end_criteria: EndCriteria,
}

struct Evaluation {
    value: Real,
    gradient: DVector<Real>,
    residuals: DVector<Real>,
    jacobian: DMatrix<Real>,
}

impl Evaluation {
    fn at<F: ObjectiveFunction + ?Sized>(
        objective: &F,
        constraints: &[&dyn EqualityConstraint],
        x: &Array,
    ) -> Self {
        let n = x.size();
        let m = constraints.len();
        let mut jacobian = DMatrix::zeros(m, n);
        let mut residuals = DVector::zeros(m);
        for (j, c) in constraints.iter().enumerate() {
            residuals[j] = c.value(x);
            let grad = c.gradient(x);
            for i in 0..n {
                jacobian[(j, i)] = grad[i];
            }
        }
        Self {
            value: objective.value(x),
            gradient: objective.gradient(x).inner().clone(),
            residuals,
            jacobian,
        }
    }

    fn violation(&self) -> Real {
        self.residuals.iter().fold(0.0, |acc: Real, c| acc.max(c.abs()))
    }

    fn merit(&self, penalty: Real) -> Real {
        self.value + penalty * self.residuals.lp_norm(1)
    }

    fn lagrangian_gradient(&self, multipliers: &DVector<Real>) -> DVector<Real> {
        &self.gradient - self.jacobian.tr_mul(multipliers)
    }
}

impl Sqp {
    /// Create a minimizer with the given end criteria.
    pub fn new(end_criteria: EndCriteria) -> Self {
        Self { end_criteria }
    }

    /// The end criteria in use.
    pub fn end_criteria(&self) -> &EndCriteria {
        &self.end_criteria
    }

    /// Minimize `objective` subject to `constraints` and `bounds`, starting
    /// from `initial` (projected onto the box first).
    ///
    /// Only dimension mismatches are errors.
    pub fn minimize<F: ObjectiveFunction + ?Sized>(
        &self,
        objective: &F,
        constraints: &[&dyn EqualityConstraint],
        bounds: &Bounds,
        initial: &Array,
    ) -> Result<OptimizationResult> {
        let n = initial.size();
        ensure_dim!("bounds", n, bounds.size());
        let ec = &self.end_criteria;

        let lower = bounds.lower().inner();
        let upper = bounds.upper().inner();

        let mut x = bounds.clamp(initial);
        let mut eval = Evaluation::at(objective, constraints, &x);
        let mut hessian = DMatrix::<Real>::identity(n, n);
        let mut penalty: Real = 1.0;

        let finish = |x: Array, eval: &Evaluation, iterations: usize, end_type| OptimizationResult {
            x,
            value: eval.value,
            iterations,
            end_type,
            constraint_violation: eval.violation(),
        };

        for iteration in 0..ec.max_iterations {
            let xv = x.inner();
            let lo = lower - xv;
            let hi = upper - xv;
            let rhs = -&eval.residuals;
            let outcome = qp::solve(&QpProblem {
                hessian: &hessian,
                gradient: &eval.gradient,
                eq_matrix: &eval.jacobian,
                eq_rhs: &rhs,
                lower: &lo,
                upper: &hi,
            });
            let (step, multipliers) = match outcome {
                QpOutcome::Solved { step, multipliers } => (step, multipliers),
                QpOutcome::Infeasible => {
                    return Ok(finish(x, &eval, iteration, EndCriteriaType::IncompatibleConstraints));
                }
            };

            let violation = eval.violation();
            let feasible = violation <= ec.feasibility_tolerance;
            let step_size = step.amax();
            debug!(iteration, value = eval.value, violation, step_size, "sqp iteration");

            if step_size <= ec.step_tolerance && feasible {
                return Ok(finish(x, &eval, iteration, EndCriteriaType::StepTolerance));
            }

            let largest_multiplier = multipliers.iter().fold(0.0, |acc: Real, l| acc.max(l.abs()));
            penalty = penalty.max(1.5 * largest_multiplier);
            // with infeasibility, also large enough that the step is a descent
            // direction for the merit function whatever the multipliers
            let infeasibility = eval.residuals.lp_norm(1);
            if infeasibility > 0.0 {
                let model_change = eval.gradient.dot(&step) + 0.5 * step.dot(&(&hessian * &step));
                penalty = penalty.max(model_change / (0.5 * infeasibility));
            }

            let merit0 = eval.merit(penalty);
            let slope = eval.gradient.dot(&step) - penalty * infeasibility;
            if slope >= 0.0 {
                let end_type = if feasible {
                    EndCriteriaType::StepTolerance
                } else {
                    EndCriteriaType::LineSearchFailure
                };
                return Ok(finish(x, &eval, iteration, end_type));
            }

            let mut alpha: Real = 1.0;
            let mut accepted = None;
            for _ in 0..MAX_BACKTRACKS {
                let trial = bounds.clamp(&Array::from(xv + &step * alpha));
                let trial_eval = Evaluation::at(objective, constraints, &trial);
                if trial_eval.merit(penalty) <= merit0 + ARMIJO * alpha * slope {
                    accepted = Some((trial, trial_eval));
                    break;
                }
                alpha *= 0.5;
            }
            let Some((x_new, eval_new)) = accepted else {
                let end_type = if feasible {
                    EndCriteriaType::StepTolerance
                } else {
                    EndCriteriaType::LineSearchFailure
                };
                return Ok(finish(x, &eval, iteration, end_type));
            };

            // damped BFGS update on the Lagrangian gradient
            let s = x_new.inner() - xv;
            let y = eval_new.lagrangian_gradient(&multipliers) - eval.lagrangian_gradient(&multipliers);
            let bs = &hessian * &s;
            let sbs = s.dot(&bs);
            let sy = s.dot(&y);
            if sbs > Real::MIN_POSITIVE {
                let r = if sy < 0.2 * sbs {
                    let theta = 0.8 * sbs / (sbs - sy);
                    &y * theta + &bs * (1.0 - theta)
                } else {
                    y
                };
                let sr = s.dot(&r);
                if sr > Real::MIN_POSITIVE {
                    hessian -= &bs * bs.transpose() / sbs;
                    hessian += &r * r.transpose() / sr;
                }
            }

            let change = (eval_new.value - eval.value).abs();
            let scale = 1.0 + eval.value.abs();
            x = x_new;
            eval = eval_new;

            if alpha == 1.0
                && change <= ec.function_epsilon * scale
                && eval.violation() <= ec.feasibility_tolerance
            {
                return Ok(finish(x, &eval, iteration + 1, EndCriteriaType::FunctionEpsilon));
            }
        }

        Ok(finish(x, &eval, ec.max_iterations, EndCriteriaType::MaxIterations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix;

    struct Paraboloid {
        center: Array,
    }

    impl ObjectiveFunction for Paraboloid {
        fn value(&self, x: &Array) -> Real {
            let d = x - &self.center;
            d.dot(&d)
        }
        fn gradient(&self, x: &Array) -> Array {
            &(x - &self.center) * 2.0
        }
    }

    struct SumTo(Real);

    impl EqualityConstraint for SumTo {
        fn value(&self, x: &Array) -> Real {
            x.sum() - self.0
        }
    }

    struct Variance(Matrix);

    impl ObjectiveFunction for Variance {
        fn value(&self, x: &Array) -> Real {
            self.0.quadratic_form(x)
        }
    }

    #[test]
    fn projects_center_onto_hyperplane() {
        let f = Paraboloid {
            center: Array::from_slice(&[0.8, 0.8]),
        };
        let sum = SumTo(1.0);
        let res = Sqp::default()
            .minimize(&f, &[&sum], &Bounds::unit(2), &Array::from_slice(&[1.0, 0.0]))
            .unwrap();
        assert!(res.is_optimal(), "{:?}", res.end_type);
        assert!((res.x[0] - 0.5).abs() < 1e-7, "x = {}", res.x);
        assert!((res.x[1] - 0.5).abs() < 1e-7, "x = {}", res.x);
        assert!(res.constraint_violation < 1e-8);
    }

    #[test]
    fn bound_becomes_active() {
        let f = Paraboloid {
            center: Array::from_slice(&[0.9, -0.2, 0.5]),
        };
        let sum = SumTo(1.0);
        let res = Sqp::default()
            .minimize(&f, &[&sum], &Bounds::unit(3), &Array::from_element(3, 1.0 / 3.0))
            .unwrap();
        assert!(res.is_optimal(), "{:?}", res.end_type);
        // x1 pinned at 0, remaining mass split so that x0 − 0.9 = x2 − 0.5
        assert!(res.x[1].abs() < 1e-8, "x = {}", res.x);
        assert!((res.x[0] - 0.7).abs() < 1e-6, "x = {}", res.x);
        assert!((res.x[2] - 0.3).abs() < 1e-6, "x = {}", res.x);
    }

    #[test]
    fn two_asset_minimum_variance() {
        // σ² = 0.04 w0² + 0.02 w1² + 0.02 w0 w1, w0 + w1 = 1
        // d/dw0: 0.08 w0 − 0.04 (1 − w0) + 0.02 (1 − 2 w0) = 0 → w0 = 0.2
        let cov = Matrix::from_row_slice(2, 2, &[0.04, 0.01, 0.01, 0.02]);
        let sum = SumTo(1.0);
        let res = Sqp::default()
            .minimize(&Variance(cov), &[&sum], &Bounds::unit(2), &Array::from_slice(&[0.5, 0.5]))
            .unwrap();
        assert!(res.is_optimal(), "{:?}", res.end_type);
        assert!((res.x[0] - 0.2).abs() < 1e-6, "x = {}", res.x);
        assert!((res.x[1] - 0.8).abs() < 1e-6, "x = {}", res.x);
    }

    #[test]
    fn constant_correlation_minimum_variance() {
        let vols = [0.1048, 0.1451, 0.1961, 0.2012];
        let mut entries = Vec::with_capacity(16);
        for (i, vi) in vols.iter().enumerate() {
            for (j, vj) in vols.iter().enumerate() {
                entries.push(if i == j { vi * vi } else { 0.285 * vi * vj });
            }
        }
        let cov = Matrix::from_row_slice(4, 4, &entries);
        let sum = SumTo(1.0);
        let res = Sqp::default()
            .minimize(&Variance(cov), &[&sum], &Bounds::unit(4), &Array::from_element(4, 0.25))
            .unwrap();
        assert!(res.is_optimal(), "{:?}", res.end_type);
        // interior minimum Σ⁻¹1 / 1ᵀΣ⁻¹1
        let expected = [0.641746, 0.238942, 0.064422, 0.054890];
        for i in 0..4 {
            assert!((res.x[i] - expected[i]).abs() < 1e-5, "x = {}", res.x);
        }
    }

    #[test]
    fn incompatible_constraints_are_flagged() {
        let f = Paraboloid {
            center: Array::zeros(2),
        };
        let sum = SumTo(3.0);
        let res = Sqp::default()
            .minimize(&f, &[&sum], &Bounds::unit(2), &Array::from_slice(&[0.5, 0.5]))
            .unwrap();
        assert_eq!(res.end_type, EndCriteriaType::IncompatibleConstraints);
        assert!(!res.is_optimal());
        assert!(res.constraint_violation > 0.9);
    }

    #[test]
    fn bounds_dimension_is_checked() {
        let f = Paraboloid {
            center: Array::zeros(2),
        };
        let err = Sqp::default()
            .minimize(&f, &[], &Bounds::unit(3), &Array::zeros(2))
            .unwrap_err();
        assert!(matches!(err, ldi_core::Error::DimensionMismatch { .. }));
    }

    #[test]
    fn iterates_stay_in_box_without_constraints() {
        let f = Paraboloid {
            center: Array::from_slice(&[2.0, -3.0]),
        };
        let res = Sqp::default()
            .minimize(&f, &[], &Bounds::unit(2), &Array::from_slice(&[0.5, 0.5]))
            .unwrap();
        assert!(res.is_optimal());
        assert!((res.x[0] - 1.0).abs() < 1e-12);
        assert!(res.x[1].abs() < 1e-12);
    }
}
