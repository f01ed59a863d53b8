//! Bound- and equality-constrained quadratic subproblem.
//!
//! ```text
//! min ½ dᵀBd + gᵀd   s.t.   A d = b,   l ≤ d ≤ u
//! ```
//!
//! Solved with a primal active-set method over the bound constraints. Each
//! working set is handled by one KKT solve in which active bounds appear as
//! extra equality rows `d_i = l_i` (or `u_i`).
//!
//! The iteration needs a starting point that already satisfies every
//! constraint. The origin (clamped into the box) is used when it does;
//! otherwise `‖A d − b‖²` is minimized over the box with the same
//! iteration, and the problem is infeasible when that minimum is not zero.

use ldi_core::Real;
use nalgebra::{DMatrix, DVector};

const BOUND_TOL: Real = 1e-12;
const STEP_TOL: Real = 1e-11;
const MULTIPLIER_TOL: Real = 1e-10;
const FEASIBILITY_TOL: Real = 1e-9;

/// Problem data for one quadratic subproblem.
pub(crate) struct QpProblem<'a> {
    pub hessian: &'a DMatrix<Real>,
    pub gradient: &'a DVector<Real>,
    pub eq_matrix: &'a DMatrix<Real>,
    pub eq_rhs: &'a DVector<Real>,
    pub lower: &'a DVector<Real>,
    pub upper: &'a DVector<Real>,
}

/// Outcome of [`solve`].
#[derive(Debug)]
pub(crate) enum QpOutcome {
    Solved {
        step: DVector<Real>,
        multipliers: DVector<Real>,
    },
    Infeasible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy)]
struct ActiveBound {
    index: usize,
    side: Side,
    value: Real,
}

struct KktSolution {
    step: DVector<Real>,
    eq_multipliers: DVector<Real>,
    bound_multipliers: DVector<Real>,
}

pub(crate) fn solve(p: &QpProblem<'_>) -> QpOutcome {
    match feasible_point(p) {
        Some(start) => {
            let (step, multipliers) = active_set(p, start);
            QpOutcome::Solved { step, multipliers }
        }
        None => QpOutcome::Infeasible,
    }
}

/// A point of the box satisfying `A d = b`, if one exists.
fn feasible_point(p: &QpProblem<'_>) -> Option<DVector<Real>> {
    let n = p.gradient.len();
    let tol = FEASIBILITY_TOL * (1.0 + max_abs(p.eq_rhs));
    let origin = DVector::from_fn(n, |i, _| p.lower[i].max(0.0).min(p.upper[i]));
    if equality_residual(p, &origin) <= tol {
        return Some(origin);
    }

    // min ½‖A d − b‖² over the box
    let hessian = p.eq_matrix.tr_mul(p.eq_matrix);
    let gradient = -p.eq_matrix.tr_mul(p.eq_rhs);
    let no_rows = DMatrix::<Real>::zeros(0, n);
    let no_rhs = DVector::<Real>::zeros(0);
    let least_squares = QpProblem {
        hessian: &hessian,
        gradient: &gradient,
        eq_matrix: &no_rows,
        eq_rhs: &no_rhs,
        lower: p.lower,
        upper: p.upper,
    };
    let (point, _) = active_set(&least_squares, origin);
    (equality_residual(p, &point) <= tol).then_some(point)
}

fn equality_residual(p: &QpProblem<'_>, d: &DVector<Real>) -> Real {
    max_abs(&(p.eq_matrix * d - p.eq_rhs))
}

fn max_abs(v: &DVector<Real>) -> Real {
    v.iter().fold(0.0, |acc: Real, x| acc.max(x.abs()))
}

/// Active-set iteration from a point satisfying every constraint. Iterates
/// stay feasible; on the iteration cap the last iterate is returned.
fn active_set(p: &QpProblem<'_>, start: DVector<Real>) -> (DVector<Real>, DVector<Real>) {
    let n = p.gradient.len();
    let m = p.eq_matrix.nrows();
    let max_iterations = 10 * (n + m) + 20;

    let mut working: Vec<ActiveBound> = Vec::new();
    let mut current = start;
    let mut multipliers = DVector::<Real>::zeros(m);

    for _ in 0..max_iterations {
        let Some(kkt) = solve_kkt(p, &working) else {
            break;
        };
        multipliers = kkt.eq_multipliers;

        let direction = &kkt.step - &current;
        if max_abs(&direction) <= STEP_TOL {
            let release = working
                .iter()
                .enumerate()
                .map(|(q, b)| {
                    let mu = kkt.bound_multipliers[q];
                    let wrong_sign = match b.side {
                        Side::Lower => -mu,
                        Side::Upper => mu,
                    };
                    (q, wrong_sign)
                })
                .filter(|(_, w)| *w > MULTIPLIER_TOL)
                .max_by(|a, b| a.1.total_cmp(&b.1));
            match release {
                Some((q, _)) => {
                    working.remove(q);
                    current = kkt.step;
                }
                None => return (kkt.step, multipliers),
            }
            continue;
        }

        // step towards the working-set minimizer, stopping at the first bound
        let mut alpha: Real = 1.0;
        let mut blocking: Option<(usize, Side)> = None;
        for i in 0..n {
            if working.iter().any(|b| b.index == i) {
                continue;
            }
            let (ratio, side) = if direction[i] < -BOUND_TOL {
                ((p.lower[i] - current[i]) / direction[i], Side::Lower)
            } else if direction[i] > BOUND_TOL {
                ((p.upper[i] - current[i]) / direction[i], Side::Upper)
            } else {
                continue;
            };
            if ratio < alpha {
                alpha = ratio.max(0.0);
                blocking = Some((i, side));
            }
        }

        current += &direction * alpha;
        if let Some((index, side)) = blocking {
            let value = bound_value(p, index, side);
            current[index] = value;
            working.push(ActiveBound { index, side, value });
        }
    }

    (current, multipliers)
}

fn bound_value(p: &QpProblem<'_>, index: usize, side: Side) -> Real {
    match side {
        Side::Lower => p.lower[index],
        Side::Upper => p.upper[index],
    }
}

/// Solve the KKT system for the current working set.
///
/// Layout, with `E` the rows selecting the fixed coordinates:
///
/// ```text
/// [ B  −Aᵀ  −Eᵀ ] [ d ]   [ −g ]
/// [ A   0    0  ] [ λ ] = [  b ]
/// [ E   0    0  ] [ μ ]   [ v  ]
/// ```
///
/// Returns `None` when the system is inconsistent, i.e. the equality rows
/// plus the fixed coordinates admit no solution.
fn solve_kkt(p: &QpProblem<'_>, working: &[ActiveBound]) -> Option<KktSolution> {
    let n = p.gradient.len();
    let m = p.eq_matrix.nrows();
    let k = working.len();
    let dim = n + m + k;

    let mut kkt = DMatrix::<Real>::zeros(dim, dim);
    let mut rhs = DVector::<Real>::zeros(dim);

    kkt.view_mut((0, 0), (n, n)).copy_from(p.hessian);
    for r in 0..m {
        for c in 0..n {
            let a = p.eq_matrix[(r, c)];
            kkt[(n + r, c)] = a;
            kkt[(c, n + r)] = -a;
        }
        rhs[n + r] = p.eq_rhs[r];
    }
    for (q, b) in working.iter().enumerate() {
        kkt[(n + m + q, b.index)] = 1.0;
        kkt[(b.index, n + m + q)] = -1.0;
        rhs[n + m + q] = b.value;
    }
    for i in 0..n {
        rhs[i] = -p.gradient[i];
    }

    let svd = kkt.clone().svd(true, true);
    let cutoff = 1e-12 * svd.singular_values.max().max(1.0);
    let solution = svd.solve(&rhs, cutoff).ok()?;

    let residual = (&kkt * &solution - &rhs).amax();
    if !residual.is_finite() || residual > 1e-8 * (1.0 + rhs.amax()) {
        return None;
    }

    Some(KktSolution {
        step: solution.rows(0, n).into_owned(),
        eq_multipliers: solution.rows(n, m).into_owned(),
        bound_multipliers: solution.rows(n + m, k).into_owned(),
    })
}
