//! Efficient frontier via constrained volatility minimization.
//!
//! Every solve is fully invested (`Σw = 1`), long only (`0 ≤ w ≤ 1`) and
//! starts from the equal-weight portfolio.

use crate::objectives::{NegativeSharpeRatio, PortfolioVolatility, ReturnIsTarget, WeightsSumToOne};
use crate::portfolio::{equal_weights, portfolio_return, portfolio_vol, validate_covariance};
use ldi_core::{ensure, ensure_dim, errors::Error, errors::Result, Rate, Real, Size, Volatility};
use ldi_math::{Array, Bounds, EndCriteria, EndCriteriaType, EqualityConstraint, Matrix, OptimizationResult, Sqp};
use tracing::{debug, warn};

/// How a weight vector came out of the optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolveStatus {
    /// Converged to a feasible point.
    Optimal,
    /// The solver stopped early; the weights are its last iterate and may
    /// violate the constraints.
    BestEffort {
        /// Why the solver stopped.
        reason: EndCriteriaType,
        /// Largest absolute equality residual at the returned weights.
        constraint_violation: Real,
    },
}

/// Weights returned by a frontier solve, tagged with their status.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedWeights {
    /// Portfolio weights.
    pub weights: Array,
    /// Whether `weights` is a converged optimum.
    pub status: SolveStatus,
    /// SQP iterations used.
    pub iterations: usize,
}

impl OptimizedWeights {
    fn from_result(result: OptimizationResult, problem: &str) -> Self {
        let status = if result.is_optimal() {
            SolveStatus::Optimal
        } else {
            warn!(
                problem,
                reason = ?result.end_type,
                iterations = result.iterations,
                violation = result.constraint_violation,
                "optimizer returned a best-effort point"
            );
            SolveStatus::BestEffort {
                reason: result.end_type,
                constraint_violation: result.constraint_violation,
            }
        };
        Self {
            weights: result.x,
            status,
            iterations: result.iterations,
        }
    }

    /// `true` when the solve converged.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// The weights if optimal, otherwise [`Error::InfeasibleConstraint`].
    pub fn into_optimal(self) -> Result<Array> {
        match self.status {
            SolveStatus::Optimal => Ok(self.weights),
            SolveStatus::BestEffort {
                reason,
                constraint_violation,
            } => Err(Error::InfeasibleConstraint(format!(
                "solver stopped with {reason:?}, constraint violation {constraint_violation:e}"
            ))),
        }
    }
}

/// One point on a frontier.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontierPoint {
    /// Return the point was solved for.
    pub target_return: Rate,
    /// Achieved portfolio return.
    pub ret: Rate,
    /// Portfolio volatility.
    pub volatility: Volatility,
    /// Portfolio weights.
    pub weights: Array,
    /// Status of the solve that produced `weights`.
    pub status: SolveStatus,
}

/// Minimum-variance and maximum-Sharpe portfolios over a common optimizer.
#[derive(Debug, Clone, Default)]
pub struct FrontierEngine {
    optimizer: Sqp,
}

impl FrontierEngine {
    /// Engine whose solves stop on `end_criteria`.
    pub fn new(end_criteria: EndCriteria) -> Self {
        Self {
            optimizer: Sqp::new(end_criteria),
        }
    }

    /// The optimizer's end criteria.
    pub fn end_criteria(&self) -> &EndCriteria {
        self.optimizer.end_criteria()
    }

    /// Minimum-volatility weights whose return equals `target_return`.
    ///
    /// A target outside `[min(er), max(er)]` cannot be met with long-only
    /// weights; the result is then [`SolveStatus::BestEffort`].
    pub fn minimize_vol(&self, target_return: Rate, er: &Array, cov: &Matrix) -> Result<OptimizedWeights> {
        let n = check_inputs(er, cov)?;
        let objective = PortfolioVolatility { cov };
        let target = ReturnIsTarget {
            target: target_return,
            returns: er,
        };
        let constraints: [&dyn EqualityConstraint; 2] = [&WeightsSumToOne, &target];
        let result = self
            .optimizer
            .minimize(&objective, &constraints, &Bounds::unit(n), &equal_weights(n))?;
        Ok(OptimizedWeights::from_result(result, "minimize_vol"))
    }

    /// [`minimize_vol`](Self::minimize_vol) at `n_points` targets spaced
    /// evenly from `min(er)` to `max(er)`. A single point uses `min(er)`.
    pub fn optimal_weights(&self, n_points: Size, er: &Array, cov: &Matrix) -> Result<Vec<OptimizedWeights>> {
        target_returns(n_points, er)?
            .iter()
            .map(|t| self.minimize_vol(*t, er, cov))
            .collect()
    }

    /// Weights maximizing `(wᵀer − riskfree_rate) / σ(w)`.
    ///
    /// The equal-weight portfolio must carry risk under `cov`; otherwise
    /// the ratio is undefined at the starting point and the call fails with
    /// [`Error::DegenerateInput`].
    pub fn max_sharpe(&self, riskfree_rate: Rate, er: &Array, cov: &Matrix) -> Result<OptimizedWeights> {
        let n = check_inputs(er, cov)?;
        let start = equal_weights(n);
        if portfolio_vol(&start, cov)? == 0.0 {
            return Err(Error::DegenerateInput(
                "equal-weight portfolio has zero volatility".into(),
            ));
        }
        let objective = NegativeSharpeRatio {
            riskfree_rate,
            returns: er,
            cov,
        };
        let constraints: [&dyn EqualityConstraint; 1] = [&WeightsSumToOne];
        let result = self
            .optimizer
            .minimize(&objective, &constraints, &Bounds::unit(n), &start)?;
        Ok(OptimizedWeights::from_result(result, "max_sharpe"))
    }

    /// Global minimum-variance weights: the maximum-Sharpe portfolio with a
    /// zero risk-free rate and identical expected returns.
    pub fn global_min_vol(&self, cov: &Matrix) -> Result<OptimizedWeights> {
        let ones = Array::from_element(cov.rows(), 1.0);
        self.max_sharpe(0.0, &ones, cov)
    }

    /// Frontier points in increasing target-return order.
    pub fn build_frontier(&self, n_points: Size, er: &Array, cov: &Matrix) -> Result<Vec<FrontierPoint>> {
        let targets = target_returns(n_points, er)?;
        let solved = self.optimal_weights(n_points, er, cov)?;
        let points = targets
            .iter()
            .zip(solved)
            .map(|(target, solve)| {
                Ok(FrontierPoint {
                    target_return: *target,
                    ret: portfolio_return(&solve.weights, er)?,
                    volatility: portfolio_vol(&solve.weights, cov)?,
                    weights: solve.weights,
                    status: solve.status,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let best_effort = points.iter().filter(|p| p.status != SolveStatus::Optimal).count();
        debug!(n_points, n_assets = er.size(), best_effort, "frontier built");
        Ok(points)
    }
}

fn check_inputs(er: &Array, cov: &Matrix) -> Result<Size> {
    let n = er.size();
    ensure!(n > 0, "at least one asset is required");
    validate_covariance(cov, n)?;
    Ok(n)
}

fn target_returns(n_points: Size, er: &Array) -> Result<Array> {
    ensure!(n_points >= 1, "n_points must be at least 1");
    ensure!(!er.is_empty(), "at least one asset is required");
    Ok(Array::linspace(er.min(), er.max(), n_points))
}

/// Frontier of two assets traced directly by `w = (λ, 1 − λ)` for
/// `n_points` values of `λ` evenly spaced in `[0, 1]`.
pub fn two_asset_frontier(n_points: Size, er: &Array, cov: &Matrix) -> Result<Vec<FrontierPoint>> {
    ensure_dim!("two-asset expected returns", 2, er.size());
    validate_covariance(cov, 2)?;
    ensure!(n_points >= 1, "n_points must be at least 1");
    Array::linspace(0.0, 1.0, n_points)
        .iter()
        .map(|lambda| {
            let weights = Array::from_slice(&[*lambda, 1.0 - lambda]);
            let ret = portfolio_return(&weights, er)?;
            Ok(FrontierPoint {
                target_return: ret,
                ret,
                volatility: portfolio_vol(&weights, cov)?,
                weights,
                status: SolveStatus::Optimal,
            })
        })
        .collect()
}

/// [`FrontierEngine::minimize_vol`] with default end criteria.
pub fn minimize_vol(target_return: Rate, er: &Array, cov: &Matrix) -> Result<OptimizedWeights> {
    FrontierEngine::default().minimize_vol(target_return, er, cov)
}

/// [`FrontierEngine::optimal_weights`] with default end criteria.
pub fn optimal_weights(n_points: Size, er: &Array, cov: &Matrix) -> Result<Vec<OptimizedWeights>> {
    FrontierEngine::default().optimal_weights(n_points, er, cov)
}

/// [`FrontierEngine::max_sharpe`] with default end criteria.
pub fn max_sharpe(riskfree_rate: Rate, er: &Array, cov: &Matrix) -> Result<OptimizedWeights> {
    FrontierEngine::default().max_sharpe(riskfree_rate, er, cov)
}

/// [`FrontierEngine::global_min_vol`] with default end criteria.
pub fn global_min_vol(cov: &Matrix) -> Result<OptimizedWeights> {
    FrontierEngine::default().global_min_vol(cov)
}

/// [`FrontierEngine::build_frontier`] with default end criteria.
pub fn build_frontier(n_points: Size, er: &Array, cov: &Matrix) -> Result<Vec<FrontierPoint>> {
    FrontierEngine::default().build_frontier(n_points, er, cov)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn er() -> Array {
        Array::from_slice(&[0.10, 0.05])
    }

    fn cov() -> Matrix {
        Matrix::from_row_slice(2, 2, &[0.04, 0.01, 0.01, 0.02])
    }

    #[test]
    fn target_return_is_met() {
        let w = minimize_vol(0.07, &er(), &cov()).unwrap();
        assert!(w.is_optimal(), "{:?}", w.status);
        assert_abs_diff_eq!(w.weights.sum(), 1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(portfolio_return(&w.weights, &er()).unwrap(), 0.07, epsilon = 1e-6);
        // two assets: the constraints alone pin w = (0.4, 0.6)
        assert_abs_diff_eq!(w.weights[0], 0.4, epsilon = 1e-6);
    }

    #[test]
    fn unreachable_target_is_best_effort() {
        let w = minimize_vol(0.2, &er(), &cov()).unwrap();
        assert!(matches!(w.status, SolveStatus::BestEffort { .. }));
        assert!(matches!(w.into_optimal(), Err(Error::InfeasibleConstraint(_))));
    }

    #[test]
    fn single_point_uses_lowest_return() {
        let points = build_frontier(1, &er(), &cov()).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].target_return, 0.05);
        assert_abs_diff_eq!(points[0].weights[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_points_is_rejected() {
        assert!(matches!(optimal_weights(0, &er(), &cov()), Err(Error::Precondition(_))));
    }

    #[test]
    fn gmv_of_two_assets() {
        // w0 = (σ2² − σ12) / (σ1² + σ2² − 2σ12) = 0.01 / 0.04
        let w = global_min_vol(&cov()).unwrap();
        assert!(w.is_optimal());
        assert_abs_diff_eq!(w.weights[0], 0.25, epsilon = 1e-5);
    }

    #[test]
    fn riskless_start_is_degenerate() {
        let c = Matrix::zeros(2, 2);
        assert!(matches!(max_sharpe(0.0, &er(), &c), Err(Error::DegenerateInput(_))));
    }

    #[test]
    fn covariance_shape_is_checked() {
        let c = Matrix::identity(3);
        assert!(matches!(
            minimize_vol(0.07, &er(), &c),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn two_asset_sweep_endpoints() {
        let points = two_asset_frontier(5, &er(), &cov()).unwrap();
        assert_eq!(points.len(), 5);
        assert_abs_diff_eq!(points[0].ret, 0.05, epsilon = 1e-15);
        assert_abs_diff_eq!(points[0].volatility, 0.02_f64.sqrt(), epsilon = 1e-15);
        assert_abs_diff_eq!(points[4].ret, 0.10, epsilon = 1e-15);
        assert_abs_diff_eq!(points[4].volatility, 0.2, epsilon = 1e-15);
    }

    #[test]
    fn two_asset_sweep_rejects_other_sizes() {
        let er3 = Array::from_slice(&[0.1, 0.2, 0.3]);
        assert!(matches!(
            two_asset_frontier(5, &er3, &Matrix::identity(3)),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
