//! Objective and constraint descriptors for weight optimization.
//!
//! Each descriptor carries the data it needs (covariance, expected returns,
//! a target, a risk-free rate) and implements the optimizer's
//! [`ObjectiveFunction`] or [`EqualityConstraint`] trait with an analytic
//! gradient.

use ldi_core::{Rate, Real};
use ldi_math::{Array, EqualityConstraint, Matrix, ObjectiveFunction};

/// Portfolio volatility `σ(w) = √(wᵀΣw)`.
#[derive(Debug, Clone, Copy)]
pub struct PortfolioVolatility<'a> {
    /// Asset covariance.
    pub cov: &'a Matrix,
}

impl ObjectiveFunction for PortfolioVolatility<'_> {
    fn value(&self, w: &Array) -> Real {
        self.cov.quadratic_form(w).max(0.0).sqrt()
    }

    /// `Σw / σ`; zero where `σ = 0`.
    fn gradient(&self, w: &Array) -> Array {
        let sigma = self.value(w);
        if sigma == 0.0 {
            return Array::zeros(w.size());
        }
        &self.cov.mul_vec(w) / sigma
    }
}

/// Negated Sharpe ratio `−(wᵀμ − r_f) / σ(w)`.
///
/// Evaluates to `+∞` where `σ = 0` so a line search never accepts a
/// riskless point.
#[derive(Debug, Clone, Copy)]
pub struct NegativeSharpeRatio<'a> {
    /// Risk-free rate subtracted from the portfolio return.
    pub riskfree_rate: Rate,
    /// Expected returns.
    pub returns: &'a Array,
    /// Asset covariance.
    pub cov: &'a Matrix,
}

impl ObjectiveFunction for NegativeSharpeRatio<'_> {
    fn value(&self, w: &Array) -> Real {
        let sigma = self.cov.quadratic_form(w).max(0.0).sqrt();
        if sigma == 0.0 {
            return Real::INFINITY;
        }
        -(w.dot(self.returns) - self.riskfree_rate) / sigma
    }

    /// `−μ/σ + (wᵀμ − r_f) Σw / σ³`.
    fn gradient(&self, w: &Array) -> Array {
        let variance = self.cov.quadratic_form(w).max(0.0);
        let sigma = variance.sqrt();
        if sigma == 0.0 {
            return Array::zeros(w.size());
        }
        let excess = w.dot(self.returns) - self.riskfree_rate;
        let sw = self.cov.mul_vec(w);
        &(&sw * (excess / (variance * sigma))) - &(self.returns / sigma)
    }
}

/// `Σ w_i − 1 = 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightsSumToOne;

impl EqualityConstraint for WeightsSumToOne {
    fn value(&self, w: &Array) -> Real {
        w.sum() - 1.0
    }

    fn gradient(&self, w: &Array) -> Array {
        Array::from_element(w.size(), 1.0)
    }
}

/// `wᵀμ − target = 0`.
#[derive(Debug, Clone, Copy)]
pub struct ReturnIsTarget<'a> {
    /// Required portfolio return.
    pub target: Rate,
    /// Expected returns.
    pub returns: &'a Array,
}

impl EqualityConstraint for ReturnIsTarget<'_> {
    fn value(&self, w: &Array) -> Real {
        w.dot(self.returns) - self.target
    }

    fn gradient(&self, _w: &Array) -> Array {
        self.returns.clone()
    }
}
