//! Optional annotations evaluated alongside a frontier: the capital market
//! line, the equal-weight portfolio and the global minimum-variance
//! portfolio.

use crate::frontier::{FrontierEngine, FrontierPoint, OptimizedWeights, SolveStatus};
use crate::portfolio::{equal_weights, portfolio_return, portfolio_vol};
use ldi_core::{errors::Result, Rate, Real, Size, Volatility};
use ldi_math::{Array, Matrix};

/// Which overlays to compute with a frontier.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrontierOverlays {
    /// Capital market line through the tangency portfolio.
    pub show_cml: bool,
    /// Equal-weight portfolio.
    pub show_ew: bool,
    /// Global minimum-variance portfolio.
    pub show_gmv: bool,
    /// Risk-free rate anchoring the capital market line.
    pub riskfree_rate: Rate,
}

/// A single portfolio drawn next to the frontier.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPoint {
    /// Portfolio weights.
    pub weights: Array,
    /// Portfolio return.
    pub ret: Rate,
    /// Portfolio volatility.
    pub volatility: Volatility,
    /// Solve status; always optimal for the equal-weight point.
    pub status: SolveStatus,
}

impl OverlayPoint {
    fn evaluate(weights: Array, status: SolveStatus, er: &Array, cov: &Matrix) -> Result<Self> {
        Ok(Self {
            ret: portfolio_return(&weights, er)?,
            volatility: portfolio_vol(&weights, cov)?,
            weights,
            status,
        })
    }

    fn solved(solve: OptimizedWeights, er: &Array, cov: &Matrix) -> Result<Self> {
        Self::evaluate(solve.weights, solve.status, er, cov)
    }
}

/// Line from `(0, r_f)` through the tangency (maximum-Sharpe) portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct CapitalMarketLine {
    /// Intercept at zero volatility.
    pub riskfree_rate: Rate,
    /// Maximum-Sharpe portfolio.
    pub tangency: OverlayPoint,
}

impl CapitalMarketLine {
    /// `(volatility, return)` end points.
    pub fn points(&self) -> [(Volatility, Rate); 2] {
        [
            (0.0, self.riskfree_rate),
            (self.tangency.volatility, self.tangency.ret),
        ]
    }

    /// Sharpe ratio of the tangency portfolio.
    pub fn slope(&self) -> Real {
        (self.tangency.ret - self.riskfree_rate) / self.tangency.volatility
    }
}

/// A frontier together with the overlays that were requested.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontierReport {
    /// Frontier points in increasing target-return order.
    pub frontier: Vec<FrontierPoint>,
    /// Present when `show_cml` is set.
    pub cml: Option<CapitalMarketLine>,
    /// Present when `show_ew` is set.
    pub equal_weight: Option<OverlayPoint>,
    /// Present when `show_gmv` is set.
    pub gmv: Option<OverlayPoint>,
}

impl FrontierOverlays {
    /// No overlays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the capital market line for `riskfree_rate`.
    pub fn with_cml(mut self, riskfree_rate: Rate) -> Self {
        self.show_cml = true;
        self.riskfree_rate = riskfree_rate;
        self
    }

    /// Add the equal-weight portfolio.
    pub fn with_equal_weight(mut self) -> Self {
        self.show_ew = true;
        self
    }

    /// Add the global minimum-variance portfolio.
    pub fn with_gmv(mut self) -> Self {
        self.show_gmv = true;
        self
    }

    /// Build an `n_points` frontier and the requested overlays with default
    /// end criteria.
    pub fn evaluate(&self, n_points: Size, er: &Array, cov: &Matrix) -> Result<FrontierReport> {
        self.evaluate_with(&FrontierEngine::default(), n_points, er, cov)
    }

    /// As [`evaluate`](Self::evaluate), solving with `engine`.
    pub fn evaluate_with(
        &self,
        engine: &FrontierEngine,
        n_points: Size,
        er: &Array,
        cov: &Matrix,
    ) -> Result<FrontierReport> {
        let frontier = engine.build_frontier(n_points, er, cov)?;

        let cml = if self.show_cml {
            let tangency = engine.max_sharpe(self.riskfree_rate, er, cov)?;
            Some(CapitalMarketLine {
                riskfree_rate: self.riskfree_rate,
                tangency: OverlayPoint::solved(tangency, er, cov)?,
            })
        } else {
            None
        };

        let equal_weight = if self.show_ew {
            let weights = equal_weights(er.size());
            Some(OverlayPoint::evaluate(weights, SolveStatus::Optimal, er, cov)?)
        } else {
            None
        };

        let gmv = if self.show_gmv {
            Some(OverlayPoint::solved(engine.global_min_vol(cov)?, er, cov)?)
        } else {
            None
        };

        Ok(FrontierReport {
            frontier,
            cml,
            equal_weight,
            gmv,
        })
    }
}
