//! # ldi-portfolio
//!
//! Mean-variance portfolio construction: portfolio return and volatility,
//! minimum-volatility and maximum-Sharpe weights, efficient frontiers and
//! the overlays drawn next to them.
//!
//! ```
//! use ldi_math::{Array, Matrix};
//! use ldi_portfolio::{minimize_vol, portfolio_return};
//!
//! let er = Array::from_slice(&[0.10, 0.05]);
//! let cov = Matrix::from_row_slice(2, 2, &[0.04, 0.01, 0.01, 0.02]);
//! let w = minimize_vol(0.07, &er, &cov).unwrap().into_optimal().unwrap();
//! assert!((portfolio_return(&w, &er).unwrap() - 0.07).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod frontier;
pub mod objectives;
pub mod overlays;
pub mod portfolio;

pub use frontier::{
    build_frontier, global_min_vol, max_sharpe, minimize_vol, optimal_weights, two_asset_frontier,
    FrontierEngine, FrontierPoint, OptimizedWeights, SolveStatus,
};
pub use objectives::{NegativeSharpeRatio, PortfolioVolatility, ReturnIsTarget, WeightsSumToOne};
pub use overlays::{CapitalMarketLine, FrontierOverlays, FrontierReport, OverlayPoint};
pub use portfolio::{equal_weights, portfolio_return, portfolio_vol, validate_covariance};
