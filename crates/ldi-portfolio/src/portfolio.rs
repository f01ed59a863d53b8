//! Portfolio return and volatility.
//!
//! Weights, expected returns and the covariance matrix are aligned
//! positionally: entry `i` of each refers to asset `i`.

use ldi_core::{ensure_dim, errors::Error, errors::Result, Rate, Real, Size, Volatility};
use ldi_math::{Array, Matrix};

/// `wᵀ · r`.
pub fn portfolio_return(weights: &Array, returns: &Array) -> Result<Rate> {
    ensure_dim!("expected returns", weights.size(), returns.size());
    Ok(weights.dot(returns))
}

/// `√(wᵀ Σ w)`, with a slightly negative quadratic form (rounding on a
/// singular `Σ`) clamped to zero.
pub fn portfolio_vol(weights: &Array, cov: &Matrix) -> Result<Volatility> {
    ensure_dim!("covariance rows", weights.size(), cov.rows());
    ensure_dim!("covariance columns", weights.size(), cov.cols());
    Ok(cov.quadratic_form(weights).max(0.0).sqrt())
}

/// `1/n` in each of `n` positions.
pub fn equal_weights(n: Size) -> Array {
    Array::from_element(n, 1.0 / n as Real)
}

/// Check that `cov` is a covariance matrix for `n` assets: `n × n`,
/// symmetric and with a non-negative diagonal.
pub fn validate_covariance(cov: &Matrix, n: Size) -> Result<()> {
    ensure_dim!("covariance rows", n, cov.rows());
    ensure_dim!("covariance columns", n, cov.cols());
    let scale = cov.inner().amax().max(1.0);
    if !cov.is_symmetric(1e-10 * scale) {
        return Err(Error::DegenerateInput("covariance matrix is not symmetric".into()));
    }
    if !cov.diagonal().iter().all(|v| *v >= 0.0) {
        return Err(Error::DegenerateInput(
            "covariance matrix has a negative variance".into(),
        ));
    }
    Ok(())
}
