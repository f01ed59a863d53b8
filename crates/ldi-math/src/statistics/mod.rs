//! Return statistics over periodic return series.
//!
//! A "return table" is a [`Matrix`] whose columns are assets (or scenarios)
//! and whose rows are consecutive periods. `periods_per_year` converts
//! per-period figures to annual ones.

use crate::comparison::is_negligible;
use crate::matrix::Matrix;
use ldi_core::{ensure, errors::Error, errors::Result, Rate, Real, Volatility};
use statrs::statistics::Statistics;

/// Growth of one unit over the series: `Π(1 + r_t) − 1`.
pub fn compound(returns: &[Real]) -> Real {
    returns.iter().map(|r| r.ln_1p()).sum::<Real>().exp_m1()
}

/// Annualized geometric mean return: `(Π(1 + r_t))^(ppy / n) − 1`.
pub fn annualize_returns(returns: &[Real], periods_per_year: Real) -> Result<Rate> {
    ensure!(!returns.is_empty(), "cannot annualize an empty return series");
    let growth: Real = returns.iter().map(|r| r.ln_1p()).sum();
    Ok((growth * periods_per_year / returns.len() as Real).exp_m1())
}

/// Annualized volatility: sample standard deviation `× √ppy`.
pub fn annualize_volatility(returns: &[Real], periods_per_year: Real) -> Result<Volatility> {
    ensure!(
        returns.len() >= 2,
        "volatility needs at least two observations, got {}",
        returns.len()
    );
    Ok(returns.std_dev() * periods_per_year.sqrt())
}

/// Annualized Sharpe ratio of a periodic return series.
///
/// The annual risk-free rate is converted to its per-period equivalent,
/// subtracted, and the excess series is annualized.
pub fn sharpe_ratio(returns: &[Real], riskfree_rate: Rate, periods_per_year: Real) -> Result<Real> {
    let rf_per_period = (riskfree_rate.ln_1p() / periods_per_year).exp_m1();
    let excess: Vec<Real> = returns.iter().map(|r| r - rf_per_period).collect();
    let ann_excess = annualize_returns(&excess, periods_per_year)?;
    let ann_vol = annualize_volatility(returns, periods_per_year)?;
    if is_negligible(ann_vol, ann_excess, 64) {
        return Err(Error::DegenerateInput(
            "Sharpe ratio of a zero-volatility series".into(),
        ));
    }
    Ok(ann_excess / ann_vol)
}

/// Apply `f` to every column of a return table.
pub fn aggregate_columns<T, F>(table: &Matrix, mut f: F) -> Result<Vec<T>>
where
    F: FnMut(&[Real]) -> Result<T>,
{
    if table.rows() == 0 || table.cols() == 0 {
        return Err(Error::InvalidInputType("empty return table".into()));
    }
    (0..table.cols())
        .map(|j| f(table.column(j).as_slice()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn compound_growth() {
        assert_abs_diff_eq!(compound(&[0.1, -0.1]), -0.01, epsilon = 1e-14);
        assert_eq!(compound(&[]), 0.0);
    }

    #[test]
    fn annualized_monthly_returns() {
        let monthly = vec![0.01; 12];
        let ann = annualize_returns(&monthly, 12.0).unwrap();
        assert_abs_diff_eq!(ann, 1.01_f64.powi(12) - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn annualized_volatility_uses_sample_std() {
        let r = [0.01, 0.03, 0.02, 0.04];
        // sample variance of the four points: 1.6667e-4
        let expected = (0.0005 / 3.0_f64).sqrt() * 12.0_f64.sqrt();
        assert_abs_diff_eq!(annualize_volatility(&r, 12.0).unwrap(), expected, epsilon = 1e-12);
        assert!(annualize_volatility(&[0.01], 12.0).is_err());
    }

    #[test]
    fn sharpe_of_constant_series_is_degenerate() {
        let err = sharpe_ratio(&[0.0; 6], 0.0, 12.0).unwrap_err();
        assert!(matches!(err, Error::DegenerateInput(_)));
    }

    #[test]
    fn sharpe_sign_follows_excess_return() {
        let r = [0.02, 0.00, 0.03, 0.01];
        assert!(sharpe_ratio(&r, 0.0, 4.0).unwrap() > 0.0);
        assert!(sharpe_ratio(&r, 0.5, 4.0).unwrap() < 0.0);
    }

    #[test]
    fn aggregate_each_column() {
        let table = Matrix::from_row_slice(3, 2, &[0.1, 0.0, 0.0, 0.0, -0.1, 0.0]);
        let growth = aggregate_columns(&table, |c| Ok(compound(c))).unwrap();
        assert_abs_diff_eq!(growth[0], 1.1 * 0.9 - 1.0, epsilon = 1e-14);
        assert_eq!(growth[1], 0.0);
    }

    #[test]
    fn aggregate_rejects_empty_table() {
        let err = aggregate_columns(&Matrix::zeros(0, 3), |c| Ok(c.len())).unwrap_err();
        assert!(matches!(err, Error::InvalidInputType(_)));
    }
}
