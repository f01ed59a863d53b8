//! Bond prices and returns along simulated rate paths.
//!
//! Rate tables are step × scenario with one row per coupon period: row `i`
//! is `i / coupons_per_year` years after issue. Feeding a CIR table with
//! `steps_per_year == coupons_per_year` lines the two grids up.

use crate::bond::Bond;
use ldi_core::{ensure, errors::Result, Price, Rate, Real};
use ldi_math::statistics::{aggregate_columns, annualize_returns};
use ldi_math::Matrix;

/// Price of `bond` at each step and scenario of an annual-rate table.
///
/// At row `i` the remaining maturity is `maturity − i / coupons_per_year`.
/// Once it is no longer positive (or less than half a coupon period
/// remains) the price is `principal + coupon`, the final payment.
pub fn reprice_along_paths(rates: &Matrix, bond: &Bond) -> Result<Matrix> {
    ensure!(bond.coupons_per_year > 0, "coupons_per_year must be positive");
    let cpy = bond.coupons_per_year as Real;
    let final_payment = bond.principal + bond.coupon();
    let mut prices = Matrix::zeros(rates.rows(), rates.cols());
    for i in 0..rates.rows() {
        let remaining = bond.maturity - i as Real / cpy;
        let live = (remaining * cpy).round() >= 1.0 && remaining > 0.0;
        let bond_i = bond.clone().with_maturity(remaining);
        for j in 0..rates.cols() {
            prices[(i, j)] = if live {
                bond_i.price(rates[(i, j)])?
            } else {
                final_payment
            };
        }
    }
    Ok(prices)
}

/// Per-period holding returns `(p[t] + coupon) / p[t−1] − 1`; one row
/// fewer than `prices`.
pub fn period_returns(prices: &Matrix, coupon: Price) -> Result<Matrix> {
    ensure!(
        prices.rows() >= 2,
        "at least two price rows are needed for a return, got {}",
        prices.rows()
    );
    Ok(Matrix::from_fn(prices.rows() - 1, prices.cols(), |t, j| {
        (prices[(t + 1, j)] + coupon) / prices[(t, j)] - 1.0
    }))
}

/// Annualized realized return of holding `bond` in each scenario, with
/// `coupons_per_year` periods per year.
pub fn realized_returns(prices: &Matrix, bond: &Bond) -> Result<Vec<Rate>> {
    let returns = period_returns(prices, bond.coupon())?;
    let ppy = bond.coupons_per_year as Real;
    aggregate_columns(&returns, |r| annualize_returns(r, ppy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat(rows: usize, cols: usize, rate: Rate) -> Matrix {
        Matrix::from_fn(rows, cols, |_, _| rate)
    }

    #[test]
    fn final_row_pays_principal_plus_coupon() {
        let bond = Bond::new(2.0, 100.0, 0.04, 4);
        let prices = reprice_along_paths(&flat(9, 3, 0.03), &bond).unwrap();
        for j in 0..3 {
            assert_eq!(prices[(8, j)], 101.0);
        }
        assert_relative_eq!(prices[(0, 0)], bond.price(0.03).unwrap(), max_relative = 1e-14);
    }

    #[test]
    fn rows_past_maturity_stay_at_final_payment() {
        let bond = Bond::new(1.0, 100.0, 0.12, 12);
        let prices = reprice_along_paths(&flat(15, 1, 0.05), &bond).unwrap();
        for i in 12..15 {
            assert_eq!(prices[(i, 0)], 101.0);
        }
    }

    #[test]
    fn par_bond_on_flat_curve_earns_its_coupon() {
        // priced at par every period until the last one
        let bond = Bond::new(3.0, 100.0, 0.06, 12);
        let prices = reprice_along_paths(&flat(37, 2, 0.06), &bond).unwrap();
        let rets = period_returns(&prices, bond.coupon()).unwrap();
        assert_eq!(rets.rows(), 36);
        for t in 0..35 {
            assert_relative_eq!(rets[(t, 0)], 0.005, max_relative = 1e-10);
        }
    }

    #[test]
    fn realized_returns_one_per_scenario() {
        let bond = Bond::new(2.0, 100.0, 0.04, 12);
        let prices = reprice_along_paths(&flat(25, 4, 0.03), &bond).unwrap();
        let r = realized_returns(&prices, &bond).unwrap();
        assert_eq!(r.len(), 4);
        assert!(r.iter().all(|x| *x > 0.0));
        assert_relative_eq!(r[0], r[3], max_relative = 1e-14);
    }

    #[test]
    fn single_row_cannot_produce_returns() {
        let bond = Bond::default();
        let prices = Matrix::from_fn(1, 2, |_, _| 100.0);
        assert!(realized_returns(&prices, &bond).is_err());
    }
}
