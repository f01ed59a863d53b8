//! Fixed-coupon bullet bonds.

use crate::cashflow::{build_cash_flows, CashFlowSchedule};
use crate::cashflows::present_value;
use ldi_core::{errors::Result, Price, Rate, Real, Size, Time};

/// A bullet bond paying a fixed coupon `coupons_per_year` times a year.
#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    /// Years to maturity.
    pub maturity: Time,
    /// Face value repaid with the last coupon.
    pub principal: Price,
    /// Annual coupon rate on the principal.
    pub coupon_rate: Rate,
    /// Coupon payments per year.
    pub coupons_per_year: Size,
}

impl Default for Bond {
    fn default() -> Self {
        Self {
            maturity: 10.0,
            principal: 100.0,
            coupon_rate: 0.03,
            coupons_per_year: 12,
        }
    }
}

impl Bond {
    /// Create a bond.
    pub fn new(maturity: Time, principal: Price, coupon_rate: Rate, coupons_per_year: Size) -> Self {
        Self {
            maturity,
            principal,
            coupon_rate,
            coupons_per_year,
        }
    }

    /// Set the maturity.
    pub fn with_maturity(mut self, maturity: Time) -> Self {
        self.maturity = maturity;
        self
    }

    /// Set the principal.
    pub fn with_principal(mut self, principal: Price) -> Self {
        self.principal = principal;
        self
    }

    /// Set the annual coupon rate.
    pub fn with_coupon_rate(mut self, coupon_rate: Rate) -> Self {
        self.coupon_rate = coupon_rate;
        self
    }

    /// Set the coupon frequency.
    pub fn with_coupons_per_year(mut self, coupons_per_year: Size) -> Self {
        self.coupons_per_year = coupons_per_year;
        self
    }

    /// Amount of one coupon: `principal · coupon_rate / coupons_per_year`.
    pub fn coupon(&self) -> Price {
        self.principal * self.coupon_rate / self.coupons_per_year as Real
    }

    /// The bond's cash flows, indexed by payment number.
    pub fn cash_flows(&self) -> Result<CashFlowSchedule> {
        build_cash_flows(
            self.maturity,
            self.principal,
            self.coupon_rate,
            self.coupons_per_year,
        )
    }

    /// Price at an annual discount rate, discounting each payment at
    /// `discount_rate / coupons_per_year` per period.
    pub fn price(&self, discount_rate: Rate) -> Result<Price> {
        let cf = self.cash_flows()?;
        Ok(present_value(&cf, discount_rate / self.coupons_per_year as Real))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn priced_at_par_when_discounted_at_coupon_rate() {
        let bond = Bond::new(20.0, 1000.0, 0.05, 2);
        assert_relative_eq!(bond.price(0.05).unwrap(), 1000.0, max_relative = 1e-12);
    }

    #[test]
    fn premium_and_discount() {
        let bond = Bond::default();
        assert!(bond.price(0.02).unwrap() > 100.0);
        assert!(bond.price(0.04).unwrap() < 100.0);
    }

    #[test]
    fn coupon_amount() {
        assert_relative_eq!(Bond::default().coupon(), 0.25, max_relative = 1e-15);
        let semi = Bond::default().with_coupons_per_year(2).with_principal(1000.0);
        assert_relative_eq!(semi.coupon(), 15.0, max_relative = 1e-15);
    }

    #[test]
    fn zero_coupon_price_is_discounted_principal() {
        let zc = Bond::new(10.0, 100.0, 0.0, 1);
        assert_relative_eq!(zc.price(0.03).unwrap(), 100.0 / 1.03_f64.powi(10), max_relative = 1e-13);
    }

    #[test]
    fn maturity_shorter_than_half_a_period_fails() {
        assert!(Bond::default().with_maturity(0.01).price(0.03).is_err());
    }
}
