//! Rate conventions.
//!
//! Short-rate simulation evolves *instantaneous* (continuously compounded)
//! rates while callers quote *annualized* (annually compounded) rates.

use crate::{DiscountFactor, Rate, Real};

/// Convert an annually compounded rate to the equivalent instantaneous rate:
/// `ln(1 + r)`.
#[inline]
pub fn annual_to_instantaneous(r: Rate) -> Rate {
    r.ln_1p()
}

/// Convert an instantaneous rate to the equivalent annually compounded rate:
/// `e^r − 1`.
#[inline]
pub fn instantaneous_to_annual(r: Rate) -> Rate {
    r.exp_m1()
}

/// Discount factor `(1 + r)^(−t)`.
///
/// `t` and `r` must share the same periodicity: a monthly rate with a time
/// expressed in months, an annual rate with a time in years.
#[inline]
pub fn discount(t: Real, r: Rate) -> DiscountFactor {
    (1.0 + r).powf(-t)
}
