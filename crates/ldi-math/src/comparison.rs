//! Floating-point comparison utilities.

use ldi_core::Real;

/// Return `true` if `x` is zero up to `n` ulps of `scale`.
///
/// Used to decide whether a denominator (a volatility, a duration spread)
/// is numerically zero relative to the magnitudes it was computed from.
#[inline]
pub fn is_negligible(x: Real, scale: Real, n: u32) -> bool {
    x.abs() <= scale.abs().max(1.0) * f64::EPSILON * n as f64
}
