//! Short-rate model traits.
//!
//! ```text
//! ShortRateModel        closed-form zero-coupon pricing
//! └── OneFactorModel    dr = μ(t,r) dt + σ(t,r) dW, simulable as a process
//! ```

use ldi_core::{errors::Result, DiscountFactor, Rate, Real, Time};
use ldi_processes::StochasticProcess1D;

/// A short-rate model with a discount-bond formula.
pub trait ShortRateModel: std::fmt::Debug {
    /// Price of a unit zero-coupon bond with time-to-maturity `ttm`, given
    /// the current instantaneous short rate.
    ///
    /// For affine models this is `A(ttm) · exp(−B(ttm) · r)`.
    fn discount_bond(&self, ttm: Time, rate: Rate) -> DiscountFactor;
}

/// A one-factor short-rate model.
pub trait OneFactorModel: ShortRateModel {
    /// Instantaneous drift `μ(t, r)`.
    fn short_rate_drift(&self, t: Time, r: Real) -> Real;

    /// Instantaneous diffusion `σ(t, r)`.
    fn short_rate_diffusion(&self, t: Time, r: Real) -> Real;

    /// Discretized short-rate dynamics started at `r0` (instantaneous).
    fn dynamics_process(&self, r0: Rate) -> Result<Box<dyn StochasticProcess1D>>;
}
