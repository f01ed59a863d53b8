//! Square-root (CIR) process.
//!
//! ```text
//! dX = a(b − X) dt + σ √X dW
//! ```
//!
//! Discretized with an Euler step followed by absolute-value reflection,
//! `x' = |x + a(b − x)dt + σ√x·√dt·z|`. Reflection keeps every state
//! non-negative but biases the distribution near zero; it is a modelling
//! choice, not a property of the continuous process.

use crate::stochastic_process::StochasticProcess1D;
use ldi_core::{ensure, errors::Result, Real, Time};

/// A square-root (CIR) process with reflecting Euler discretization.
///
/// `dX = speed · (mean − X) dt + volatility · √X · dW`
#[derive(Debug, Clone)]
pub struct SquareRootProcess {
    x0: Real,
    speed: Real,
    mean: Real,
    volatility: Real,
}

impl SquareRootProcess {
    /// Create a new square-root process.
    ///
    /// # Arguments
    /// * `speed`: mean-reversion speed `a`
    /// * `mean`: long-run level `b`
    /// * `volatility`: volatility `σ`
    /// * `x0`: initial value (must be ≥ 0)
    pub fn new(speed: Real, mean: Real, volatility: Real, x0: Real) -> Result<Self> {
        ensure!(x0 >= 0.0, "initial value must be non-negative, got {x0}");
        Ok(Self {
            x0,
            speed,
            mean,
            volatility,
        })
    }

    /// Mean-reversion speed.
    pub fn speed(&self) -> Real {
        self.speed
    }

    /// Long-run mean level.
    pub fn mean(&self) -> Real {
        self.mean
    }

    /// Volatility.
    pub fn volatility(&self) -> Real {
        self.volatility
    }
}

impl StochasticProcess1D for SquareRootProcess {
    fn x0(&self) -> Real {
        self.x0
    }

    fn drift_1d(&self, _t: Time, x: Real) -> Real {
        self.speed * (self.mean - x)
    }

    fn diffusion_1d(&self, _t: Time, x: Real) -> Real {
        self.volatility * x.max(0.0).sqrt()
    }

    fn evolve_1d(&self, t: Time, x: Real, dt: Time, dw: Real) -> Real {
        (self.expectation_1d(t, x, dt) + self.std_deviation_1d(t, x, dt) * dw).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn drift_vanishes_at_mean() {
        let p = SquareRootProcess::new(1.0, 0.04, 0.3, 0.04).unwrap();
        assert!(p.drift_1d(0.0, 0.04).abs() < 1e-15);
    }

    #[test]
    fn drift_is_mean_reverting() {
        let p = SquareRootProcess::new(2.0, 0.04, 0.3, 0.01).unwrap();
        assert!(p.drift_1d(0.0, 0.01) > 0.0);
        assert!(p.drift_1d(0.0, 0.10) < 0.0);
    }

    #[test]
    fn diffusion_vanishes_at_zero() {
        let p = SquareRootProcess::new(1.0, 0.04, 0.3, 0.0).unwrap();
        assert_eq!(p.diffusion_1d(0.0, 0.0), 0.0);
    }

    #[test]
    fn negative_initial_value_rejected() {
        assert!(SquareRootProcess::new(1.0, 0.04, 0.3, -0.01).is_err());
    }

    #[test]
    fn large_negative_shock_is_reflected() {
        let p = SquareRootProcess::new(0.05, 0.03, 0.5, 0.01).unwrap();
        let dt = 1.0 / 12.0;
        // 0.01 + 0.05·0.02/12 + 0.5·0.1·√(1/12)·(−5) < 0 before reflection
        let raw = p.expectation_1d(0.0, 0.01, dt) + p.std_deviation_1d(0.0, 0.01, dt) * -5.0;
        assert!(raw < 0.0);
        let x = p.evolve_1d(0.0, 0.01, dt, -5.0);
        assert_eq!(x, raw.abs());
    }

    proptest! {
        #[test]
        fn step_is_never_negative(
            x in 0.0f64..0.5,
            dw in -10.0f64..10.0,
            sigma in 0.001f64..1.0,
        ) {
            let p = SquareRootProcess::new(0.1, 0.03, sigma, x).unwrap();
            prop_assert!(p.evolve_1d(0.0, x, 1.0 / 12.0, dw) >= 0.0);
        }
    }
}
