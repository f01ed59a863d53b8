//! Geometric Brownian motion with compounded drift.
//!
//! Each step multiplies the level by a gross return drawn from
//!
//! ```text
//! 1 + R ~ N((1 + μ)^dt, σ √dt)
//! ```
//!
//! so `μ` is an annually compounded expected return and `σ` an annualized
//! volatility. Used for risky-asset scenarios alongside the rate models.

use crate::scenario_generator::ScenarioGenerator;
use crate::stochastic_process::StochasticProcess1D;
use ldi_core::{ensure, errors::Result, Rate, Real, Size, Time, Volatility};
use ldi_math::Matrix;
use rand::Rng;

/// Geometric Brownian motion with annually compounded drift.
#[derive(Debug, Clone)]
pub struct GeometricBrownianMotionProcess {
    x0: Real,
    mu: Rate,
    sigma: Volatility,
}

impl GeometricBrownianMotionProcess {
    /// Create a new GBM process.
    ///
    /// # Arguments
    /// * `x0`: initial level (must be > 0)
    /// * `mu`: annual expected return
    /// * `sigma`: annual volatility (must be ≥ 0)
    pub fn new(x0: Real, mu: Rate, sigma: Volatility) -> Result<Self> {
        ensure!(x0 > 0.0, "initial value must be positive, got {x0}");
        ensure!(sigma >= 0.0, "volatility must be non-negative, got {sigma}");
        Ok(Self { x0, mu, sigma })
    }

    /// Annual expected return.
    pub fn mu(&self) -> Rate {
        self.mu
    }

    /// Annual volatility.
    pub fn sigma(&self) -> Volatility {
        self.sigma
    }

    /// Level paths: `(⌊n_years·steps_per_year⌋ + 1) × n_scenarios`, first
    /// row equal to `x0`.
    ///
    /// Row `t` is the level after `t` steps, so the table holds the starting
    /// level plus one row per simulated step. Drop the first row for exactly
    /// `⌊n_years·steps_per_year⌋` rows of evolved levels.
    pub fn simulate_prices<R: Rng + ?Sized>(
        &self,
        n_years: Time,
        n_scenarios: Size,
        steps_per_year: Size,
        rng: &mut R,
    ) -> Result<Matrix> {
        let gen = ScenarioGenerator::from_horizon(n_years, steps_per_year, n_scenarios)?;
        Ok(gen.generate(self, rng))
    }

    /// Per-step simple returns on the same grid as
    /// [`simulate_prices`](Self::simulate_prices); the first row is zero.
    pub fn simulate_returns<R: Rng + ?Sized>(
        &self,
        n_years: Time,
        n_scenarios: Size,
        steps_per_year: Size,
        rng: &mut R,
    ) -> Result<Matrix> {
        let prices = self.simulate_prices(n_years, n_scenarios, steps_per_year, rng)?;
        Ok(Matrix::from_fn(prices.rows(), prices.cols(), |t, j| {
            if t == 0 {
                0.0
            } else {
                prices[(t, j)] / prices[(t - 1, j)] - 1.0
            }
        }))
    }
}

impl StochasticProcess1D for GeometricBrownianMotionProcess {
    fn x0(&self) -> Real {
        self.x0
    }

    fn drift_1d(&self, _t: Time, x: Real) -> Real {
        self.mu.ln_1p() * x
    }

    fn diffusion_1d(&self, _t: Time, x: Real) -> Real {
        self.sigma * x
    }

    /// `x · (1 + μ)^dt`.
    fn expectation_1d(&self, _t: Time, x: Real, dt: Time) -> Real {
        x * (1.0 + self.mu).powf(dt)
    }
}
