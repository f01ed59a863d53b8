//! Multi-scenario path generation on a uniform time grid.
//!
//! Output is a step × scenario [`Matrix`]: row `0` holds the initial value
//! in every column, row `k` the state after `k` steps. Standard normal
//! draws are taken step-major (all scenarios of step 1, then all scenarios
//! of step 2, ...) from the caller's generator, so a seeded generator
//! reproduces the table exactly.

use crate::stochastic_process::StochasticProcess1D;
use ldi_core::{ensure, errors::Result, Real, Size, Time};
use ldi_math::Matrix;
use rand::Rng;
use rand_distr::StandardNormal;

/// Generates step × scenario tables for any [`StochasticProcess1D`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioGenerator {
    dt: Time,
    n_steps: Size,
    n_scenarios: Size,
}

impl ScenarioGenerator {
    /// Grid of `n_steps` steps of length `dt`, for `n_scenarios` paths.
    pub fn new(dt: Time, n_steps: Size, n_scenarios: Size) -> Result<Self> {
        ensure!(dt > 0.0 && dt.is_finite(), "time step must be positive, got {dt}");
        ensure!(n_scenarios > 0, "at least one scenario is required");
        Ok(Self {
            dt,
            n_steps,
            n_scenarios,
        })
    }

    /// Grid covering `n_years` at `steps_per_year` steps per year.
    ///
    /// The step count is `⌊n_years · steps_per_year⌋`.
    pub fn from_horizon(n_years: Time, steps_per_year: Size, n_scenarios: Size) -> Result<Self> {
        ensure!(steps_per_year > 0, "steps_per_year must be positive");
        ensure!(n_years >= 0.0, "horizon must be non-negative, got {n_years}");
        let n_steps = (n_years * steps_per_year as Real).floor() as Size;
        Self::new(1.0 / steps_per_year as Real, n_steps, n_scenarios)
    }

    /// Step length.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Number of steps (the table has one more row).
    pub fn n_steps(&self) -> Size {
        self.n_steps
    }

    /// Number of scenarios (columns).
    pub fn n_scenarios(&self) -> Size {
        self.n_scenarios
    }

    /// Generate paths of `process` starting from `process.x0()`.
    pub fn generate<P, R>(&self, process: &P, rng: &mut R) -> Matrix
    where
        P: StochasticProcess1D + ?Sized,
        R: Rng + ?Sized,
    {
        self.generate_from(process, process.x0(), rng)
    }

    /// Generate paths of `process` starting from `x0`.
    pub fn generate_from<P, R>(&self, process: &P, x0: Real, rng: &mut R) -> Matrix
    where
        P: StochasticProcess1D + ?Sized,
        R: Rng + ?Sized,
    {
        let mut paths = Matrix::zeros(self.n_steps + 1, self.n_scenarios);
        for j in 0..self.n_scenarios {
            paths[(0, j)] = x0;
        }
        for k in 1..=self.n_steps {
            let t = (k - 1) as Real * self.dt;
            for j in 0..self.n_scenarios {
                let dw: Real = rng.sample(StandardNormal);
                paths[(k, j)] = process.evolve_1d(t, paths[(k - 1, j)], self.dt, dw);
            }
        }
        paths
    }
}
