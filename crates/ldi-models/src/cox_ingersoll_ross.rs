//! Cox–Ingersoll–Ross (CIR) short-rate model.
//!
//! ```text
//! dr = a(b − r) dt + σ √r dW
//! ```
//!
//! Discount bond: `P(τ) = A(τ) exp(−B(τ) r)` with `h = √(a² + 2σ²)` and
//!
//! ```text
//! A(τ) = [ 2h e^{(h+a)τ/2} / (2h + (h+a)(e^{hτ} − 1)) ]^{2ab/σ²}
//! B(τ) = 2(e^{hτ} − 1) / (2h + (h+a)(e^{hτ} − 1))
//! ```
//!
//! Both factors reduce to `A = 1`, `B = 0` at `τ = 0` without special
//! casing, so a bond at maturity is worth exactly its principal.
//!
//! Simulated paths evolve the instantaneous rate `ln(1 + r)` with the
//! reflecting Euler scheme of [`SquareRootProcess`] and are reported as
//! annual rates `e^r − 1`. Prices along a path use the same `a`, `b`, `σ`
//! and the instantaneous rate of that step.

use crate::short_rate_model::{OneFactorModel, ShortRateModel};
use ldi_core::{
    annual_to_instantaneous, ensure, errors::Error, errors::Result, instantaneous_to_annual,
    DiscountFactor, Price, Rate, Real, Size, Time,
};
use ldi_math::Matrix;
use ldi_processes::{ScenarioGenerator, SquareRootProcess, StochasticProcess1D};
use rand::Rng;
use tracing::debug;

/// Cox–Ingersoll–Ross model.
#[derive(Debug, Clone, PartialEq)]
pub struct CoxIngersollRoss {
    a: Real,
    b: Rate,
    sigma: Real,
}

/// Simulation settings for [`CoxIngersollRoss::simulate`] and
/// [`CoxIngersollRoss::price_path`].
#[derive(Debug, Clone, PartialEq)]
pub struct CirSimulation {
    /// Horizon in years; also the maturity of the priced zero-coupon bond.
    pub n_years: Time,
    /// Number of paths (columns).
    pub n_scenarios: Size,
    /// Time steps per year.
    pub steps_per_year: Size,
    /// Initial annual rate; `None` starts at the long-run mean `b`.
    pub r_0: Option<Rate>,
    /// Face value of the zero-coupon bond priced along the paths.
    pub principal: Price,
}

impl Default for CirSimulation {
    fn default() -> Self {
        Self {
            n_years: 10.0,
            n_scenarios: 1,
            steps_per_year: 12,
            r_0: None,
            principal: 1.0,
        }
    }
}

impl CirSimulation {
    /// Set the horizon in years.
    pub fn with_years(mut self, n_years: Time) -> Self {
        self.n_years = n_years;
        self
    }

    /// Set the number of scenarios.
    pub fn with_scenarios(mut self, n_scenarios: Size) -> Self {
        self.n_scenarios = n_scenarios;
        self
    }

    /// Set the number of steps per year.
    pub fn with_steps_per_year(mut self, steps_per_year: Size) -> Self {
        self.steps_per_year = steps_per_year;
        self
    }

    /// Set the initial annual rate.
    pub fn with_initial_rate(mut self, r_0: Rate) -> Self {
        self.r_0 = Some(r_0);
        self
    }

    /// Set the face value of the priced bond.
    pub fn with_principal(mut self, principal: Price) -> Self {
        self.principal = principal;
        self
    }

    /// Time to maturity at step `k`: `(n_years·steps_per_year − k) / steps_per_year`.
    pub fn time_to_maturity(&self, k: Size) -> Time {
        let spy = self.steps_per_year as Real;
        ((self.n_years * spy - k as Real) / spy).max(0.0)
    }
}

/// Rate and zero-coupon price tables from [`CoxIngersollRoss::price_path`].
#[derive(Debug, Clone, PartialEq)]
pub struct CirPaths {
    /// Annualized short rates, step × scenario.
    pub rates: Matrix,
    /// Zero-coupon prices maturing at the horizon, step × scenario.
    pub prices: Matrix,
}

impl CoxIngersollRoss {
    /// Create a CIR model.
    ///
    /// Fails with [`Error::DegenerateInput`] unless `a > 0` and `sigma > 0`.
    pub fn new(a: Real, b: Rate, sigma: Real) -> Result<Self> {
        if !(a > 0.0 && a.is_finite()) {
            return Err(Error::DegenerateInput(format!(
                "CIR mean-reversion speed must be positive, got {a}"
            )));
        }
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(Error::DegenerateInput(format!(
                "CIR volatility must be positive, got {sigma}"
            )));
        }
        ensure!(b.is_finite(), "CIR long-run mean must be finite, got {b}");
        Ok(Self { a, b, sigma })
    }

    /// Mean-reversion speed `a`.
    pub fn a(&self) -> Real {
        self.a
    }

    /// Long-run mean `b`.
    pub fn b(&self) -> Rate {
        self.b
    }

    /// Volatility `σ`.
    pub fn sigma(&self) -> Real {
        self.sigma
    }

    /// `h = √(a² + 2σ²)`
    pub fn h(&self) -> Real {
        (self.a * self.a + 2.0 * self.sigma * self.sigma).sqrt()
    }

    /// `A(τ)`.
    pub fn a_factor(&self, ttm: Time) -> Real {
        let h = self.h();
        let growth = (h * ttm).exp_m1();
        let exponent = 2.0 * self.a * self.b / (self.sigma * self.sigma);
        let base = 2.0 * h * ((h + self.a) * ttm / 2.0).exp() / (2.0 * h + (h + self.a) * growth);
        base.powf(exponent)
    }

    /// `B(τ)`.
    pub fn b_factor(&self, ttm: Time) -> Real {
        let h = self.h();
        let growth = (h * ttm).exp_m1();
        2.0 * growth / (2.0 * h + (h + self.a) * growth)
    }

    /// Zero-coupon price with face value `principal`.
    pub fn zero_coupon_price(&self, ttm: Time, rate: Rate, principal: Price) -> Price {
        principal * self.discount_bond(ttm, rate)
    }

    /// Feller condition `2ab > σ²`: the continuous process never hits zero.
    pub fn feller_satisfied(&self) -> bool {
        2.0 * self.a * self.b > self.sigma * self.sigma
    }

    fn instantaneous_paths<R: Rng + ?Sized>(
        &self,
        sim: &CirSimulation,
        rng: &mut R,
    ) -> Result<Matrix> {
        let r_0 = sim.r_0.unwrap_or(self.b);
        ensure!(r_0 > -1.0, "initial annual rate must exceed -100%, got {r_0}");
        let r0_inst = annual_to_instantaneous(r_0);
        let gen = ScenarioGenerator::from_horizon(sim.n_years, sim.steps_per_year, sim.n_scenarios)?;
        let process = self.dynamics_process(r0_inst)?;
        debug!(
            a = self.a,
            b = self.b,
            sigma = self.sigma,
            n_steps = gen.n_steps(),
            n_scenarios = gen.n_scenarios(),
            "simulating CIR short rates"
        );
        Ok(gen.generate(process.as_ref(), rng))
    }

    /// Simulate annualized short-rate paths.
    ///
    /// Returns a `(⌊n_years·steps_per_year⌋ + 1) × n_scenarios` table whose
    /// first row is `r_0` (or `b`).
    pub fn simulate<R: Rng + ?Sized>(&self, sim: &CirSimulation, rng: &mut R) -> Result<Matrix> {
        let inst = self.instantaneous_paths(sim, rng)?;
        Ok(inst.map(instantaneous_to_annual))
    }

    /// Simulate annualized rates together with the price of a zero-coupon
    /// bond maturing at the horizon, evaluated at each step.
    pub fn price_path<R: Rng + ?Sized>(&self, sim: &CirSimulation, rng: &mut R) -> Result<CirPaths> {
        let inst = self.instantaneous_paths(sim, rng)?;
        let prices = Matrix::from_fn(inst.rows(), inst.cols(), |k, j| {
            self.zero_coupon_price(sim.time_to_maturity(k), inst[(k, j)], sim.principal)
        });
        Ok(CirPaths {
            rates: inst.map(instantaneous_to_annual),
            prices,
        })
    }
}

impl ShortRateModel for CoxIngersollRoss {
    fn discount_bond(&self, ttm: Time, rate: Rate) -> DiscountFactor {
        self.a_factor(ttm) * (-self.b_factor(ttm) * rate).exp()
    }
}

impl OneFactorModel for CoxIngersollRoss {
    fn short_rate_drift(&self, _t: Time, r: Real) -> Real {
        self.a * (self.b - r)
    }

    fn short_rate_diffusion(&self, _t: Time, r: Real) -> Real {
        self.sigma * r.max(0.0).sqrt()
    }

    fn dynamics_process(&self, r0: Rate) -> Result<Box<dyn StochasticProcess1D>> {
        Ok(Box::new(SquareRootProcess::new(self.a, self.b, self.sigma, r0)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> CoxIngersollRoss {
        CoxIngersollRoss::new(0.05, 0.03, 0.05).unwrap()
    }

    #[test]
    fn discount_bond_at_maturity_is_one() {
        let m = model();
        assert_eq!(m.a_factor(0.0), 1.0);
        assert_eq!(m.b_factor(0.0), 0.0);
        assert_eq!(m.discount_bond(0.0, 0.07), 1.0);
        assert_eq!(m.zero_coupon_price(0.0, 0.02, 100.0), 100.0);
    }

    #[test]
    fn discount_bond_between_zero_and_one() {
        let p = model().discount_bond(5.0, 0.03);
        assert!(p > 0.0 && p < 1.0);
    }

    #[test]
    fn b_factor_matches_small_maturity_limit() {
        // B(τ) ≈ τ for small τ
        assert_relative_eq!(model().b_factor(1e-6), 1e-6, max_relative = 1e-5);
    }

    #[test]
    fn higher_rate_means_lower_price() {
        let m = model();
        assert!(m.discount_bond(10.0, 0.05) < m.discount_bond(10.0, 0.02));
    }

    #[test]
    fn non_positive_parameters_are_degenerate() {
        for (a, sigma) in [(0.0, 0.05), (-0.1, 0.05), (0.05, 0.0), (0.05, -0.2)] {
            let err = CoxIngersollRoss::new(a, 0.03, sigma).unwrap_err();
            assert!(matches!(err, Error::DegenerateInput(_)), "a={a} sigma={sigma}");
        }
    }

    #[test]
    fn feller_condition() {
        // 2ab = 0.0030 > σ² = 0.0025
        assert!(model().feller_satisfied());
        assert!(!CoxIngersollRoss::new(0.05, 0.03, 0.5).unwrap().feller_satisfied());
    }

    #[test]
    fn time_to_maturity_counts_down() {
        let sim = CirSimulation::default().with_years(2.0).with_steps_per_year(4);
        assert_eq!(sim.time_to_maturity(0), 2.0);
        assert_eq!(sim.time_to_maturity(3), 1.25);
        assert_eq!(sim.time_to_maturity(8), 0.0);
    }

    #[test]
    fn diffusion_is_square_root() {
        let m = CoxIngersollRoss::new(0.3, 0.05, 0.1).unwrap();
        assert!((m.short_rate_diffusion(0.0, 0.04) - 0.1 * 0.2).abs() < 1e-15);
        assert_eq!(m.short_rate_diffusion(0.0, -0.01), 0.0);
    }
}
