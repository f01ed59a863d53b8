//! `StochasticProcess1D`: one-factor diffusions `dX = μ(t,X) dt + σ(t,X) dW`.
//!
//! A process is described by its drift (`μ`), diffusion (`σ`) and a
//! discretization step that advances the state by `dt` given a standard
//! normal draw.

use ldi_core::{Real, Time};

/// A 1-dimensional stochastic process.
pub trait StochasticProcess1D: std::fmt::Debug {
    /// Initial value of the process.
    fn x0(&self) -> Real;

    /// Drift `μ(t, x)`.
    fn drift_1d(&self, t: Time, x: Real) -> Real;

    /// Diffusion `σ(t, x)`.
    fn diffusion_1d(&self, t: Time, x: Real) -> Real;

    /// Expected value `E[x(t+Δt) | x(t) = x]`.
    fn expectation_1d(&self, t: Time, x: Real, dt: Time) -> Real {
        x + self.drift_1d(t, x) * dt
    }

    /// Standard deviation `σ(t,x) · √Δt`.
    fn std_deviation_1d(&self, t: Time, x: Real, dt: Time) -> Real {
        self.diffusion_1d(t, x) * dt.sqrt()
    }

    /// Advance by `dt` with standard normal draw `dw`.
    ///
    /// Default: Euler step `E + σ·√Δt · dw`.
    fn evolve_1d(&self, t: Time, x: Real, dt: Time, dw: Real) -> Real {
        self.expectation_1d(t, x, dt) + self.std_deviation_1d(t, x, dt) * dw
    }

    /// Variance of the increment over `Δt`.
    fn variance_1d(&self, t: Time, x: Real, dt: Time) -> Real {
        let s = self.diffusion_1d(t, x);
        s * s * dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dX = 0.05·dt + 0.20·dW
    #[derive(Debug)]
    struct ConstantProcess {
        x0: Real,
        mu: Real,
        sigma: Real,
    }

    impl StochasticProcess1D for ConstantProcess {
        fn x0(&self) -> Real {
            self.x0
        }

        fn drift_1d(&self, _t: Time, _x: Real) -> Real {
            self.mu
        }

        fn diffusion_1d(&self, _t: Time, _x: Real) -> Real {
            self.sigma
        }
    }

    fn process() -> ConstantProcess {
        ConstantProcess {
            x0: 100.0,
            mu: 0.05,
            sigma: 0.20,
        }
    }

    #[test]
    fn euler_step_without_noise() {
        let x_new = process().evolve_1d(0.0, 100.0, 1.0, 0.0);
        assert!((x_new - 100.05).abs() < 1e-12);
    }

    #[test]
    fn euler_step_with_unit_draw() {
        // 100 + 0.05·0.25 + 0.20·0.5·1
        let x_new = process().evolve_1d(0.0, 100.0, 0.25, 1.0);
        assert!((x_new - 100.1125).abs() < 1e-12);
    }

    #[test]
    fn variance_over_step() {
        let v = process().variance_1d(0.0, 100.0, 0.25);
        assert!((v - 0.01).abs() < 1e-15);
    }
}
