//! Integration tests for CIR simulation and pricing along simulated paths.

use approx::assert_relative_eq;
use ldi_core::{annual_to_instantaneous, Error};
use ldi_math::MersenneTwisterRng;
use ldi_models::{CirSimulation, CoxIngersollRoss, ShortRateModel};
use proptest::prelude::*;

fn model() -> CoxIngersollRoss {
    CoxIngersollRoss::new(0.05, 0.03, 0.05).unwrap()
}

#[test]
fn simulation_shape_and_initial_row() {
    let sim = CirSimulation::default()
        .with_years(10.0)
        .with_scenarios(7)
        .with_initial_rate(0.04);
    let rates = model().simulate(&sim, &mut MersenneTwisterRng::new(42)).unwrap();
    assert_eq!(rates.rows(), 121);
    assert_eq!(rates.cols(), 7);
    for j in 0..7 {
        assert_relative_eq!(rates[(0, j)], 0.04, max_relative = 1e-14);
    }
}

#[test]
fn initial_rate_defaults_to_long_run_mean() {
    let sim = CirSimulation::default().with_years(1.0).with_scenarios(2);
    let rates = model().simulate(&sim, &mut MersenneTwisterRng::new(1)).unwrap();
    assert_relative_eq!(rates[(0, 0)], 0.03, max_relative = 1e-14);
}

#[test]
fn seeded_generators_reproduce_paths() {
    let sim = CirSimulation::default().with_scenarios(5);
    let a = model().simulate(&sim, &mut MersenneTwisterRng::new(2024)).unwrap();
    let b = model().simulate(&sim, &mut MersenneTwisterRng::new(2024)).unwrap();
    let c = model().simulate(&sim, &mut MersenneTwisterRng::new(2025)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn price_path_terminal_value_is_principal() {
    let sim = CirSimulation::default()
        .with_years(5.0)
        .with_scenarios(4)
        .with_principal(100.0);
    let paths = model().price_path(&sim, &mut MersenneTwisterRng::new(7)).unwrap();
    let last = paths.prices.rows() - 1;
    for j in 0..4 {
        assert_eq!(paths.prices[(last, j)], 100.0);
    }
}

#[test]
fn price_path_first_row_uses_full_horizon() {
    let m = model();
    let sim = CirSimulation::default().with_years(10.0).with_initial_rate(0.03);
    let paths = m.price_path(&sim, &mut MersenneTwisterRng::new(3)).unwrap();
    let expected = m.discount_bond(10.0, annual_to_instantaneous(0.03));
    assert_relative_eq!(paths.prices[(0, 0)], expected, max_relative = 1e-14);
}

#[test]
fn price_path_rates_match_simulate_for_same_seed() {
    let m = model();
    let sim = CirSimulation::default().with_years(3.0).with_scenarios(3);
    let rates = m.simulate(&sim, &mut MersenneTwisterRng::new(99)).unwrap();
    let paths = m.price_path(&sim, &mut MersenneTwisterRng::new(99)).unwrap();
    assert_eq!(rates, paths.rates);
}

#[test]
fn negative_initial_rate_is_rejected() {
    let sim = CirSimulation::default().with_initial_rate(-0.01);
    let err = model().simulate(&sim, &mut MersenneTwisterRng::new(0)).unwrap_err();
    assert!(matches!(err, Error::Precondition(_)));
}

#[test]
fn zero_steps_per_year_is_rejected() {
    let sim = CirSimulation::default().with_steps_per_year(0);
    assert!(model().simulate(&sim, &mut MersenneTwisterRng::new(0)).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn simulated_rates_never_negative(
        seed in any::<u64>(),
        a in 0.01f64..2.0,
        b in 0.0f64..0.10,
        sigma in 0.01f64..0.8,
        r_0 in 0.0f64..0.10,
    ) {
        let m = CoxIngersollRoss::new(a, b, sigma).unwrap();
        let sim = CirSimulation::default()
            .with_years(5.0)
            .with_scenarios(8)
            .with_initial_rate(r_0);
        let rates = m.simulate(&sim, &mut MersenneTwisterRng::new(seed)).unwrap();
        prop_assert!(rates.all(|r| r >= 0.0));
    }

    #[test]
    fn zero_coupon_at_maturity_is_exactly_unit(
        a in 0.01f64..2.0,
        b in -0.02f64..0.10,
        sigma in 0.01f64..0.8,
        r in 0.0f64..0.5,
    ) {
        let m = CoxIngersollRoss::new(a, b, sigma).unwrap();
        prop_assert_eq!(m.discount_bond(0.0, r), 1.0);
    }
}
