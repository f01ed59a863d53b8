//! # ldikit
//!
//! Portfolio optimisation, CIR short-rate simulation and liability-driven
//! investment analytics.
//!
//! This crate is a **façade** that re-exports the public items of the
//! workspace crates. Application code should depend on this crate rather
//! than the individual `ldi-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! ldikit = "0.1"
//! ```
//!
//! ```rust
//! use ldikit::cashflows::{build_cash_flows, macaulay_duration};
//!
//! let zero = build_cash_flows(5.0, 100.0, 0.0, 1).unwrap();
//! assert_eq!(macaulay_duration(&zero, 0.04).unwrap(), 5.0);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, rate conventions and error definitions.
pub use ldi_core as core;

/// Arrays, matrices, optimisation, statistics and RNG.
pub use ldi_math as math;

/// Stochastic process definitions and scenario generation.
pub use ldi_processes as processes;

/// Short-rate models.
pub use ldi_models as models;

/// Cash-flow schedules, bonds, duration and funding ratios.
pub use ldi_cashflows as cashflows;

/// Portfolio return, volatility and efficient frontiers.
pub use ldi_portfolio as portfolio;
