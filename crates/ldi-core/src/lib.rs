//! # ldi-core
//!
//! Core types, rate conventions, and error definitions for ldi-rs.
//!
//! This crate provides the foundational building blocks shared across all
//! other crates in the workspace: type aliases, the error hierarchy with the
//! `ensure!` / `ensure_dim!` macros, and the annual ↔ instantaneous rate
//! conversions used by the short-rate models.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Rate conventions and discounting.
pub mod compounding;

/// Error types and the `ensure!` / `ensure_dim!` macros.
pub mod errors;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A discount factor in [0, 1].
pub type DiscountFactor = Real;

/// A price or value.
pub type Price = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement in years (or in periods, where stated).
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use compounding::{annual_to_instantaneous, discount, instantaneous_to_annual};
pub use errors::{Error, Result};
