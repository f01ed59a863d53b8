//! # ldi-models
//!
//! Short-rate models with closed-form zero-coupon pricing.
//!
//! ```text
//! ShortRateModel
//! └── OneFactorModel  → CoxIngersollRoss
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cox_ingersoll_ross;
pub mod short_rate_model;

pub use cox_ingersoll_ross::{CirPaths, CirSimulation, CoxIngersollRoss};
pub use short_rate_model::{OneFactorModel, ShortRateModel};
