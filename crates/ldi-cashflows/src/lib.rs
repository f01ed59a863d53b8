//! # ldi-cashflows
//!
//! Cash-flow schedules, bullet bonds, present value and duration, the
//! two-bond duration match, funding ratios, and bond repricing along
//! simulated rate paths.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bond;
pub mod bond_simulation;
pub mod cashflow;
pub mod cashflows;

pub use bond::Bond;
pub use bond_simulation::{period_returns, realized_returns, reprice_along_paths};
pub use cashflow::{build_cash_flows, CashFlow, CashFlowSchedule};
pub use cashflows::{
    funding_ratio, funding_ratio_discounted, macaulay_duration, match_duration, present_value,
};
