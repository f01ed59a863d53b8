//! Cash-flow analysis functions.
//!
//! Static utilities over a [`CashFlowSchedule`] and a flat per-period rate:
//! - `present_value`
//! - `macaulay_duration`
//! - `match_duration`: two-bond duration hedge of a liability
//! - `funding_ratio`, `funding_ratio_discounted`

use crate::cashflow::CashFlowSchedule;
use ldi_core::{discount, errors::Error, errors::Result, Price, Rate, Real, Time};
use ldi_math::is_negligible;

// ── Present value ────────────────────────────────────────────────────────────

/// `Σ amount · (1 + rate)^(−time)`.
pub fn present_value(cash_flows: &CashFlowSchedule, rate: Rate) -> Price {
    cash_flows
        .iter()
        .map(|cf| cf.amount * discount(cf.time, rate))
        .sum()
}

// ── Duration ─────────────────────────────────────────────────────────────────

/// Present-value weighted average payment time, in the schedule's periods.
///
/// Fails with [`Error::DegenerateInput`] when the schedule's present value
/// is zero.
pub fn macaulay_duration(cash_flows: &CashFlowSchedule, rate: Rate) -> Result<Time> {
    let total = present_value(cash_flows, rate);
    if total == 0.0 || !total.is_finite() {
        return Err(Error::DegenerateInput(format!(
            "duration of a cash-flow schedule with present value {total}"
        )));
    }
    Ok(cash_flows
        .iter()
        .map(|cf| cf.time * (cf.amount * discount(cf.time, rate) / total))
        .sum())
}

/// Weight of the short bond in a short/long mix whose duration equals the
/// liability's: `(D_long − D_liab) / (D_long − D_short)`.
///
/// The weight is not clamped to `[0, 1]`; a liability outside the two bond
/// durations gives a leveraged or short position.
pub fn match_duration(
    short_bond: &CashFlowSchedule,
    long_bond: &CashFlowSchedule,
    liabilities: &CashFlowSchedule,
    rate: Rate,
) -> Result<Real> {
    let d_short = macaulay_duration(short_bond, rate)?;
    let d_long = macaulay_duration(long_bond, rate)?;
    let d_liab = macaulay_duration(liabilities, rate)?;
    let spread = d_long - d_short;
    if is_negligible(spread, d_long, 4096) {
        return Err(Error::DegenerateInput(format!(
            "both bonds have duration {d_short}; no mix can move the duration"
        )));
    }
    Ok((d_long - d_liab) / spread)
}

// ── Funding ratio ────────────────────────────────────────────────────────────

/// Current asset value over the present value of the liabilities.
pub fn funding_ratio(assets: Price, liabilities: &CashFlowSchedule, rate: Rate) -> Result<Real> {
    let pv_liab = liabilities_pv(liabilities, rate)?;
    Ok(assets / pv_liab)
}

/// Present value of asset cash flows over present value of the liabilities.
pub fn funding_ratio_discounted(
    assets: &CashFlowSchedule,
    liabilities: &CashFlowSchedule,
    rate: Rate,
) -> Result<Real> {
    let pv_liab = liabilities_pv(liabilities, rate)?;
    Ok(present_value(assets, rate) / pv_liab)
}

fn liabilities_pv(liabilities: &CashFlowSchedule, rate: Rate) -> Result<Price> {
    let pv = present_value(liabilities, rate);
    if pv == 0.0 || !pv.is_finite() {
        return Err(Error::DegenerateInput(format!(
            "liabilities have present value {pv}"
        )));
    }
    Ok(pv)
}
