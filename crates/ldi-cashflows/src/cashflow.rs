//! Cash flows and cash-flow schedules.
//!
//! A cash flow is an amount paid at a time expressed in periods (payment
//! number for a bond schedule, years for an annual liability ladder). The
//! discount rate applied to a schedule must use the same periodicity.

use ldi_core::{ensure, errors::Result, Real, Size, Time};

/// A single amount paid at a single time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlow {
    /// Payment time, in periods.
    pub time: Time,
    /// The payment amount.
    pub amount: Real,
}

impl CashFlow {
    /// Create a new cash flow.
    pub fn new(time: Time, amount: Real) -> Self {
        Self { time, amount }
    }
}

/// An ordered sequence of cash flows with strictly increasing times.
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowSchedule {
    flows: Vec<CashFlow>,
}

impl CashFlowSchedule {
    /// Create a schedule from cash flows.
    ///
    /// Times must be finite, non-negative and strictly increasing.
    pub fn new(flows: Vec<CashFlow>) -> Result<Self> {
        ensure!(
            flows.iter().all(|cf| cf.time.is_finite() && cf.time >= 0.0),
            "cash-flow times must be finite and non-negative"
        );
        ensure!(
            flows.windows(2).all(|w| w[0].time < w[1].time),
            "cash-flow times must be strictly increasing"
        );
        Ok(Self { flows })
    }

    /// Create a schedule from `(time, amount)` pairs.
    pub fn from_pairs(pairs: &[(Time, Real)]) -> Result<Self> {
        Self::new(pairs.iter().map(|&(t, a)| CashFlow::new(t, a)).collect())
    }

    /// A single payment of `amount` at `time`, e.g. one liability or a
    /// zero-coupon bond.
    pub fn single(time: Time, amount: Real) -> Result<Self> {
        Self::new(vec![CashFlow::new(time, amount)])
    }

    /// Number of cash flows.
    pub fn len(&self) -> Size {
        self.flows.len()
    }

    /// Whether the schedule has no cash flows.
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Iterator over the cash flows in time order.
    pub fn iter(&self) -> impl Iterator<Item = &CashFlow> {
        self.flows.iter()
    }

    /// The cash flows as a slice.
    pub fn flows(&self) -> &[CashFlow] {
        &self.flows
    }

    /// The final cash flow.
    pub fn last(&self) -> Option<&CashFlow> {
        self.flows.last()
    }
}

/// Bullet-bond schedule: `round(maturity · coupons_per_year)` equal coupons
/// of `principal · coupon_rate / coupons_per_year` at payment numbers
/// `1, 2, …`, the last one augmented by `principal`.
pub fn build_cash_flows(
    maturity: Time,
    principal: Real,
    coupon_rate: Real,
    coupons_per_year: Size,
) -> Result<CashFlowSchedule> {
    ensure!(coupons_per_year > 0, "coupons_per_year must be positive");
    ensure!(maturity.is_finite(), "maturity must be finite, got {maturity}");
    let n = (maturity * coupons_per_year as Real).round();
    ensure!(
        n >= 1.0,
        "a bond maturing in {maturity} years pays no coupon at {coupons_per_year} per year"
    );
    let n = n as Size;
    let coupon = principal * coupon_rate / coupons_per_year as Real;
    let flows = (1..=n)
        .map(|i| {
            let amount = if i == n { coupon + principal } else { coupon };
            CashFlow::new(i as Time, amount)
        })
        .collect();
    Ok(CashFlowSchedule { flows })
}
