//! Allocation rule trait definitions.

use quadrant_primitives::{Regime, Sleeve};

/// Turns a lagged regime signal into a two-sleeve allocation.
///
/// Implementations only ever see the regime known at the previous period;
/// callers are responsible for applying the lag.
pub trait AllocationRule: Send + Sync {
    /// Weight on the high-yield sleeve in `[0, 1]`; the remainder goes to investment grade.
    fn hy_weight(&self, signal: Option<Regime>) -> f64;

    /// Weight on the investment-grade sleeve.
    fn ig_weight(&self, signal: Option<Regime>) -> f64 {
        1.0 - self.hy_weight(signal)
    }

    /// Dominant sleeve for reporting; ties resolve to investment grade.
    fn sleeve(&self, signal: Option<Regime>) -> Sleeve {
        if self.hy_weight(signal) > 0.5 { Sleeve::HighYield } else { Sleeve::InvestmentGrade }
    }

    /// Returns the name of this rule.
    fn name(&self) -> &str;
}
