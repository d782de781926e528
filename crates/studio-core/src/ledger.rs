//! Cash tracking, weekly burn, and bankruptcy determination.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why and when the studio went under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bankruptcy {
    pub week: u32,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinancialLedger {
    cash: Decimal,
    total_revenue: Decimal,
    total_spend: Decimal,
    last_burn: Decimal,
    bankruptcy: Option<Bankruptcy>,
}

impl FinancialLedger {
    pub fn new(starting_cash: Decimal) -> Self {
        Self {
            cash: starting_cash,
            total_revenue: Decimal::ZERO,
            total_spend: Decimal::ZERO,
            last_burn: Decimal::ZERO,
            bankruptcy: None,
        }
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn total_revenue(&self) -> Decimal {
        self.total_revenue
    }

    pub fn total_spend(&self) -> Decimal {
        self.total_spend
    }

    pub fn last_burn(&self) -> Decimal {
        self.last_burn
    }

    /// Discretionary spending never dips into overdraft.
    pub fn can_afford(&self, amount: Decimal) -> bool {
        amount <= self.cash
    }

    pub fn debit(&mut self, amount: Decimal) {
        self.apply_delta(-amount);
    }

    pub fn credit(&mut self, amount: Decimal) {
        self.apply_delta(amount);
    }

    /// Applies a signed cash movement, tracking revenue and spend separately.
    pub fn apply_delta(&mut self, delta: Decimal) {
        if delta.is_sign_negative() {
            self.total_spend += -delta;
        } else {
            self.total_revenue += delta;
        }
        self.cash += delta;
    }

    /// Charges the periodic burn and returns it.
    pub fn apply_burn(&mut self, burn: Decimal) -> Decimal {
        self.last_burn = burn;
        self.debit(burn);
        burn
    }

    /// Flags bankruptcy once cash falls below `floor`. Returns true only on the
    /// call that flips the flag; the flag never clears.
    pub fn check_solvency(&mut self, floor: Decimal, week: u32) -> bool {
        if self.bankruptcy.is_some() || self.cash >= floor {
            return false;
        }
        let reason = format!(
            "cash fell to ${} in week {}, below the ${} credit floor",
            self.cash.round_dp(0),
            week,
            floor.round_dp(0)
        );
        tracing::warn!(%reason, "studio bankrupt");
        self.bankruptcy = Some(Bankruptcy { week, reason });
        true
    }

    pub fn is_bankrupt(&self) -> bool {
        self.bankruptcy.is_some()
    }

    pub fn bankruptcy(&self) -> Option<&Bankruptcy> {
        self.bankruptcy.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn debit_and_credit_track_totals() {
        let mut l = FinancialLedger::new(Decimal::new(1_000, 0));
        l.debit(Decimal::new(300, 0));
        l.credit(Decimal::new(50, 0));
        assert_eq!(l.cash(), Decimal::new(750, 0));
        assert_eq!(l.total_spend(), Decimal::new(300, 0));
        assert_eq!(l.total_revenue(), Decimal::new(50, 0));
        assert!(l.can_afford(Decimal::new(750, 0)));
        assert!(!l.can_afford(Decimal::new(751, 0)));
    }

    #[test]
    fn bankruptcy_is_sticky() {
        let mut l = FinancialLedger::new(Decimal::new(100, 0));
        let floor = Decimal::new(-500, 0);
        l.apply_burn(Decimal::new(550, 0));
        assert!(!l.check_solvency(floor, 3));
        l.apply_burn(Decimal::new(100, 0));
        assert!(l.check_solvency(floor, 4));
        assert!(l.is_bankrupt());
        assert_eq!(l.bankruptcy().map(|b| b.week), Some(4));
        l.credit(Decimal::new(10_000, 0));
        assert!(!l.check_solvency(floor, 5));
        assert!(l.is_bankrupt());
    }

    proptest! {
        #[test]
        fn deltas_conserve_cash(deltas in proptest::collection::vec(-10_000i64..10_000, 0..50)) {
            let mut l = FinancialLedger::new(Decimal::ZERO);
            let mut expected = Decimal::ZERO;
            for d in deltas {
                l.apply_delta(Decimal::new(d, 0));
                expected += Decimal::new(d, 0);
            }
            prop_assert_eq!(l.cash(), expected);
            prop_assert_eq!(l.total_revenue() - l.total_spend(), expected);
        }
    }
}
