use crate::core::balance::{BalanceSheet, SETTLED_EPSILON};
use crate::core::participant::ParticipantId;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A proposed payment from a debtor to a creditor, in the base unit.
///
/// Ephemeral until a user confirms it, at which point the recorder turns
/// it into a persisted settlement expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Decimal,
}

impl Transfer {
    pub fn new(from: impl Into<ParticipantId>, to: impl Into<ParticipantId>, amount: Decimal) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pays {} {}", self.from, self.to, self.amount)
    }
}

/// Converts net balances into a short repayment plan by greedy
/// largest-debtor / largest-creditor matching.
pub struct DebtSimplifier;

impl DebtSimplifier {
    /// Produce an ordered transfer list that zeroes all balances.
    ///
    /// Debtors and creditors are sorted descending by magnitude (stable,
    /// so equal magnitudes keep roster order). Each step pairs the largest
    /// remaining debtor with the largest remaining creditor for
    /// `min(remaining)` and advances whichever side drops below
    /// [`SETTLED_EPSILON`]; a matched pair of equal magnitude advances
    /// both. The result has at most `debtors + creditors - 1` entries.
    ///
    /// Greedy matching does not guarantee the theoretical minimum number
    /// of transfers (that variant is NP-hard) but is the standard
    /// practical approximation.
    ///
    /// # Examples
    ///
    /// ```
    /// use tripsettle::prelude::*;
    /// use rust_decimal_macros::dec;
    ///
    /// let roster: Roster = [
    ///     Participant::new("alice", "Alice"),
    ///     Participant::new("bob", "Bob"),
    /// ]
    /// .into_iter()
    /// .collect();
    ///
    /// let mut sheet = BalanceSheet::for_roster(&roster);
    /// sheet.adjust(&ParticipantId::new("alice"), dec!(50));
    /// sheet.adjust(&ParticipantId::new("bob"), dec!(-50));
    ///
    /// let plan = DebtSimplifier::simplify(&sheet);
    /// assert_eq!(plan, vec![Transfer::new("bob", "alice", dec!(50))]);
    /// ```
    pub fn simplify(balances: &BalanceSheet) -> Vec<Transfer> {
        let mut debtors = balances.debtors();
        let mut creditors = balances.creditors();

        // Stable sort: ties keep roster insertion order.
        debtors.sort_by(|a, b| b.1.cmp(&a.1));
        creditors.sort_by(|a, b| b.1.cmp(&a.1));

        let debtor_count = debtors.len();
        let creditor_count = creditors.len();
        let mut transfers = Vec::new();
        let mut d = 0;
        let mut c = 0;

        while d < debtors.len() && c < creditors.len() {
            let amount = debtors[d].1.min(creditors[c].1);
            transfers.push(Transfer {
                from: debtors[d].0.clone(),
                to: creditors[c].0.clone(),
                amount,
            });

            debtors[d].1 -= amount;
            creditors[c].1 -= amount;

            if debtors[d].1 < SETTLED_EPSILON {
                d += 1;
            }
            if creditors[c].1 < SETTLED_EPSILON {
                c += 1;
            }
        }

        debug!(
            "simplified {} debtors / {} creditors into {} transfers",
            debtor_count,
            creditor_count,
            transfers.len()
        );

        transfers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::participant::{Participant, Roster};
    use rust_decimal_macros::dec;

    fn sheet_for(names: &[&str]) -> BalanceSheet {
        let roster: Roster = names
            .iter()
            .map(|n| Participant::new(*n, *n))
            .collect();
        BalanceSheet::for_roster(&roster)
    }

    #[test]
    fn test_single_creditor_two_debtors() {
        let mut sheet = sheet_for(&["alice", "bob", "carol"]);
        sheet.adjust(&ParticipantId::new("alice"), dec!(200));
        sheet.adjust(&ParticipantId::new("bob"), dec!(-100));
        sheet.adjust(&ParticipantId::new("carol"), dec!(-100));

        let plan = DebtSimplifier::simplify(&sheet);
        // bob and carol tie at 100; roster order breaks the tie.
        assert_eq!(
            plan,
            vec![
                Transfer::new("bob", "alice", dec!(100)),
                Transfer::new("carol", "alice", dec!(100)),
            ]
        );
    }

    #[test]
    fn test_single_debtor_two_creditors() {
        let mut sheet = sheet_for(&["alice", "bob", "carol"]);
        sheet.adjust(&ParticipantId::new("alice"), dec!(-150));
        sheet.adjust(&ParticipantId::new("bob"), dec!(100));
        sheet.adjust(&ParticipantId::new("carol"), dec!(50));

        let plan = DebtSimplifier::simplify(&sheet);
        assert_eq!(
            plan,
            vec![
                Transfer::new("alice", "bob", dec!(100)),
                Transfer::new("alice", "carol", dec!(50)),
            ]
        );
    }

    #[test]
    fn test_equal_magnitudes_exhaust_both_sides() {
        let mut sheet = sheet_for(&["alice", "bob"]);
        sheet.adjust(&ParticipantId::new("alice"), dec!(75));
        sheet.adjust(&ParticipantId::new("bob"), dec!(-75));

        let plan = DebtSimplifier::simplify(&sheet);
        assert_eq!(plan, vec![Transfer::new("bob", "alice", dec!(75))]);
    }

    #[test]
    fn test_termination_bound() {
        let mut sheet = sheet_for(&["a", "b", "c", "d", "e"]);
        sheet.adjust(&ParticipantId::new("a"), dec!(-10));
        sheet.adjust(&ParticipantId::new("b"), dec!(-20));
        sheet.adjust(&ParticipantId::new("c"), dec!(-30));
        sheet.adjust(&ParticipantId::new("d"), dec!(25));
        sheet.adjust(&ParticipantId::new("e"), dec!(35));

        let plan = DebtSimplifier::simplify(&sheet);
        let debtors = sheet.debtors().len();
        let creditors = sheet.creditors().len();
        assert!(plan.len() <= debtors + creditors - 1);
    }

    #[test]
    fn test_empty_sheet_is_noop() {
        let sheet = BalanceSheet::new();
        assert!(DebtSimplifier::simplify(&sheet).is_empty());
    }

    #[test]
    fn test_near_zero_balances_are_noop() {
        let mut sheet = sheet_for(&["alice", "bob"]);
        sheet.adjust(&ParticipantId::new("alice"), dec!(0.005));
        sheet.adjust(&ParticipantId::new("bob"), dec!(-0.005));
        assert!(DebtSimplifier::simplify(&sheet).is_empty());
    }

    #[test]
    fn test_transfers_zero_the_sheet() {
        let mut sheet = sheet_for(&["a", "b", "c", "d"]);
        sheet.adjust(&ParticipantId::new("a"), dec!(-37.50));
        sheet.adjust(&ParticipantId::new("b"), dec!(-12.50));
        sheet.adjust(&ParticipantId::new("c"), dec!(40.00));
        sheet.adjust(&ParticipantId::new("d"), dec!(10.00));

        let plan = DebtSimplifier::simplify(&sheet);

        let mut after = sheet.clone();
        for t in &plan {
            after.adjust(&t.from, t.amount);
            after.adjust(&t.to, -t.amount);
        }
        assert!(after.is_settled());
    }

    #[test]
    fn test_transfer_amounts_positive() {
        let mut sheet = sheet_for(&["a", "b", "c"]);
        sheet.adjust(&ParticipantId::new("a"), dec!(-0.03));
        sheet.adjust(&ParticipantId::new("b"), dec!(0.02));
        sheet.adjust(&ParticipantId::new("c"), dec!(0.01));

        let plan = DebtSimplifier::simplify(&sheet);
        assert!(!plan.is_empty());
        for t in plan {
            assert!(t.amount > Decimal::ZERO);
        }
    }
}
