use crate::core::participant::{ParticipantId, Roster};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tolerance for validation and conservation checks.
pub const BALANCE_EPSILON: Decimal = dec!(0.000001);

/// Tolerance below which a balance counts as settled. Wider than
/// [`BALANCE_EPSILON`] to absorb residue from rate divisions.
pub const SETTLED_EPSILON: Decimal = dec!(0.01);

/// Net position of each participant in the trip's base unit.
///
/// A positive balance means the participant is owed money (net creditor).
/// A negative balance means the participant owes money (net debtor).
///
/// Entries keep roster insertion order; that order is the tie-break used
/// by the debt simplifier for equal magnitudes, so results stay
/// deterministic across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceSheet {
    balances: HashMap<ParticipantId, Decimal>,
    order: Vec<ParticipantId>,
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sheet with a zero entry for every roster member, in roster order.
    pub fn for_roster(roster: &Roster) -> Self {
        let mut sheet = Self::new();
        for id in roster.ids() {
            sheet.ensure(id.clone());
        }
        sheet
    }

    /// Ensure an entry exists, initialized to zero.
    pub fn ensure(&mut self, id: ParticipantId) {
        if !self.balances.contains_key(&id) {
            self.balances.insert(id.clone(), Decimal::ZERO);
            self.order.push(id);
        }
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.balances.contains_key(id)
    }

    /// Adjust an existing entry by `delta`. Unknown ids are left untouched;
    /// the aggregator decides how to report those.
    pub fn adjust(&mut self, id: &ParticipantId, delta: Decimal) {
        if let Some(balance) = self.balances.get_mut(id) {
            *balance += delta;
        }
    }

    /// Net balance for a participant, zero if absent.
    pub fn balance(&self, id: &ParticipantId) -> Decimal {
        self.balances.get(id).copied().unwrap_or(Decimal::ZERO)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Decimal)> {
        self.order.iter().map(|id| (id, self.balances[id]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Conservation check: all balances sum to zero within tolerance.
    pub fn is_balanced(&self) -> bool {
        let sum: Decimal = self.balances.values().sum();
        sum.abs() <= BALANCE_EPSILON
    }

    /// Participants owing money, with debt magnitudes (positive), in
    /// insertion order. Balances within [`SETTLED_EPSILON`] of zero are
    /// excluded.
    pub fn debtors(&self) -> Vec<(ParticipantId, Decimal)> {
        self.iter()
            .filter(|(_, b)| *b < -SETTLED_EPSILON)
            .map(|(id, b)| (id.clone(), b.abs()))
            .collect()
    }

    /// Participants owed money, with credit magnitudes, in insertion order.
    pub fn creditors(&self) -> Vec<(ParticipantId, Decimal)> {
        self.iter()
            .filter(|(_, b)| *b > SETTLED_EPSILON)
            .map(|(id, b)| (id.clone(), b))
            .collect()
    }

    /// True when every balance is within [`SETTLED_EPSILON`] of zero.
    pub fn is_settled(&self) -> bool {
        self.balances.values().all(|b| b.abs() <= SETTLED_EPSILON)
    }

    /// Total amount that still needs to move: sum of positive balances
    /// (equal to the sum of |negative| balances when conservation holds).
    pub fn total_outstanding(&self) -> Decimal {
        self.balances
            .values()
            .filter(|b| **b > Decimal::ZERO)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::participant::Participant;
    use rust_decimal_macros::dec;

    fn three_roster() -> Roster {
        [
            Participant::new("alice", "Alice"),
            Participant::new("bob", "Bob"),
            Participant::new("carol", "Carol"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_roster_sheet_starts_at_zero() {
        let sheet = BalanceSheet::for_roster(&three_roster());
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet.balance(&ParticipantId::new("bob")), Decimal::ZERO);
        assert!(sheet.is_balanced());
        assert!(sheet.is_settled());
    }

    #[test]
    fn test_adjust_and_partition() {
        let mut sheet = BalanceSheet::for_roster(&three_roster());
        sheet.adjust(&ParticipantId::new("alice"), dec!(200));
        sheet.adjust(&ParticipantId::new("bob"), dec!(-100));
        sheet.adjust(&ParticipantId::new("carol"), dec!(-100));

        assert!(sheet.is_balanced());
        assert!(!sheet.is_settled());

        let debtors = sheet.debtors();
        assert_eq!(debtors.len(), 2);
        // Magnitudes are positive, insertion order preserved
        assert_eq!(debtors[0], (ParticipantId::new("bob"), dec!(100)));
        assert_eq!(debtors[1], (ParticipantId::new("carol"), dec!(100)));

        let creditors = sheet.creditors();
        assert_eq!(creditors, vec![(ParticipantId::new("alice"), dec!(200))]);
        assert_eq!(sheet.total_outstanding(), dec!(200));
    }

    #[test]
    fn test_adjust_unknown_is_noop() {
        let mut sheet = BalanceSheet::for_roster(&three_roster());
        sheet.adjust(&ParticipantId::new("ghost"), dec!(50));
        assert_eq!(sheet.len(), 3);
        assert!(sheet.is_balanced());
    }

    #[test]
    fn test_residue_counts_as_settled() {
        let mut sheet = BalanceSheet::for_roster(&three_roster());
        sheet.adjust(&ParticipantId::new("alice"), dec!(0.009));
        sheet.adjust(&ParticipantId::new("bob"), dec!(-0.009));
        assert!(sheet.is_settled());
        assert!(sheet.debtors().is_empty());
        assert!(sheet.creditors().is_empty());
    }
}
