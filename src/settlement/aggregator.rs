use crate::core::balance::BalanceSheet;
use crate::core::currency::{RateError, RateResolver};
use crate::core::expense::ExpenseSet;
use crate::core::participant::Roster;
use crate::settlement::SettleError;
use log::{debug, warn};
use rust_decimal::Decimal;

/// Folds an expense ledger into one net balance per participant, in the
/// trip's base unit.
///
/// For each expense, payers are credited `amount_paid / divisor` and
/// splitters are debited `share_amount / divisor`, where the divisor comes
/// from the supplied [`RateResolver`]. Ordinary and settlement expenses go
/// through the same arithmetic; a recorded settlement simply moves the
/// debtor and creditor back toward zero.
///
/// The computation is a pure function of the snapshot it is given: rates
/// and the roster arrive as parameters on every call, and callers re-run
/// it after any write to the ledger.
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Compute net balances for every roster member.
    ///
    /// Every participant gets an entry, zero for the uninvolved. Expense
    /// order is irrelevant. Payer or split references to ids outside the
    /// roster are skipped with a warning. Malformed expenses and missing
    /// rates abort with an error.
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
    /// let mut ledger = ExpenseSet::new();
    /// ledger.add(Expense::new(
    ///     "Lunch",
    ///     dec!(40),
    ///     CurrencyCode::new("USD"),
    ///     dec!(1),
    ///     vec![PayerShare::new("alice", dec!(40))],
    ///     vec![
    ///         SplitShare::new("alice", dec!(20)),
    ///         SplitShare::new("bob", dec!(20)),
    ///     ],
    /// ).unwrap());
    ///
    /// let sheet = BalanceAggregator::compute_net_balances(&ledger, &roster, &StoredRate).unwrap();
    /// assert_eq!(sheet.balance(&ParticipantId::new("alice")), dec!(20));
    /// assert_eq!(sheet.balance(&ParticipantId::new("bob")), dec!(-20));
    /// ```
    pub fn compute_net_balances<R: RateResolver>(
        expenses: &ExpenseSet,
        roster: &Roster,
        rates: &R,
    ) -> Result<BalanceSheet, SettleError> {
        let mut sheet = BalanceSheet::for_roster(roster);

        for expense in expenses.iter() {
            // Records from external storage may not have gone through
            // Expense::new; re-check the invariants before trusting them.
            expense.validate()?;

            let divisor = rates.divisor(expense)?;
            if divisor <= Decimal::ZERO {
                return Err(RateError::InvalidRate {
                    currency: expense.currency().clone(),
                    rate: divisor,
                }
                .into());
            }

            for payer in expense.payers() {
                if sheet.contains(&payer.participant) {
                    sheet.adjust(&payer.participant, payer.amount_paid / divisor);
                } else {
                    warn!(
                        "expense '{}' references unknown payer '{}', skipping entry",
                        expense.name(),
                        payer.participant
                    );
                }
            }

            for split in expense.splits() {
                if sheet.contains(&split.participant) {
                    sheet.adjust(&split.participant, -(split.share_amount / divisor));
                } else {
                    warn!(
                        "expense '{}' references unknown splitter '{}', skipping entry",
                        expense.name(),
                        split.participant
                    );
                }
            }
        }

        debug!(
            "aggregated {} expenses into {} balances, outstanding {}",
            expenses.len(),
            sheet.len(),
            sheet.total_outstanding()
        );

        Ok(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::{CurrencyCode, RateTable, StoredRate};
    use crate::core::expense::{Expense, ExpenseError, PayerShare, SplitShare};
    use crate::core::participant::{Participant, ParticipantId};
    use rust_decimal_macros::dec;

    fn usd() -> CurrencyCode {
        CurrencyCode::new("USD")
    }

    fn roster_abc() -> Roster {
        [
            Participant::new("alice", "Alice"),
            Participant::new("bob", "Bob"),
            Participant::new("carol", "Carol"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_dinner_split_three_ways() {
        let mut ledger = ExpenseSet::new();
        ledger.add(
            Expense::new(
                "Dinner",
                dec!(300),
                usd(),
                dec!(1),
                vec![PayerShare::new("alice", dec!(300))],
                vec![
                    SplitShare::new("alice", dec!(100)),
                    SplitShare::new("bob", dec!(100)),
                    SplitShare::new("carol", dec!(100)),
                ],
            )
            .unwrap(),
        );

        let sheet =
            BalanceAggregator::compute_net_balances(&ledger, &roster_abc(), &StoredRate).unwrap();

        assert_eq!(sheet.balance(&ParticipantId::new("alice")), dec!(200));
        assert_eq!(sheet.balance(&ParticipantId::new("bob")), dec!(-100));
        assert_eq!(sheet.balance(&ParticipantId::new("carol")), dec!(-100));
        assert!(sheet.is_balanced());
    }

    #[test]
    fn test_currency_normalization() {
        // 60 EUR hotel, rate 1.1 to base, split alice/bob
        let mut ledger = ExpenseSet::new();
        ledger.add(
            Expense::new(
                "Hotel",
                dec!(60),
                CurrencyCode::new("EUR"),
                dec!(1.1),
                vec![PayerShare::new("alice", dec!(60))],
                vec![
                    SplitShare::new("alice", dec!(30)),
                    SplitShare::new("bob", dec!(30)),
                ],
            )
            .unwrap(),
        );

        let sheet =
            BalanceAggregator::compute_net_balances(&ledger, &roster_abc(), &StoredRate).unwrap();

        let expected = dec!(30) / dec!(1.1);
        assert_eq!(sheet.balance(&ParticipantId::new("alice")), expected);
        assert_eq!(sheet.balance(&ParticipantId::new("bob")), -expected);
        assert!(sheet.is_balanced());
    }

    #[test]
    fn test_zero_activity_participant_is_exact_zero() {
        let mut ledger = ExpenseSet::new();
        ledger.add(
            Expense::new(
                "Coffee",
                dec!(10),
                usd(),
                dec!(1),
                vec![PayerShare::new("alice", dec!(10))],
                vec![SplitShare::new("bob", dec!(10))],
            )
            .unwrap(),
        );

        let sheet =
            BalanceAggregator::compute_net_balances(&ledger, &roster_abc(), &StoredRate).unwrap();
        assert_eq!(sheet.balance(&ParticipantId::new("carol")), dec!(0));
    }

    #[test]
    fn test_unknown_participant_skipped() {
        let mut ledger = ExpenseSet::new();
        ledger.add(
            Expense::new(
                "Bar",
                dec!(30),
                usd(),
                dec!(1),
                vec![PayerShare::new("alice", dec!(30))],
                vec![
                    SplitShare::new("alice", dec!(15)),
                    SplitShare::new("ghost", dec!(15)),
                ],
            )
            .unwrap(),
        );

        let sheet =
            BalanceAggregator::compute_net_balances(&ledger, &roster_abc(), &StoredRate).unwrap();

        // Ghost's share is dropped; alice keeps the credit for it.
        assert_eq!(sheet.balance(&ParticipantId::new("alice")), dec!(15));
        assert!(!sheet.contains(&ParticipantId::new("ghost")));
    }

    #[test]
    fn test_missing_rate_is_fatal() {
        let mut ledger = ExpenseSet::new();
        ledger.add(
            Expense::new(
                "Ramen",
                dec!(3000),
                CurrencyCode::new("JPY"),
                dec!(150),
                vec![PayerShare::new("alice", dec!(3000))],
                vec![SplitShare::new("bob", dec!(3000))],
            )
            .unwrap(),
        );

        // Table resolver without a JPY entry: whole computation fails.
        let table = RateTable::new(usd());
        let result = BalanceAggregator::compute_net_balances(&ledger, &roster_abc(), &table);
        assert!(matches!(
            result,
            Err(SettleError::Rate(RateError::MissingRate { .. }))
        ));
    }

    #[test]
    fn test_malformed_expense_rejected_defensively() {
        // Bypass Expense::new via serde, as storage-loaded data would.
        let json = r#"{
            "id": "7f4df3ac-4a38-47b4-b7a1-c80e8a4d67f2",
            "name": "Corrupt",
            "kind": "ordinary",
            "amount": "100.00",
            "currency": "USD",
            "rate_to_base": "1",
            "date": "2026-08-01",
            "category": null,
            "payers": [{ "participant": "alice", "amount_paid": "99.99" }],
            "splits": [{ "participant": "bob", "share_amount": "100.00" }]
        }"#;
        let corrupt: Expense = serde_json::from_str(json).unwrap();
        let ledger: ExpenseSet = [corrupt].into_iter().collect();

        let result = BalanceAggregator::compute_net_balances(&ledger, &roster_abc(), &StoredRate);
        assert!(matches!(
            result,
            Err(SettleError::Expense(ExpenseError::PayerSumMismatch { .. }))
        ));
    }

    #[test]
    fn test_closure_resolver() {
        let mut ledger = ExpenseSet::new();
        ledger.add(
            Expense::new(
                "Tapas",
                dec!(22),
                CurrencyCode::new("EUR"),
                dec!(1.1),
                vec![PayerShare::new("alice", dec!(22))],
                vec![SplitShare::new("bob", dec!(22))],
            )
            .unwrap(),
        );

        // Caller-supplied policy: force 1:1 regardless of stored rate.
        let at_par = |_: &Expense| -> Result<rust_decimal::Decimal, RateError> { Ok(dec!(1)) };
        let sheet =
            BalanceAggregator::compute_net_balances(&ledger, &roster_abc(), &at_par).unwrap();
        assert_eq!(sheet.balance(&ParticipantId::new("bob")), dec!(-22));
    }
}
