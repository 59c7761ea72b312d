use crate::core::currency::CurrencyCode;
use crate::core::expense::{Expense, ExpenseError};
use crate::settlement::simplify::Transfer;
use log::debug;
use rust_decimal::Decimal;

/// Prefix tagging settlement expense names, kept for display and for
/// compatibility with ledgers that predate the explicit kind field.
pub const SETTLEMENT_PREFIX: &str = "Settlement:";

/// Turns a confirmed transfer into a synthetic settlement expense.
///
/// The expense credits the debtor (single payer) and debits the creditor
/// (single splitter) by the paid amount, so the next aggregation run moves
/// both balances toward zero by exactly that amount. Persisting the record
/// is the caller's job; if persistence fails, nothing changed.
pub struct SettlementRecorder;

impl SettlementRecorder {
    /// Build the settlement expense for a transfer.
    ///
    /// `amount_paid` is what the user actually paid, in `currency` — it
    /// need not equal the suggested `transfer.amount` (partial and
    /// overpaid settlements are real life). `rate_to_base` is the divisor
    /// for `currency` at recording time, supplied by the caller's rate
    /// source.
    ///
    /// # Examples
    ///
    /// ```
    /// use tripsettle::prelude::*;
    /// use tripsettle::settlement::recorder::SETTLEMENT_PREFIX;
    /// use rust_decimal_macros::dec;
    ///
    /// let suggested = Transfer::new("bob", "alice", dec!(50));
    /// let expense = SettlementRecorder::record(
    ///     &suggested,
    ///     dec!(50),
    ///     CurrencyCode::new("USD"),
    ///     dec!(1),
    /// )
    /// .unwrap();
    ///
    /// assert!(expense.is_settlement());
    /// assert!(expense.name().starts_with(SETTLEMENT_PREFIX));
    /// ```
    pub fn record(
        transfer: &Transfer,
        amount_paid: Decimal,
        currency: CurrencyCode,
        rate_to_base: Decimal,
    ) -> Result<Expense, ExpenseError> {
        let name = format!("{} {} to {}", SETTLEMENT_PREFIX, transfer.from, transfer.to);
        let expense = Expense::settlement(
            name,
            amount_paid,
            currency,
            rate_to_base,
            transfer.from.clone(),
            transfer.to.clone(),
        )?;

        debug!(
            "recorded settlement {} -> {} for {} {}",
            transfer.from,
            transfer.to,
            amount_paid,
            expense.currency()
        );

        Ok(expense)
    }
}
