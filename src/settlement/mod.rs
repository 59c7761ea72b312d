//! The settlement pipeline: expenses are folded into net balances, net
//! balances are simplified into a transfer plan, and confirmed transfers
//! are recorded back into the ledger as settlement expenses.

pub mod aggregator;
pub mod recorder;
pub mod simplify;

use crate::core::currency::RateError;
use crate::core::expense::ExpenseError;
use thiserror::Error;

/// Errors surfaced by the settlement pipeline.
///
/// Malformed expenses and unresolvable rates abort a computation; unknown
/// participant references do not (they are skipped with a warning so one
/// corrupt record cannot hide everyone else's balances).
#[derive(Debug, Error)]
pub enum SettleError {
    #[error(transparent)]
    Expense(#[from] ExpenseError),
    #[error(transparent)]
    Rate(#[from] RateError),
}
