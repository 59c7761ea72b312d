//! # tripsettle
//!
//! Group travel-expense settlement and debt simplification engine.
//!
//! Given a trip's ledger of multi-payer, multi-currency, multi-split
//! expenses, this engine computes each participant's net balance in the
//! trip's base currency and produces a short list of pairwise transfers
//! that zeroes every balance.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: participants, currencies, expenses, balances
//! - **settlement** — Balance aggregation, debt simplification, settlement recording
//! - **analytics** — Spending summaries (settlements excluded from consumption stats)
//! - **simulation** — Random trip ledger generation for benchmarks and testing

pub mod analytics;
pub mod core;
pub mod settlement;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::{BalanceSheet, BALANCE_EPSILON, SETTLED_EPSILON};
    pub use crate::core::currency::{CurrencyCode, RateResolver, RateTable, StoredRate};
    pub use crate::core::expense::{Expense, ExpenseKind, ExpenseSet, PayerShare, SplitShare};
    pub use crate::core::participant::{Participant, ParticipantId, Roster};
    pub use crate::settlement::aggregator::BalanceAggregator;
    pub use crate::settlement::recorder::SettlementRecorder;
    pub use crate::settlement::simplify::{DebtSimplifier, Transfer};
    pub use crate::settlement::SettleError;
}
