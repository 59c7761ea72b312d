//! Spending analytics over a trip ledger.

pub mod spending;
