//! Foundational types for trip ledgers: participants, currencies,
//! expenses, and net balances.

pub mod balance;
pub mod currency;
pub mod expense;
pub mod participant;
