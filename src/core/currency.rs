use crate::core::expense::Expense;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// ISO 4217-style currency code.
///
/// Supports standard fiat currencies (USD, EUR, JPY, etc.) as well as
/// arbitrary identifiers for anything a trip might want to track.
///
/// # Examples
///
/// ```
/// use tripsettle::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("USD");
/// let eur = CurrencyCode::new("EUR");
/// assert_ne!(usd, eur);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Errors arising from conversion-rate resolution.
#[derive(Debug, Error)]
pub enum RateError {
    #[error("no conversion rate available for {currency}")]
    MissingRate { currency: CurrencyCode },
    #[error("conversion rate must be positive, got {rate} for {currency}")]
    InvalidRate {
        currency: CurrencyCode,
        rate: Decimal,
    },
}

/// Resolves the base-unit divisor for an expense.
///
/// An amount in the expense's currency divided by the resolved divisor
/// yields the amount in the trip's base unit. Which rate applies — the
/// rate captured on the expense, a trip-level table, a live quote — is
/// the caller's policy; the engine only consumes the result.
///
/// Implemented for closures, for [`RateTable`] (table lookup by currency),
/// and for [`StoredRate`] (the per-expense captured rate).
pub trait RateResolver {
    fn divisor(&self, expense: &Expense) -> Result<Decimal, RateError>;
}

impl<F> RateResolver for F
where
    F: Fn(&Expense) -> Result<Decimal, RateError>,
{
    fn divisor(&self, expense: &Expense) -> Result<Decimal, RateError> {
        self(expense)
    }
}

/// Resolver that uses the conversion rate captured on each expense at
/// entry time. Historical entries stay immune to later rate changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredRate;

impl RateResolver for StoredRate {
    fn divisor(&self, expense: &Expense) -> Result<Decimal, RateError> {
        Ok(expense.rate_to_base())
    }
}

/// Per-currency divisor table for normalizing amounts into a base unit.
///
/// The base currency always has divisor 1. Resolving through the table
/// ignores any rate captured on the expense — use it when a trip wants
/// balances at current rates rather than entry-time rates.
///
/// # Examples
///
/// ```
/// use tripsettle::core::currency::{CurrencyCode, RateTable};
/// use rust_decimal_macros::dec;
///
/// let mut rates = RateTable::new(CurrencyCode::new("USD"));
/// rates.set_divisor(CurrencyCode::new("EUR"), dec!(1.1)).unwrap();
///
/// let divisor = rates.divisor_for(&CurrencyCode::new("EUR")).unwrap();
/// assert_eq!(divisor, dec!(1.1));
/// ```
#[derive(Debug, Clone)]
pub struct RateTable {
    /// The base currency for normalization.
    base_currency: CurrencyCode,
    /// currency -> base-unit divisor
    divisors: HashMap<CurrencyCode, Decimal>,
}

impl RateTable {
    /// Create a new rate table with the given base currency (divisor 1).
    pub fn new(base_currency: CurrencyCode) -> Self {
        let mut divisors = HashMap::new();
        divisors.insert(base_currency.clone(), Decimal::ONE);
        Self {
            base_currency,
            divisors,
        }
    }

    pub fn base_currency(&self) -> &CurrencyCode {
        &self.base_currency
    }

    /// Set the base-unit divisor for a currency.
    pub fn set_divisor(&mut self, currency: CurrencyCode, rate: Decimal) -> Result<(), RateError> {
        if rate <= Decimal::ZERO {
            return Err(RateError::InvalidRate { currency, rate });
        }
        self.divisors.insert(currency, rate);
        Ok(())
    }

    /// Get the divisor for a currency.
    pub fn divisor_for(&self, currency: &CurrencyCode) -> Result<Decimal, RateError> {
        self.divisors
            .get(currency)
            .copied()
            .ok_or_else(|| RateError::MissingRate {
                currency: currency.clone(),
            })
    }

    /// Convert an amount from a currency into the base unit.
    pub fn to_base(&self, amount: Decimal, currency: &CurrencyCode) -> Result<Decimal, RateError> {
        Ok(amount / self.divisor_for(currency)?)
    }
}

impl RateResolver for RateTable {
    fn divisor(&self, expense: &Expense) -> Result<Decimal, RateError> {
        self.divisor_for(expense.currency())
    }
}
