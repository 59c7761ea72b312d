use crate::core::balance::BALANCE_EPSILON;
use crate::core::currency::CurrencyCode;
use crate::core::participant::ParticipantId;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors detected when constructing or validating an expense.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("expense '{name}' has no payers")]
    EmptyPayers { name: String },
    #[error("expense '{name}' has no splits")]
    EmptySplits { name: String },
    #[error("expense '{name}' amount must be positive, got {amount}")]
    NonPositiveAmount { name: String, amount: Decimal },
    #[error("expense '{name}' conversion rate must be positive, got {rate}")]
    NonPositiveRate { name: String, rate: Decimal },
    #[error("expense '{name}' payer amounts sum to {paid}, expected {amount}")]
    PayerSumMismatch {
        name: String,
        paid: Decimal,
        amount: Decimal,
    },
    #[error("expense '{name}' split shares sum to {shared}, expected {amount}")]
    SplitSumMismatch {
        name: String,
        shared: Decimal,
        amount: Decimal,
    },
}

/// Distinguishes ordinary expenses from synthetic settlement entries.
///
/// The original convention of tagging settlements with a name prefix is
/// kept for display, but the authoritative marker is this field: balance
/// aggregation treats both kinds identically, while spending analytics
/// skip settlements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    Ordinary,
    Settlement,
}

/// One payer entry: who put money in, and how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerShare {
    pub participant: ParticipantId,
    pub amount_paid: Decimal,
}

impl PayerShare {
    pub fn new(participant: impl Into<ParticipantId>, amount_paid: Decimal) -> Self {
        Self {
            participant: participant.into(),
            amount_paid,
        }
    }
}

/// One split entry: who consumed, and what their share is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitShare {
    pub participant: ParticipantId,
    pub share_amount: Decimal,
}

impl SplitShare {
    pub fn new(participant: impl Into<ParticipantId>, share_amount: Decimal) -> Self {
        Self {
            participant: participant.into(),
            share_amount,
        }
    }
}

/// An event where one or more participants paid money that is divided
/// among one or more participants.
///
/// Invariant: payer amounts and split shares each sum to `amount` within
/// [`BALANCE_EPSILON`]. Construction enforces this; [`Expense::validate`]
/// re-checks it for records arriving from external storage.
///
/// The conversion rate into the trip's base unit is captured per expense
/// at entry time, so historical entries are immune to later rate changes.
///
/// # Examples
///
/// ```
/// use tripsettle::core::expense::{Expense, PayerShare, SplitShare};
/// use tripsettle::core::currency::CurrencyCode;
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::new(
///     "Dinner",
///     dec!(300),
///     CurrencyCode::new("USD"),
///     dec!(1),
///     vec![PayerShare::new("alice", dec!(300))],
///     vec![
///         SplitShare::new("alice", dec!(100)),
///         SplitShare::new("bob", dec!(100)),
///         SplitShare::new("carol", dec!(100)),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(dinner.amount(), dec!(300));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier for this expense.
    id: Uuid,
    /// Display name. Settlements carry a `Settlement:` prefix by convention.
    name: String,
    kind: ExpenseKind,
    /// Total amount in `currency`. Must be positive.
    amount: Decimal,
    currency: CurrencyCode,
    /// Base-unit divisor captured at entry time.
    rate_to_base: Decimal,
    date: NaiveDate,
    /// Optional category for spending analytics.
    category: Option<String>,
    payers: Vec<PayerShare>,
    splits: Vec<SplitShare>,
}

impl Expense {
    /// Create a new ordinary expense, validating the model invariants.
    pub fn new(
        name: impl Into<String>,
        amount: Decimal,
        currency: CurrencyCode,
        rate_to_base: Decimal,
        payers: Vec<PayerShare>,
        splits: Vec<SplitShare>,
    ) -> Result<Self, ExpenseError> {
        Self::build(
            name.into(),
            ExpenseKind::Ordinary,
            amount,
            currency,
            rate_to_base,
            payers,
            splits,
        )
    }

    /// Create a synthetic settlement expense: a single payer (the debtor)
    /// and a single splitter (the creditor), both at `amount`.
    pub fn settlement(
        name: impl Into<String>,
        amount: Decimal,
        currency: CurrencyCode,
        rate_to_base: Decimal,
        payer: ParticipantId,
        recipient: ParticipantId,
    ) -> Result<Self, ExpenseError> {
        Self::build(
            name.into(),
            ExpenseKind::Settlement,
            amount,
            currency,
            rate_to_base,
            vec![PayerShare::new(payer, amount)],
            vec![SplitShare::new(recipient, amount)],
        )
    }

    fn build(
        name: String,
        kind: ExpenseKind,
        amount: Decimal,
        currency: CurrencyCode,
        rate_to_base: Decimal,
        payers: Vec<PayerShare>,
        splits: Vec<SplitShare>,
    ) -> Result<Self, ExpenseError> {
        let expense = Self {
            id: Uuid::new_v4(),
            name,
            kind,
            amount,
            currency,
            rate_to_base,
            date: Utc::now().date_naive(),
            category: None,
            payers,
            splits,
        };
        expense.validate()?;
        Ok(expense)
    }

    /// Set a specific ID (useful for testing / determinism).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Set the expense date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Set a spending category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Check the expense invariants: positive amount and rate, non-empty
    /// payer and split sets, payer sum == split sum == amount within
    /// [`BALANCE_EPSILON`].
    pub fn validate(&self) -> Result<(), ExpenseError> {
        if self.amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount {
                name: self.name.clone(),
                amount: self.amount,
            });
        }
        if self.rate_to_base <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveRate {
                name: self.name.clone(),
                rate: self.rate_to_base,
            });
        }
        if self.payers.is_empty() {
            return Err(ExpenseError::EmptyPayers {
                name: self.name.clone(),
            });
        }
        if self.splits.is_empty() {
            return Err(ExpenseError::EmptySplits {
                name: self.name.clone(),
            });
        }

        let paid: Decimal = self.payers.iter().map(|p| p.amount_paid).sum();
        if (paid - self.amount).abs() > BALANCE_EPSILON {
            return Err(ExpenseError::PayerSumMismatch {
                name: self.name.clone(),
                paid,
                amount: self.amount,
            });
        }

        let shared: Decimal = self.splits.iter().map(|s| s.share_amount).sum();
        if (shared - self.amount).abs() > BALANCE_EPSILON {
            return Err(ExpenseError::SplitSumMismatch {
                name: self.name.clone(),
                shared,
                amount: self.amount,
            });
        }

        Ok(())
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ExpenseKind {
        self.kind
    }

    pub fn is_settlement(&self) -> bool {
        self.kind == ExpenseKind::Settlement
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn rate_to_base(&self) -> Decimal {
        self.rate_to_base
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn payers(&self) -> &[PayerShare] {
        &self.payers
    }

    pub fn splits(&self) -> &[SplitShare] {
        &self.splits
    }
}

/// The full expense ledger of a trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseSet {
    expenses: Vec<Expense>,
}

impl ExpenseSet {
    pub fn new() -> Self {
        Self {
            expenses: Vec::new(),
        }
    }

    pub fn add(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expense> {
        self.expenses.iter()
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// All unique participants referenced by payer or split entries.
    pub fn participants(&self) -> Vec<ParticipantId> {
        let mut ids: Vec<ParticipantId> = self
            .expenses
            .iter()
            .flat_map(|e| {
                e.payers()
                    .iter()
                    .map(|p| p.participant.clone())
                    .chain(e.splits().iter().map(|s| s.participant.clone()))
            })
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// All unique currencies referenced in this ledger.
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        let mut currencies: Vec<CurrencyCode> = self
            .expenses
            .iter()
            .map(|e| e.currency().clone())
            .collect();
        currencies.sort();
        currencies.dedup();
        currencies
    }
}

impl FromIterator<Expense> for ExpenseSet {
    fn from_iter<T: IntoIterator<Item = Expense>>(iter: T) -> Self {
        Self {
            expenses: iter.into_iter().collect(),
        }
    }
}
