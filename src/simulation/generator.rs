//! Random trip ledger generation.
//!
//! Generates rosters and expense ledgers that always satisfy the expense
//! invariants, for stress-testing the settlement pipeline on realistic
//! sizes (tens to low thousands of entries per trip).

use crate::core::currency::{CurrencyCode, RateTable};
use crate::core::expense::{Expense, ExpenseSet, PayerShare, SplitShare};
use crate::core::participant::{Participant, ParticipantId, Roster};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Configuration for generating a random trip ledger.
#[derive(Debug, Clone)]
pub struct TripConfig {
    /// Number of participants on the trip.
    pub participant_count: usize,
    /// Number of expenses to generate.
    pub expense_count: usize,
    /// Currencies to draw from; the first is the base currency.
    pub currencies: Vec<CurrencyCode>,
    /// Minimum expense amount (in whole units).
    pub min_amount: Decimal,
    /// Maximum expense amount (in whole units).
    pub max_amount: Decimal,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            participant_count: 5,
            expense_count: 30,
            currencies: vec![CurrencyCode::new("USD")],
            min_amount: Decimal::from(5),
            max_amount: Decimal::from(500),
        }
    }
}

/// Generate a random trip: roster, rate table, and a valid expense ledger.
pub fn generate_random_trip(config: &TripConfig) -> (Roster, RateTable, ExpenseSet) {
    let mut rng = rand::thread_rng();

    let roster: Roster = (0..config.participant_count)
        .map(|i| Participant::new(format!("traveler-{:03}", i), format!("Traveler {}", i)))
        .collect();
    let ids: Vec<ParticipantId> = roster.ids().cloned().collect();

    let base = config
        .currencies
        .first()
        .cloned()
        .unwrap_or_else(|| CurrencyCode::new("USD"));
    let mut rates = RateTable::new(base);
    for currency in config.currencies.iter().skip(1) {
        // Divisors between 0.10 and 9.99
        let divisor = Decimal::new(rng.gen_range(10..1000), 2);
        rates
            .set_divisor(currency.clone(), divisor)
            .expect("generated divisor is positive");
    }

    let mut set = ExpenseSet::new();
    for n in 0..config.expense_count {
        let currency = &config.currencies[rng.gen_range(0..config.currencies.len())];
        let divisor = rates
            .divisor_for(currency)
            .expect("all generated currencies have divisors");

        // Random amount in whole cents between min and max
        let min_cents = (config.min_amount * Decimal::from(100))
            .to_i64()
            .unwrap_or(500);
        let max_cents = (config.max_amount * Decimal::from(100))
            .to_i64()
            .unwrap_or(50_000);
        let amount = Decimal::new(rng.gen_range(min_cents..=max_cents), 2);

        let payers = random_payers(&mut rng, &ids, amount);
        let splits = random_splits(&mut rng, &ids, amount);

        let expense = Expense::new(
            format!("Expense {}", n),
            amount,
            currency.clone(),
            divisor,
            payers,
            splits,
        )
        .expect("generated expenses satisfy the invariants");
        set.add(expense);
    }

    (roster, rates, set)
}

/// One or two payers covering the full amount.
fn random_payers(rng: &mut impl Rng, ids: &[ParticipantId], amount: Decimal) -> Vec<PayerShare> {
    let first = rng.gen_range(0..ids.len());
    if ids.len() > 1 && rng.gen_bool(0.2) {
        let mut second = rng.gen_range(0..ids.len());
        while second == first {
            second = rng.gen_range(0..ids.len());
        }
        let half = (amount / Decimal::from(2)).round_dp(2);
        vec![
            PayerShare::new(ids[first].clone(), half),
            PayerShare::new(ids[second].clone(), amount - half),
        ]
    } else {
        vec![PayerShare::new(ids[first].clone(), amount)]
    }
}

/// An even split over a random subset, remainder on the last splitter so
/// shares sum exactly to the amount.
fn random_splits(rng: &mut impl Rng, ids: &[ParticipantId], amount: Decimal) -> Vec<SplitShare> {
    let count = rng.gen_range(1..=ids.len());
    let mut chosen: Vec<usize> = (0..ids.len()).collect();
    for i in (1..chosen.len()).rev() {
        let j = rng.gen_range(0..=i);
        chosen.swap(i, j);
    }
    chosen.truncate(count);

    let share = (amount / Decimal::from(count as i64)).round_dp(2);
    let mut splits: Vec<SplitShare> = chosen
        .iter()
        .take(count - 1)
        .map(|&i| SplitShare::new(ids[i].clone(), share))
        .collect();
    let assigned: Decimal = splits.iter().map(|s| s.share_amount).sum();
    splits.push(SplitShare::new(
        ids[chosen[count - 1]].clone(),
        amount - assigned,
    ));
    splits
}
