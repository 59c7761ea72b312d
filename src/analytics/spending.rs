use crate::core::currency::RateResolver;
use crate::core::expense::ExpenseSet;
use crate::core::participant::{ParticipantId, Roster};
use crate::settlement::SettleError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fallback category for uncategorized expenses.
const OTHERS: &str = "Others";

/// What a trip actually consumed, in the base unit.
///
/// Settlement expenses are excluded everywhere here — they move money
/// between participants but buy nothing — while balance aggregation
/// includes them identically. Participant shares are attributed by
/// splits: what each person consumed, not what they fronted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingSummary {
    /// Total spend across all ordinary expenses.
    pub total_spent: Decimal,
    /// Spend per category; uncategorized expenses land in "Others".
    pub by_category: HashMap<String, Decimal>,
    /// Each roster member's consumed share.
    pub participant_share: HashMap<ParticipantId, Decimal>,
}

impl SpendingSummary {
    /// Summarize a ledger. Rate resolution failures abort, matching the
    /// aggregator's behavior. Split entries for ids outside the roster
    /// are ignored.
    pub fn from_expenses<R: RateResolver>(
        expenses: &ExpenseSet,
        roster: &Roster,
        rates: &R,
    ) -> Result<Self, SettleError> {
        let mut total_spent = Decimal::ZERO;
        let mut by_category: HashMap<String, Decimal> = HashMap::new();
        let mut participant_share: HashMap<ParticipantId, Decimal> = roster
            .ids()
            .map(|id| (id.clone(), Decimal::ZERO))
            .collect();

        for expense in expenses.iter() {
            if expense.is_settlement() {
                continue;
            }

            let divisor = rates.divisor(expense)?;
            let in_base = expense.amount() / divisor;

            total_spent += in_base;
            let category = expense.category().unwrap_or(OTHERS).to_string();
            *by_category.entry(category).or_insert(Decimal::ZERO) += in_base;

            for split in expense.splits() {
                if let Some(share) = participant_share.get_mut(&split.participant) {
                    *share += split.share_amount / divisor;
                }
            }
        }

        Ok(Self {
            total_spent,
            by_category,
            participant_share,
        })
    }

    /// A participant's share of total spend, as a percentage.
    pub fn share_percent(&self, id: &ParticipantId) -> f64 {
        if self.total_spent == Decimal::ZERO {
            return 0.0;
        }
        let share = self
            .participant_share
            .get(id)
            .copied()
            .unwrap_or(Decimal::ZERO);
        let pct = share * Decimal::from(100) / self.total_spent;
        pct.to_string().parse::<f64>().unwrap_or(0.0)
    }
}

impl std::fmt::Display for SpendingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Spending Summary ===")?;
        writeln!(f, "Total Spent: {}", self.total_spent)?;

        writeln!(f, "\nBy Category:")?;
        let mut categories: Vec<_> = self.by_category.iter().collect();
        categories.sort_by(|a, b| b.1.cmp(a.1));
        for (category, amount) in categories {
            writeln!(f, "  {}: {}", category, amount)?;
        }

        writeln!(f, "\nPer Participant:")?;
        let mut shares: Vec<_> = self.participant_share.iter().collect();
        shares.sort_by(|a, b| a.0.cmp(b.0));
        for (id, amount) in shares {
            writeln!(f, "  {}: {}", id, amount)?;
        }
        Ok(())
    }
}
