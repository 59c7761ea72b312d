//! Multi-currency trip example.
//!
//! Expenses in USD, EUR, and JPY are normalized into a USD base unit via
//! per-expense captured rates, then settled with a single transfer plan.

use rust_decimal_macros::dec;
use tripsettle::analytics::spending::SpendingSummary;
use tripsettle::prelude::*;

fn main() {
    println!("╔══════════════════════════════════════╗");
    println!("║  tripsettle: Multi-Currency Trip     ║");
    println!("╚══════════════════════════════════════╝\n");

    let roster: Roster = [
        Participant::new("alice", "Alice"),
        Participant::new("bob", "Bob"),
        Participant::new("carol", "Carol"),
    ]
    .into_iter()
    .collect();

    let mut ledger = ExpenseSet::new();

    // Flights in USD, paid by Alice.
    ledger.add(
        Expense::new(
            "Flights",
            dec!(600),
            CurrencyCode::new("USD"),
            dec!(1),
            vec![PayerShare::new("alice", dec!(600))],
            vec![
                SplitShare::new("alice", dec!(200)),
                SplitShare::new("bob", dec!(200)),
                SplitShare::new("carol", dec!(200)),
            ],
        )
        .unwrap()
        .with_category("Transport"),
    );

    // Hotel in EUR at 1.1 EUR per USD, paid by Bob.
    ledger.add(
        Expense::new(
            "Hotel",
            dec!(330),
            CurrencyCode::new("EUR"),
            dec!(1.1),
            vec![PayerShare::new("bob", dec!(330))],
            vec![
                SplitShare::new("alice", dec!(110)),
                SplitShare::new("bob", dec!(110)),
                SplitShare::new("carol", dec!(110)),
            ],
        )
        .unwrap()
        .with_category("Lodging"),
    );

    // Dinner in JPY at 150 JPY per USD, paid by Carol.
    ledger.add(
        Expense::new(
            "Izakaya",
            dec!(15000),
            CurrencyCode::new("JPY"),
            dec!(150),
            vec![PayerShare::new("carol", dec!(15000))],
            vec![
                SplitShare::new("alice", dec!(5000)),
                SplitShare::new("bob", dec!(5000)),
                SplitShare::new("carol", dec!(5000)),
            ],
        )
        .unwrap()
        .with_category("Food"),
    );

    let sheet =
        BalanceAggregator::compute_net_balances(&ledger, &roster, &StoredRate).unwrap();

    println!("━━━ Net balances (USD) ━━━\n");
    for (id, balance) in sheet.iter() {
        println!("  {:<8} {:>10}", roster.display_name(id), balance.round_dp(2));
    }

    println!("\n━━━ Transfer plan ━━━\n");
    for t in DebtSimplifier::simplify(&sheet) {
        println!(
            "  {} pays {} {} USD",
            roster.display_name(&t.from),
            roster.display_name(&t.to),
            t.amount.round_dp(2)
        );
    }

    let summary = SpendingSummary::from_expenses(&ledger, &roster, &StoredRate).unwrap();
    println!("\n{}", summary);
}
