//! Basic settlement walk-through.
//!
//! Three friends share a dinner, the engine proposes transfers, one gets
//! recorded, and the balances close up.

use rust_decimal_macros::dec;
use tripsettle::prelude::*;

fn main() {
    println!("╔════════════════════════════════════════════╗");
    println!("║  tripsettle: Basic Settlement Walk-through ║");
    println!("╚════════════════════════════════════════════╝\n");

    let roster: Roster = [
        Participant::new("alice", "Alice"),
        Participant::new("bob", "Bob"),
        Participant::new("carol", "Carol"),
    ]
    .into_iter()
    .collect();

    // Alice fronts a 300 USD dinner, split equally.
    let mut ledger = ExpenseSet::new();
    ledger.add(
        Expense::new(
            "Dinner",
            dec!(300),
            CurrencyCode::new("USD"),
            dec!(1),
            vec![PayerShare::new("alice", dec!(300))],
            vec![
                SplitShare::new("alice", dec!(100)),
                SplitShare::new("bob", dec!(100)),
                SplitShare::new("carol", dec!(100)),
            ],
        )
        .unwrap(),
    );

    println!("━━━ Net balances after dinner ━━━\n");
    let sheet =
        BalanceAggregator::compute_net_balances(&ledger, &roster, &StoredRate).unwrap();
    for (id, balance) in sheet.iter() {
        println!("  {:<8} {:>8}", roster.display_name(id), balance);
    }

    println!("\n━━━ Suggested transfers ━━━\n");
    let plan = DebtSimplifier::simplify(&sheet);
    for t in &plan {
        println!(
            "  {} pays {} {}",
            roster.display_name(&t.from),
            roster.display_name(&t.to),
            t.amount
        );
    }

    // Bob pays his share back; the payment becomes a settlement expense.
    let payment =
        SettlementRecorder::record(&plan[0], plan[0].amount, CurrencyCode::new("USD"), dec!(1))
            .unwrap();
    println!("\n━━━ Recording: {} ━━━\n", payment.name());
    ledger.add(payment);

    let after = BalanceAggregator::compute_net_balances(&ledger, &roster, &StoredRate).unwrap();
    for (id, balance) in after.iter() {
        println!("  {:<8} {:>8}", roster.display_name(id), balance);
    }

    let remaining = DebtSimplifier::simplify(&after);
    println!("\nRemaining transfers: {}", remaining.len());
    for t in &remaining {
        println!(
            "  {} pays {} {}",
            roster.display_name(&t.from),
            roster.display_name(&t.to),
            t.amount
        );
    }
}
