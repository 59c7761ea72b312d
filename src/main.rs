//! tripsettle CLI
//!
//! Run trip settlement from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Compute settlement transfers from a JSON trip file
//! tripsettle settle --input trip.json
//!
//! # Output as JSON
//! tripsettle settle --input trip.json --format json
//!
//! # Show net balances only
//! tripsettle balances --input trip.json
//!
//! # Generate a random trip for testing
//! tripsettle generate --participants 5 --expenses 40
//! ```

use rust_decimal::Decimal;
use std::fs;
use std::process;
use tripsettle::analytics::spending::SpendingSummary;
use tripsettle::prelude::*;
use tripsettle::simulation::generator::{generate_random_trip, TripConfig};

fn print_usage() {
    eprintln!(
        r#"tripsettle — group travel-expense settlement and debt simplification

USAGE:
    tripsettle <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute net balances and the transfer plan for a trip
    balances    Show net balances and spending summary only
    generate    Generate a random trip ledger (for testing)
    help        Show this message

OPTIONS (settle, balances):
    --input <FILE>      Path to JSON trip file
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (generate):
    --participants <N>  Number of participants (default: 5)
    --expenses <N>      Number of expenses (default: 30)
    --currencies <LIST> Comma-separated currency codes (default: USD)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    tripsettle settle --input trip.json
    tripsettle settle --input trip.json --format json
    tripsettle balances --input trip.json
    tripsettle generate --participants 8 --expenses 60 --currencies USD,EUR --output trip.json"#
    );
}

/// JSON schema for input trips.
#[derive(serde::Deserialize)]
struct TripFile {
    base_currency: String,
    #[serde(default)]
    rates: std::collections::HashMap<String, Decimal>,
    participants: Vec<ParticipantInput>,
    expenses: Vec<ExpenseInput>,
}

#[derive(serde::Deserialize)]
struct ParticipantInput {
    id: String,
    name: String,
}

#[derive(serde::Deserialize)]
struct ExpenseInput {
    name: String,
    amount: Decimal,
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    settlement: bool,
    payers: Vec<EntryInput>,
    splits: Vec<EntryInput>,
}

#[derive(serde::Deserialize)]
struct EntryInput {
    participant: String,
    amount: Decimal,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// JSON output schema for settlement results.
#[derive(serde::Serialize)]
struct SettleOutput {
    base_currency: String,
    settled: bool,
    balances: Vec<BalanceOutput>,
    transfers: Vec<TransferOutput>,
}

#[derive(serde::Serialize)]
struct BalanceOutput {
    participant: String,
    balance: String,
    status: String,
}

#[derive(serde::Serialize)]
struct TransferOutput {
    from: String,
    to: String,
    amount: String,
}

fn load_trip(path: &str) -> (Roster, RateTable, ExpenseSet) {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: TripFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "base_currency": "USD",
  "rates": {{ "EUR": "1.1" }},
  "participants": [ {{ "id": "alice", "name": "Alice" }} ],
  "expenses": [
    {{
      "name": "Dinner", "amount": "300", "currency": "USD",
      "payers": [ {{ "participant": "alice", "amount": "300" }} ],
      "splits": [ {{ "participant": "alice", "amount": "150" }},
                  {{ "participant": "bob", "amount": "150" }} ]
    }}
  ]
}}"#
        );
        process::exit(1);
    });

    let mut rates = RateTable::new(CurrencyCode::new(&file.base_currency));
    for (code, divisor) in &file.rates {
        rates
            .set_divisor(CurrencyCode::new(code), *divisor)
            .unwrap_or_else(|e| {
                eprintln!("Invalid rate: {}", e);
                process::exit(1);
            });
    }

    let roster: Roster = file
        .participants
        .iter()
        .map(|p| Participant::new(p.id.as_str(), p.name.as_str()))
        .collect();

    let mut expenses = ExpenseSet::new();
    for input in file.expenses {
        let currency = CurrencyCode::new(&input.currency);
        let divisor = rates.divisor_for(&currency).unwrap_or_else(|e| {
            eprintln!("Expense '{}': {}", input.name, e);
            process::exit(1);
        });

        let result = if input.settlement {
            let payer = input.payers.first().map(|p| p.participant.clone());
            let recipient = input.splits.first().map(|s| s.participant.clone());
            match (payer, recipient) {
                (Some(payer), Some(recipient)) => Expense::settlement(
                    input.name.clone(),
                    input.amount,
                    currency,
                    divisor,
                    ParticipantId::new(payer),
                    ParticipantId::new(recipient),
                ),
                _ => {
                    eprintln!(
                        "Settlement '{}' needs exactly one payer and one split",
                        input.name
                    );
                    process::exit(1);
                }
            }
        } else {
            Expense::new(
                input.name.clone(),
                input.amount,
                currency,
                divisor,
                input
                    .payers
                    .iter()
                    .map(|p| PayerShare::new(p.participant.as_str(), p.amount))
                    .collect(),
                input
                    .splits
                    .iter()
                    .map(|s| SplitShare::new(s.participant.as_str(), s.amount))
                    .collect(),
            )
        };

        let mut expense = result.unwrap_or_else(|e| {
            eprintln!("Invalid expense: {}", e);
            process::exit(1);
        });
        if let Some(category) = input.category {
            expense = expense.with_category(category);
        }
        expenses.add(expense);
    }

    (roster, rates, expenses)
}

fn parse_io_args(args: &[String]) -> (String, String) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });
    (path, format)
}

fn compute(path: &str) -> (Roster, RateTable, ExpenseSet, BalanceSheet, Vec<Transfer>) {
    let (roster, rates, expenses) = load_trip(path);
    let sheet = BalanceAggregator::compute_net_balances(&expenses, &roster, &StoredRate)
        .unwrap_or_else(|e| {
            eprintln!("Settlement failed: {}", e);
            process::exit(1);
        });
    let plan = DebtSimplifier::simplify(&sheet);
    (roster, rates, expenses, sheet, plan)
}

fn cmd_settle(args: &[String]) {
    let (path, format) = parse_io_args(args);
    let (roster, rates, _expenses, sheet, plan) = compute(&path);

    if format == "json" {
        let output = SettleOutput {
            base_currency: rates.base_currency().to_string(),
            settled: plan.is_empty(),
            balances: sheet
                .iter()
                .map(|(id, balance)| BalanceOutput {
                    participant: id.to_string(),
                    balance: balance.round_dp(2).to_string(),
                    status: if balance > SETTLED_EPSILON {
                        "CREDITOR".to_string()
                    } else if balance < -SETTLED_EPSILON {
                        "DEBTOR".to_string()
                    } else {
                        "SETTLED".to_string()
                    },
                })
                .collect(),
            transfers: plan
                .iter()
                .map(|t| TransferOutput {
                    from: t.from.to_string(),
                    to: t.to.to_string(),
                    amount: t.amount.round_dp(2).to_string(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        print_balances_text(&roster, &rates, &sheet);
        if plan.is_empty() {
            println!("\nEveryone is settled up.");
        } else {
            println!("\n=== Transfer Plan ===");
            for t in &plan {
                println!(
                    "  {} pays {} {} {}",
                    roster.display_name(&t.from),
                    roster.display_name(&t.to),
                    t.amount.round_dp(2),
                    rates.base_currency()
                );
            }
        }
    }
}

fn cmd_balances(args: &[String]) {
    let (path, format) = parse_io_args(args);
    let (roster, rates, expenses, sheet, _plan) = compute(&path);

    if format == "json" {
        let balances: Vec<BalanceOutput> = sheet
            .iter()
            .map(|(id, balance)| BalanceOutput {
                participant: id.to_string(),
                balance: balance.round_dp(2).to_string(),
                status: if balance > SETTLED_EPSILON {
                    "CREDITOR".to_string()
                } else if balance < -SETTLED_EPSILON {
                    "DEBTOR".to_string()
                } else {
                    "SETTLED".to_string()
                },
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&balances).unwrap());
    } else {
        print_balances_text(&roster, &rates, &sheet);

        let summary = SpendingSummary::from_expenses(&expenses, &roster, &StoredRate)
            .unwrap_or_else(|e| {
                eprintln!("Spending summary failed: {}", e);
                process::exit(1);
            });
        println!("\n{}", summary);
    }
}

fn print_balances_text(roster: &Roster, rates: &RateTable, sheet: &BalanceSheet) {
    println!("=== Net Balances ({}) ===", rates.base_currency());
    for (id, balance) in sheet.iter() {
        let status = if balance > SETTLED_EPSILON {
            "is owed"
        } else if balance < -SETTLED_EPSILON {
            "owes"
        } else {
            "settled"
        };
        println!(
            "  {:<20} {:>12}  ({})",
            roster.display_name(id),
            balance.round_dp(2).to_string(),
            status
        );
    }
}

fn cmd_generate(args: &[String]) {
    let mut participants = 5usize;
    let mut expense_count = 30usize;
    let mut currencies_str = "USD".to_string();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                participants = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--participants requires a number");
                    process::exit(1);
                });
            }
            "--expenses" => {
                i += 1;
                expense_count = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--expenses requires a number");
                    process::exit(1);
                });
            }
            "--currencies" => {
                i += 1;
                currencies_str = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--currencies requires a comma-separated list");
                    process::exit(1);
                });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let currencies: Vec<CurrencyCode> = currencies_str
        .split(',')
        .map(|s| CurrencyCode::new(s.trim()))
        .collect();

    let config = TripConfig {
        participant_count: participants,
        expense_count,
        currencies: currencies.clone(),
        ..Default::default()
    };

    let (roster, rates, expenses) = generate_random_trip(&config);

    #[derive(serde::Serialize)]
    struct OutputEntry {
        participant: String,
        amount: String,
    }

    #[derive(serde::Serialize)]
    struct OutputExpense {
        name: String,
        amount: String,
        currency: String,
        settlement: bool,
        payers: Vec<OutputEntry>,
        splits: Vec<OutputEntry>,
    }

    #[derive(serde::Serialize)]
    struct OutputParticipant {
        id: String,
        name: String,
    }

    #[derive(serde::Serialize)]
    struct OutputFile {
        base_currency: String,
        rates: std::collections::BTreeMap<String, String>,
        participants: Vec<OutputParticipant>,
        expenses: Vec<OutputExpense>,
    }

    let output = OutputFile {
        base_currency: rates.base_currency().to_string(),
        rates: currencies
            .iter()
            .filter_map(|c| {
                rates
                    .divisor_for(c)
                    .ok()
                    .map(|d| (c.to_string(), d.to_string()))
            })
            .collect(),
        participants: roster
            .iter()
            .map(|p| OutputParticipant {
                id: p.id().to_string(),
                name: p.name().to_string(),
            })
            .collect(),
        expenses: expenses
            .iter()
            .map(|e| OutputExpense {
                name: e.name().to_string(),
                amount: e.amount().to_string(),
                currency: e.currency().to_string(),
                settlement: e.is_settlement(),
                payers: e
                    .payers()
                    .iter()
                    .map(|p| OutputEntry {
                        participant: p.participant.to_string(),
                        amount: p.amount_paid.to_string(),
                    })
                    .collect(),
                splits: e
                    .splits()
                    .iter()
                    .map(|s| OutputEntry {
                        participant: s.participant.to_string(),
                        amount: s.share_amount.to_string(),
                    })
                    .collect(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} participants → {}",
            expenses.len(),
            participants,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "balances" => cmd_balances(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
