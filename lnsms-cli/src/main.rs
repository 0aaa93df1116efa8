//! LNSMS CLI
//!
//! Operator tool for inspecting the relay ledger, including the report of
//! claims whose payout could not be confirmed.

use anyhow::Result;
use clap::{Parser, Subcommand};

use lnsms_ledger::build_ledger;
use lnsms_types::{Ledger, PaymentRecord, PayoutOutcome};

#[derive(Parser)]
#[command(name = "lnsms")]
#[command(author, version, about = "Operator tool for the relay ledger", long_about = None)]
struct Cli {
    /// Ledger database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://lnsms.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all ledger records
    Payments,
    /// Report claims held for manual review
    Report,
}

fn payout_label(record: &PaymentRecord) -> &'static str {
    match record.payout {
        Some(PayoutOutcome::Settled) => "settled",
        Some(PayoutOutcome::Indeterminate) => "indeterminate",
        None => "-",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let ledger = build_ledger(&cli.database_url).await?;

    match cli.command {
        Commands::Payments => {
            let records = ledger.all_payments().await?;

            println!(
                "{:<24} {:>12} {:>9} {:>9} {:>8} {:>14}",
                "ID", "AMOUNT", "STATUS", "NOTIFIED", "CLAIMED", "PAYOUT"
            );
            for record in &records {
                println!(
                    "{:<24} {:>12} {:>9} {:>9} {:>8} {:>14}",
                    record.id().to_string(),
                    record.payment.amount.to_string(),
                    record.payment.status.to_string(),
                    if record.sent_sms { "yes" } else { "no" },
                    if record.claimed { "yes" } else { "no" },
                    payout_label(record),
                );
            }
            println!("{} record(s)", records.len());
        }
        Commands::Report => {
            let records = ledger.all_payments().await?;
            let frozen: Vec<_> = records
                .iter()
                .filter(|r| r.claimed && r.payout == Some(PayoutOutcome::Indeterminate))
                .collect();

            if frozen.is_empty() {
                println!("No claims awaiting manual review.");
            } else {
                println!(
                    "{} claim(s) whose payout could not be confirmed. Check each \
                     against the provider's payment history before releasing:",
                    frozen.len()
                );
                for record in &frozen {
                    println!(
                        "  {}  amount {}  code {}",
                        record.id(),
                        record.payment.amount,
                        record
                            .claim_code
                            .as_ref()
                            .map(|c| c.as_str())
                            .unwrap_or("-"),
                    );
                }
            }
        }
    }

    Ok(())
}
