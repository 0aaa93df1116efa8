//! # LNSMS Ledger
//!
//! Concrete ledger adapter for the relay: a SQLite-backed keyed store of
//! payment records implementing the `Ledger` port.

pub mod sqlite;


pub use sqlite::SqliteLedger;

/// Build and initialize a ledger from a database URL.
///
/// This function:
/// 1. Connects to the database
/// 2. Runs migrations to create tables
/// 3. Returns a ready-to-use `SqliteLedger`
///
/// # Examples
///
/// ```ignore
/// let ledger = build_ledger("sqlite://lnsms.db?mode=rwc").await?;
/// ```
pub async fn build_ledger(database_url: &str) -> anyhow::Result<SqliteLedger> {
    SqliteLedger::new(database_url).await
}
