//! SQLite ledger adapter.

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;

use lnsms_types::{
    ClaimCode, Ledger, LedgerError, PaymentId, PaymentRecord, PayoutOutcome, ProviderPayment,
};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Ledger
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite ledger implementation.
///
/// Each record is stored as a JSON document (the same shape the service's
/// original flat-file ledger used) with the claim columns mirrored out so
/// the claim transition is one conditional UPDATE.
#[derive(Clone)]
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    /// Creates a new SQLite ledger with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        // Run migration from migration file
        let ddl = include_str!("../migrations/0001_create_payments.sql");
        sqlx::query(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_err(err: sqlx::Error) -> LedgerError {
    LedgerError::Database(err.to_string())
}

fn decode(json: &str) -> Result<PaymentRecord, LedgerError> {
    serde_json::from_str(json).map_err(|e| LedgerError::Serialization(e.to_string()))
}

fn encode(record: &PaymentRecord) -> Result<String, LedgerError> {
    serde_json::to_string(record).map_err(|e| LedgerError::Serialization(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Ledger implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl Ledger for SqliteLedger {
    async fn all_payments(&self) -> Result<Vec<PaymentRecord>, LedgerError> {
        let rows: Vec<(String,)> = sqlx::query_as(r#"SELECT record FROM payments ORDER BY rowid"#)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(|(json,)| decode(json)).collect()
    }

    async fn find_payment(&self, id: &PaymentId) -> Result<Option<PaymentRecord>, LedgerError> {
        let row: Option<(String,)> =
            sqlx::query_as(r#"SELECT record FROM payments WHERE id = ?"#)
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        row.map(|(json,)| decode(&json)).transpose()
    }

    async fn upsert_payment(&self, record: &PaymentRecord) -> Result<(), LedgerError> {
        let json = encode(record)?;

        sqlx::query(
            r#"INSERT INTO payments (id, record, claim_code, claimed, sent_sms)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   record = excluded.record,
                   claim_code = excluded.claim_code,
                   claimed = excluded.claimed,
                   sent_sms = excluded.sent_sms"#,
        )
        .bind(record.id().as_str())
        .bind(&json)
        .bind(record.claim_code.as_ref().map(|c| c.as_str().to_string()))
        .bind(record.claimed)
        .bind(record.sent_sms)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn merge_provider_payment(
        &self,
        payment: &ProviderPayment,
    ) -> Result<PaymentRecord, LedgerError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row: Option<(String,)> =
            sqlx::query_as(r#"SELECT record FROM payments WHERE id = ?"#)
                .bind(payment.id.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?;

        let mut record = match row {
            Some((json,)) => decode(&json)?,
            None => PaymentRecord::new(payment.clone()),
        };
        record.merge_provider(payment.clone());
        let json = encode(&record)?;

        sqlx::query(
            r#"INSERT INTO payments (id, record, claim_code, claimed, sent_sms)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   record = excluded.record,
                   claim_code = excluded.claim_code,
                   claimed = excluded.claimed,
                   sent_sms = excluded.sent_sms"#,
        )
        .bind(record.id().as_str())
        .bind(&json)
        .bind(record.claim_code.as_ref().map(|c| c.as_str().to_string()))
        .bind(record.claimed)
        .bind(record.sent_sms)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(record)
    }

    async fn mark_notified(
        &self,
        id: &PaymentId,
        code: &ClaimCode,
    ) -> Result<bool, LedgerError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Conditional column flip first: it takes the write lock and makes
        // the false -> true transition atomic.
        let result = sqlx::query(
            r#"UPDATE payments SET claim_code = ?, sent_sms = 1
               WHERE id = ? AND sent_sms = 0"#,
        )
        .bind(code.as_str())
        .bind(id.as_str())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        let (json,): (String,) =
            sqlx::query_as(r#"SELECT record FROM payments WHERE id = ?"#)
                .bind(id.as_str())
                .fetch_one(&mut *tx)
                .await
                .map_err(db_err)?;

        let mut record = decode(&json)?;
        record.sent_sms = true;
        record.claim_code = Some(code.clone());
        let updated = encode(&record)?;

        sqlx::query(r#"UPDATE payments SET record = ? WHERE id = ?"#)
            .bind(&updated)
            .bind(id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(true)
    }

    async fn claim_code_in_use(&self, code: &ClaimCode) -> Result<bool, LedgerError> {
        let row: Option<(i64,)> =
            sqlx::query_as(r#"SELECT 1 FROM payments WHERE claim_code = ?"#)
                .bind(code.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(row.is_some())
    }

    async fn try_claim(&self, code: &ClaimCode) -> Result<Option<PaymentRecord>, LedgerError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // The conditional UPDATE is the whole claim guarantee: of any number
        // of concurrent attempts on one code, exactly one matches a row.
        let result = sqlx::query(
            r#"UPDATE payments SET claimed = 1 WHERE claim_code = ? AND claimed = 0"#,
        )
        .bind(code.as_str())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let (json,): (String,) =
            sqlx::query_as(r#"SELECT record FROM payments WHERE claim_code = ?"#)
                .bind(code.as_str())
                .fetch_one(&mut *tx)
                .await
                .map_err(db_err)?;

        let mut record = decode(&json)?;
        record.claimed = true;
        let updated = encode(&record)?;

        sqlx::query(r#"UPDATE payments SET record = ? WHERE id = ?"#)
            .bind(&updated)
            .bind(record.id().as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(Some(record))
    }

    async fn release_claim(&self, id: &PaymentId) -> Result<(), LedgerError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row: Option<(String,)> =
            sqlx::query_as(r#"SELECT record FROM payments WHERE id = ?"#)
                .bind(id.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?;

        let Some((json,)) = row else {
            return Err(LedgerError::NotFound);
        };

        let mut record = decode(&json)?;
        record.claimed = false;
        let updated = encode(&record)?;

        sqlx::query(r#"UPDATE payments SET record = ?, claimed = 0 WHERE id = ?"#)
            .bind(&updated)
            .bind(id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)
    }

    async fn record_payout(
        &self,
        id: &PaymentId,
        outcome: PayoutOutcome,
    ) -> Result<(), LedgerError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row: Option<(String,)> =
            sqlx::query_as(r#"SELECT record FROM payments WHERE id = ?"#)
                .bind(id.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?;

        let Some((json,)) = row else {
            return Err(LedgerError::NotFound);
        };

        let mut record = decode(&json)?;
        record.payout = Some(outcome);
        let updated = encode(&record)?;

        sqlx::query(r#"UPDATE payments SET record = ? WHERE id = ?"#)
            .bind(&updated)
            .bind(id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)
    }
}
