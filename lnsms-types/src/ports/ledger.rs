//! Ledger port trait.
//!
//! This is the primary port in our hexagonal architecture: the durable
//! keyed store of payment records. Adapters (SQLite, in-memory fakes)
//! implement this trait.

use std::sync::Arc;

use crate::domain::{ClaimCode, PaymentId, PaymentRecord, PayoutOutcome, ProviderPayment};

/// Ledger access failures.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("record not found")]
    NotFound,
}

/// The durable store of payment records, keyed by provider payment id.
///
/// Mutating operations MUST be atomic per record: a reconciler rewrite and
/// a concurrent claim must never interleave inside one record's
/// read-modify-write cycle.
#[async_trait::async_trait]
pub trait Ledger: Send + Sync + 'static {
    /// All records currently in the ledger.
    async fn all_payments(&self) -> Result<Vec<PaymentRecord>, LedgerError>;

    /// Looks up one record by payment id.
    async fn find_payment(&self, id: &PaymentId) -> Result<Option<PaymentRecord>, LedgerError>;

    /// Inserts or fully replaces one record.
    async fn upsert_payment(&self, record: &PaymentRecord) -> Result<(), LedgerError>;

    /// Merges one provider payment into its record (creating it on first
    /// sight) and returns the result. The read-merge-write runs as one
    /// atomic cycle so a concurrent claim is never overwritten with stale
    /// flags.
    async fn merge_provider_payment(
        &self,
        payment: &ProviderPayment,
    ) -> Result<PaymentRecord, LedgerError>;

    /// Atomically marks a record as notified and assigns its claim code.
    /// Applies only while `sent_sms` is still unset, so the flag
    /// transitions at most once and an assigned code never changes.
    /// Returns whether the update applied.
    async fn mark_notified(&self, id: &PaymentId, code: &ClaimCode)
    -> Result<bool, LedgerError>;

    /// True if any record carries this claim code, claimed or not.
    async fn claim_code_in_use(&self, code: &ClaimCode) -> Result<bool, LedgerError>;

    /// Atomically marks the unclaimed record carrying `code` as claimed and
    /// returns it. Returns `None` when no unclaimed record matches - the
    /// single conditional update that makes concurrent claims race-free.
    async fn try_claim(&self, code: &ClaimCode) -> Result<Option<PaymentRecord>, LedgerError>;

    /// Reverts the claimed flag after a rejected payout, making the code
    /// redeemable again.
    async fn release_claim(&self, id: &PaymentId) -> Result<(), LedgerError>;

    /// Records the payout outcome of a redemption attempt.
    async fn record_payout(
        &self,
        id: &PaymentId,
        outcome: PayoutOutcome,
    ) -> Result<(), LedgerError>;
}

#[async_trait::async_trait]
impl<T: Ledger> Ledger for Arc<T> {
    async fn all_payments(&self) -> Result<Vec<PaymentRecord>, LedgerError> {
        (**self).all_payments().await
    }

    async fn find_payment(&self, id: &PaymentId) -> Result<Option<PaymentRecord>, LedgerError> {
        (**self).find_payment(id).await
    }

    async fn upsert_payment(&self, record: &PaymentRecord) -> Result<(), LedgerError> {
        (**self).upsert_payment(record).await
    }

    async fn merge_provider_payment(
        &self,
        payment: &ProviderPayment,
    ) -> Result<PaymentRecord, LedgerError> {
        (**self).merge_provider_payment(payment).await
    }

    async fn mark_notified(
        &self,
        id: &PaymentId,
        code: &ClaimCode,
    ) -> Result<bool, LedgerError> {
        (**self).mark_notified(id, code).await
    }

    async fn claim_code_in_use(&self, code: &ClaimCode) -> Result<bool, LedgerError> {
        (**self).claim_code_in_use(code).await
    }

    async fn try_claim(&self, code: &ClaimCode) -> Result<Option<PaymentRecord>, LedgerError> {
        (**self).try_claim(code).await
    }

    async fn release_claim(&self, id: &PaymentId) -> Result<(), LedgerError> {
        (**self).release_claim(id).await
    }

    async fn record_payout(
        &self,
        id: &PaymentId,
        outcome: PayoutOutcome,
    ) -> Result<(), LedgerError> {
        (**self).record_payout(id, outcome).await
    }
}
