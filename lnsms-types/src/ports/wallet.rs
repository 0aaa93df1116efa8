//! Lightning wallet provider port.
//!
//! This trait defines the interface to the payment provider's wallet API.
//! Implementations can be HTTP clients, mock providers, etc.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{PaymentStatus, ProviderPayment};

/// Error type for wallet provider operations.
///
/// `Api` and `Transport`/`Decode` are deliberately distinct: an API error
/// still proves the provider answered, while a transport or decode failure
/// leaves the fate of an in-flight payment unknown.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("wallet API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("wallet request failed: {0}")]
    Transport(String),

    #[error("malformed wallet response: {0}")]
    Decode(String),
}

/// A freshly created invoice, returned verbatim to the requester.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Provider-assigned payment identifier.
    pub id: String,
    /// Bolt11 payment request to present to the payer.
    pub invoice: String,
    /// Invoice amount in BTC.
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String, example = "0.0011")]
    pub btc_amount: Decimal,
}

/// Settlement rail for an outbound payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutCurrency {
    Lightning,
    Btc,
}

impl std::fmt::Display for PayoutCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayoutCurrency::Lightning => write!(f, "LIGHTNING"),
            PayoutCurrency::Btc => write!(f, "BTC"),
        }
    }
}

/// Provider response to a payout request. Only `status` is consumed; the
/// rest is kept for logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutReceipt {
    pub status: PaymentStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PayoutReceipt {
    /// True when the provider explicitly rejected the payment. Anything
    /// else (paid, pending, unknown) counts as the payout having been
    /// honored.
    pub fn is_rejected(&self) -> bool {
        self.status == PaymentStatus::Failed
    }
}

/// Port trait for the payment provider's wallet API.
#[async_trait::async_trait]
pub trait LightningWallet: Send + Sync + 'static {
    /// Creates an invoice for `amount` BTC with the given description,
    /// expiring after `expiry_secs`.
    async fn create_invoice(
        &self,
        amount: Decimal,
        description: &str,
        expiry_secs: u64,
    ) -> Result<Invoice, WalletError>;

    /// Fetches the most recent `limit` payments, newest first. The same
    /// payment may reappear across calls.
    async fn list_payments(&self, limit: u32) -> Result<Vec<ProviderPayment>, WalletError>;

    /// Pays `amount` BTC to `destination` over the given rail.
    async fn pay_invoice(
        &self,
        destination: &str,
        currency: PayoutCurrency,
        amount: Decimal,
    ) -> Result<PayoutReceipt, WalletError>;
}

#[async_trait::async_trait]
impl<T: LightningWallet> LightningWallet for Arc<T> {
    async fn create_invoice(
        &self,
        amount: Decimal,
        description: &str,
        expiry_secs: u64,
    ) -> Result<Invoice, WalletError> {
        (**self).create_invoice(amount, description, expiry_secs).await
    }

    async fn list_payments(&self, limit: u32) -> Result<Vec<ProviderPayment>, WalletError> {
        (**self).list_payments(limit).await
    }

    async fn pay_invoice(
        &self,
        destination: &str,
        currency: PayoutCurrency,
        amount: Decimal,
    ) -> Result<PayoutReceipt, WalletError> {
        (**self).pay_invoice(destination, currency, amount).await
    }
}
