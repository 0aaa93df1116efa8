//! Error types for the payment relay.

use crate::ports::{LedgerError, WalletError};

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes: `InvalidRequest` and `InvalidCode`
/// are the caller's fault (400), everything else is a 500.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    InvalidRequest(String),

    /// Unknown, already-claimed, and expired codes are indistinguishable
    /// to the caller.
    #[error("Invalid code")]
    InvalidCode,

    /// The provider explicitly rejected the payout; the claim was reverted
    /// and the code may be retried.
    #[error("Payment is failed.")]
    PayoutFailed,

    /// The payout call failed in transit; the claim stays held until an
    /// operator reconciles it.
    #[error("Payout outcome unknown; claim held for review")]
    PayoutIndeterminate,

    #[error("Wallet provider unavailable: {0}")]
    Provider(String),

    #[error("Ledger failure: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl From<WalletError> for AppError {
    fn from(err: WalletError) -> Self {
        AppError::Provider(err.to_string())
    }
}
