//! # LNSMS Types
//!
//! Domain types and port traits for the lightning-to-SMS payment relay.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (PaymentRecord, ClaimCode)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    ClaimCode, PayoutOutcome, PaymentDirection, PaymentId, PaymentRecord, PaymentStatus,
    ProviderPayment,
};
pub use dto::*;
pub use error::AppError;
pub use ports::{
    Invoice, Ledger, LedgerError, LightningWallet, Notifier, NotifyError, PayoutCurrency,
    PayoutReceipt, WalletError,
};
