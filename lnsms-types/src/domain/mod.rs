//! Domain models for the payment relay.

pub mod claim;
pub mod payment;

pub use claim::ClaimCode;
pub use payment::{
    PayoutOutcome, PaymentDirection, PaymentId, PaymentRecord, PaymentStatus, ProviderPayment,
};
