//! # LNSMS Clients
//!
//! Outbound collaborator adapters: the lightning wallet provider HTTP
//! client (signed requests) and the SMS gateway client. Both implement
//! their port traits from `lnsms-types`.

mod sign;
pub mod sms;
pub mod wallet;

pub use sms::TwilioClient;
pub use wallet::WalletClient;
