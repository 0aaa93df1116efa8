//! Data Transfer Objects (DTOs) for requests and responses.
//!
//! Field presence is validated by the service (missing fields are a plain
//! 400), so everything here deserializes leniently with defaults.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /requestinvoicetonumber`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestInvoiceRequest {
    /// Destination phone number to notify once the invoice is paid.
    #[serde(default)]
    #[schema(example = "+15551234567")]
    pub number: String,
    /// Invoice amount in BTC, as a decimal string.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    #[schema(value_type = Option<String>, example = "0.0011")]
    pub amount: Option<Decimal>,
}

/// Request body for `POST /claim`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClaimRequest {
    /// One-time claim code from the notification SMS.
    #[serde(default)]
    #[schema(example = "u3x9vTq2RkWm5cDa7pLh0Ybn")]
    pub code: String,
    /// Bolt11 invoice to pay the claimed value out to.
    #[serde(default)]
    #[schema(example = "lnbc1090n1p...")]
    pub invoice: String,
}
