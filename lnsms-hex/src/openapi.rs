//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use lnsms_types::dto::{ClaimRequest, RequestInvoiceRequest};
use lnsms_types::ports::Invoice;
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Create an invoice that relays to a phone number once paid
#[utoipa::path(
    post,
    path = "/requestinvoicetonumber",
    tag = "relay",
    request_body = RequestInvoiceRequest,
    responses(
        (status = 200, description = "Invoice created", body = Invoice),
        (status = 400, description = "Missing number/amount, or amount does not cover the network fee"),
        (status = 429, description = "Rate limit exceeded")
    )
)]
async fn request_invoice() {}

/// Redeem a claim code into a lightning payout
#[utoipa::path(
    post,
    path = "/claim",
    tag = "relay",
    request_body = ClaimRequest,
    responses(
        (status = 200, description = "Payout accepted", body = String, example = json!("ok")),
        (status = 400, description = "Missing input or invalid claim code"),
        (status = 500, description = "Payout failed or could not be confirmed"),
        (status = 429, description = "Rate limit exceeded")
    )
)]
async fn claim() {}

/// OpenAPI documentation for the relay API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LNSMS Relay API",
        version = "1.0.0",
        description = "Relays incoming lightning payments into SMS notifications and redeems claim codes into payouts.",
    ),
    paths(health, request_invoice, claim),
    components(schemas(RequestInvoiceRequest, ClaimRequest, Invoice)),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "relay", description = "Invoice creation and claim redemption"),
    )
)]
pub struct ApiDoc;
