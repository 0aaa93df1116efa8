//! Lightning wallet provider HTTP client.
//!
//! Mutating endpoints are signed per request (HMAC over path, nonce, token
//! and the exact body bytes); reads carry only the `api-token` header.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use lnsms_types::{Invoice, LightningWallet, PayoutCurrency, PayoutReceipt, ProviderPayment, WalletError};

use crate::sign::sign_request;

const CREATE_INVOICE_PATH: &str = "/api/v1/wallet/createInvoice";
const LIST_PAYMENTS_PATH: &str = "/api/v1/wallet/payments";
const PAY_PATH: &str = "/api/v1/wallet/payment";

/// How long to wait on the provider before giving up on a call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Wallet provider API client.
#[derive(Clone)]
pub struct WalletClient {
    base_url: String,
    token: String,
    secret: String,
    http: Client,
}

impl WalletClient {
    /// Creates a new client against the given API base URL.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, WalletError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WalletError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            secret: secret.into(),
            http,
        })
    }

    fn nonce() -> String {
        chrono::Utc::now().timestamp_micros().to_string()
    }

    /// POSTs a signed JSON body. The signature covers the exact bytes sent.
    async fn signed_post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        request: &B,
    ) -> Result<T, WalletError> {
        let body = serde_json::to_string(request)
            .map_err(|e| WalletError::Decode(e.to_string()))?;
        let nonce = Self::nonce();
        let signature = sign_request(path, &nonce, &self.token, &body, &self.secret);

        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("api-token", &self.token)
            .header("nonce", nonce)
            .header("signature", signature)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| WalletError::Transport(e.to_string()))?;

        Self::handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, WalletError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp
                .text()
                .await
                .map_err(|e| WalletError::Transport(e.to_string()))?;
            serde_json::from_str(&body).map_err(|e| WalletError::Decode(e.to_string()))
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or(body);
            Err(WalletError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[derive(serde::Serialize)]
struct CreateInvoiceRequest<'a> {
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    description: &'a str,
    expiry: u64,
}

#[derive(serde::Serialize)]
struct PayRequest<'a> {
    address: &'a str,
    currency: PayoutCurrency,
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
}

#[async_trait]
impl LightningWallet for WalletClient {
    async fn create_invoice(
        &self,
        amount: Decimal,
        description: &str,
        expiry_secs: u64,
    ) -> Result<Invoice, WalletError> {
        tracing::debug!(%amount, "creating invoice");
        self.signed_post(
            CREATE_INVOICE_PATH,
            &CreateInvoiceRequest {
                amount,
                description,
                expiry: expiry_secs,
            },
        )
        .await
    }

    async fn list_payments(&self, limit: u32) -> Result<Vec<ProviderPayment>, WalletError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, LIST_PAYMENTS_PATH))
            .header("api-token", &self.token)
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| WalletError::Transport(e.to_string()))?;

        Self::handle_response(resp).await
    }

    async fn pay_invoice(
        &self,
        destination: &str,
        currency: PayoutCurrency,
        amount: Decimal,
    ) -> Result<PayoutReceipt, WalletError> {
        tracing::debug!(%amount, %currency, "sending payment");
        self.signed_post(
            PAY_PATH,
            &PayRequest {
                address: destination,
                currency,
                amount,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = WalletClient::new("https://wallet.test", "tok", "sec").unwrap();
        assert_eq!(client.base_url, "https://wallet.test");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = WalletClient::new("https://wallet.test/", "tok", "sec").unwrap();
        assert_eq!(client.base_url, "https://wallet.test");
    }

    #[test]
    fn test_pay_request_wire_shape() {
        let json = serde_json::to_value(PayRequest {
            address: "lnbc1",
            currency: PayoutCurrency::Lightning,
            amount: "0.00109".parse().unwrap(),
        })
        .unwrap();

        assert_eq!(json["address"], "lnbc1");
        assert_eq!(json["currency"], "LIGHTNING");
        assert_eq!(json["amount"], "0.00109");
    }

    #[test]
    fn test_create_invoice_wire_shape() {
        let json = serde_json::to_value(CreateInvoiceRequest {
            amount: "0.0011".parse().unwrap(),
            description: "Relay payment to [+15551234567]",
            expiry: 3600,
        })
        .unwrap();

        assert_eq!(json["amount"], "0.0011");
        assert_eq!(json["expiry"], 3600);
    }
}
