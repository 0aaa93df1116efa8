//! Configuration loading from environment.

use std::env;

use rust_decimal::Decimal;

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub wallet_base_url: String,
    pub wallet_token: String,
    pub wallet_secret: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_messaging_service_sid: String,
    pub fixed_fee: Decimal,
    pub claim_url: String,
    pub invoice_expiry_secs: u64,
    pub poll_interval_secs: u64,
    pub poll_page_limit: u32,
}

fn required(name: &str) -> anyhow::Result<String> {
    env::var(name).map_err(|_| anyhow::anyhow!("{name} environment variable is required"))
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5555".to_string())
            .parse()?;

        let database_url = required("DATABASE_URL")?;

        let wallet_base_url = required("WALLET_API_BASE_URL")?;
        let wallet_token = required("WALLET_API_TOKEN")?;
        let wallet_secret = required("WALLET_API_SECRET")?;

        let twilio_account_sid = required("TWILIO_ACCOUNT_SID")?;
        let twilio_auth_token = required("TWILIO_AUTH_TOKEN")?;
        let twilio_messaging_service_sid = required("TWILIO_MESSAGING_SERVICE_SID")?;

        let fixed_fee = env::var("FIXED_FEE_BTC")
            .unwrap_or_else(|_| "0.00001".to_string())
            .parse()?;

        let claim_url = env::var("CLAIM_URL")
            .unwrap_or_else(|_| "https://lnsms.ga/#/claim".to_string());

        let invoice_expiry_secs = env::var("INVOICE_EXPIRY_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()?;

        let poll_interval_secs = env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "2".to_string())
            .parse()?;

        let poll_page_limit = env::var("POLL_PAGE_LIMIT")
            .unwrap_or_else(|_| "100".to_string())
            .parse()?;

        Ok(Self {
            port,
            database_url,
            wallet_base_url,
            wallet_token,
            wallet_secret,
            twilio_account_sid,
            twilio_auth_token,
            twilio_messaging_service_sid,
            fixed_fee,
            claim_url,
            invoice_expiry_secs,
            poll_interval_secs,
            poll_page_limit,
        })
    }
}
