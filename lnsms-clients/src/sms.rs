//! SMS gateway client (Twilio-compatible Messages API).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use lnsms_types::{Notifier, NotifyError};

const DEFAULT_BASE_URL: &str = "https://api.twilio.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Twilio Messages API client. Delivery receipts are not inspected beyond
/// the HTTP status.
#[derive(Clone)]
pub struct TwilioClient {
    base_url: String,
    account_sid: String,
    auth_token: String,
    messaging_service_sid: String,
    http: Client,
}

impl TwilioClient {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        messaging_service_sid: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            messaging_service_sid: messaging_service_sid.into(),
            http,
        })
    }

    /// Points the client at a different API host (used against emulators).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }
}

#[async_trait]
impl Notifier for TwilioClient {
    async fn send_message(&self, destination: &str, body: &str) -> Result<(), NotifyError> {
        let params = [
            ("To", destination),
            ("Body", body),
            ("MessagingServiceSid", self.messaging_service_sid.as_str()),
        ];

        let resp = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(to = destination, "SMS accepted for delivery");
            Ok(())
        } else {
            let message = resp.text().await.unwrap_or_default();
            Err(NotifyError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
