//! SMS notifier port.

use std::sync::Arc;

/// Error type for notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("SMS API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("SMS request failed: {0}")]
    Transport(String),
}

/// Port trait for outbound text-message delivery. The delivery receipt is
/// ignored beyond success/failure.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn send_message(&self, destination: &str, body: &str) -> Result<(), NotifyError>;
}

#[async_trait::async_trait]
impl<T: Notifier> Notifier for Arc<T> {
    async fn send_message(&self, destination: &str, body: &str) -> Result<(), NotifyError> {
        (**self).send_message(destination, body).await
    }
}
