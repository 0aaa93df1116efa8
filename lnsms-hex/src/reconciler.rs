//! Background reconciler task.
//!
//! Polls the wallet provider for recent payments, keeps the ledger in sync,
//! and dispatches the claim-code SMS for newly paid credits.

use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use lnsms_types::{
    ClaimCode, Ledger, LedgerError, LightningWallet, Notifier, PaymentRecord, ProviderPayment,
    WalletError,
};

use crate::service::RelayConfig;

/// Reconciler tuning knobs.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Pause between poll cycles.
    pub poll_interval: Duration,
    /// How many recent payments to fetch per cycle.
    pub page_limit: u32,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            page_limit: 100,
        }
    }
}

/// A failed poll cycle. Provider failures skip the cycle; ledger failures
/// halt it mid-way so no partially merged record is written.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("provider listing failed: {0}")]
    Provider(#[from] WalletError),

    #[error("ledger failure: {0}")]
    Ledger(#[from] LedgerError),
}

/// The polling loop syncing ledger state with the wallet provider.
pub struct Reconciler<L: Ledger, W: LightningWallet, N: Notifier> {
    ledger: L,
    wallet: W,
    notifier: N,
    relay: RelayConfig,
    config: ReconcilerConfig,
}

impl<L: Ledger, W: LightningWallet, N: Notifier> Reconciler<L, W, N> {
    pub fn new(
        ledger: L,
        wallet: W,
        notifier: N,
        relay: RelayConfig,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            ledger,
            wallet,
            notifier,
            relay,
            config,
        }
    }

    /// Runs poll cycles until the shutdown signal fires. Errors are logged
    /// and the loop continues on the next tick.
    #[instrument(skip(self, shutdown))]
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.config.poll_interval.as_secs(),
            page_limit = self.config.page_limit,
            "starting payment reconciler"
        );
        loop {
            match self.poll_once().await {
                Ok(()) => {}
                Err(PollError::Provider(err)) => {
                    warn!(%err, "provider unavailable, skipping cycle");
                }
                Err(PollError::Ledger(err)) => {
                    error!(%err, "ledger failure, cycle halted");
                }
            }

            tokio::select! {
                _ = sleep(self.config.poll_interval) => {}
                _ = shutdown.changed() => {
                    info!("reconciler stopping");
                    break;
                }
            }
        }
    }

    /// One reconciliation cycle over the most recent payments.
    ///
    /// Re-processing the same page is a no-op for already-notified records,
    /// so no cursor is needed.
    pub async fn poll_once(&self) -> Result<(), PollError> {
        let payments = self.wallet.list_payments(self.config.page_limit).await?;
        debug!(count = payments.len(), "fetched recent payments");

        for payment in payments {
            self.reconcile_payment(payment).await?;
        }

        Ok(())
    }

    /// Merges one provider payment into the ledger and notifies the
    /// recipient if this is a newly paid, not-yet-notified credit.
    async fn reconcile_payment(&self, payment: ProviderPayment) -> Result<(), LedgerError> {
        let record = self.ledger.merge_provider_payment(&payment).await?;

        if record.needs_notification() {
            self.notify(&record).await?;
        }

        Ok(())
    }

    /// Sends the claim SMS for a record. The `sent_sms`/`claim_code` flags
    /// are set only after a successful send; on failure the next cycle
    /// retries.
    async fn notify(&self, record: &PaymentRecord) -> Result<(), LedgerError> {
        let payable = record.payable_amount(self.relay.fixed_fee);
        if payable <= Decimal::ZERO {
            warn!(payment = %record.id(), amount = %record.payment.amount,
                "credit does not cover the network fee, not notifying");
            return Ok(());
        }

        let Some(number) = record.destination_number() else {
            debug!(payment = %record.id(), "no destination number in description");
            return Ok(());
        };

        let code = self.fresh_claim_code().await?;
        let body = format!(
            "You received a payment of {} BTC. Claim it at {}/{}",
            payable, self.relay.claim_url, code
        );

        match self.notifier.send_message(number, &body).await {
            Ok(()) => {
                if self.ledger.mark_notified(record.id(), &code).await? {
                    info!(payment = %record.id(), to = %number, "notification sent");
                } else {
                    warn!(payment = %record.id(), "record was already notified");
                }
            }
            Err(err) => {
                warn!(payment = %record.id(), %err, "notification failed, will retry next cycle");
            }
        }

        Ok(())
    }

    /// Draws a claim code not yet present in the ledger. Collisions are
    /// negligible at this code length; the loop re-draws on the off chance.
    async fn fresh_claim_code(&self) -> Result<ClaimCode, LedgerError> {
        loop {
            let code = ClaimCode::generate();
            if !self.ledger.claim_code_in_use(&code).await? {
                return Ok(code);
            }
        }
    }
}
