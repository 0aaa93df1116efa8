//! Relay Application Service
//!
//! Orchestrates claim redemption and invoice requests through the ledger
//! and wallet ports. Contains NO infrastructure logic - pure business
//! orchestration.

use rust_decimal::Decimal;

use lnsms_types::{
    AppError, ClaimCode, ClaimRequest, Invoice, Ledger, LightningWallet, PayoutCurrency,
    PayoutOutcome, RequestInvoiceRequest,
};

/// Business constants shared by the invoice and claim paths.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Fixed network fee in BTC, subtracted before any display or payout.
    pub fixed_fee: Decimal,
    /// Base URL of the claim page; the claim code is appended as the last
    /// path segment.
    pub claim_url: String,
    /// Lifetime of created invoices.
    pub invoice_expiry_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            fixed_fee: Decimal::new(1, 5), // 0.00001 BTC (1000 sats)
            claim_url: "https://lnsms.ga/#/claim".to_string(),
            invoice_expiry_secs: 3600,
        }
    }
}

/// Application service for the relay's caller-facing operations.
///
/// Generic over the ledger and wallet ports - the adapters are injected at
/// compile time. This enables:
/// - Swapping adapters without code changes
/// - Testing with in-memory fakes
/// - Compile-time checks for port implementation
pub struct RelayService<L: Ledger, W: LightningWallet> {
    ledger: L,
    wallet: W,
    config: RelayConfig,
}

impl<L: Ledger, W: LightningWallet> RelayService<L, W> {
    /// Creates a new relay service over the given adapters.
    pub fn new(ledger: L, wallet: W, config: RelayConfig) -> Self {
        Self {
            ledger,
            wallet,
            config,
        }
    }

    /// Creates a provider invoice tagged with the destination number, so
    /// the reconciler can route the notification once it is paid.
    pub async fn request_invoice(&self, req: RequestInvoiceRequest) -> Result<Invoice, AppError> {
        let number = req.number.trim();
        let Some(amount) = req.amount else {
            return Err(AppError::InvalidRequest("Missing number or amount".into()));
        };
        if number.is_empty() {
            return Err(AppError::InvalidRequest("Missing number or amount".into()));
        }
        if amount - self.config.fixed_fee <= Decimal::ZERO {
            return Err(AppError::InvalidRequest(
                "Amount (with the network fee debited) must be greater than 0".into(),
            ));
        }

        let description = format!("Relay payment to [{}]", number);
        let invoice = self
            .wallet
            .create_invoice(amount, &description, self.config.invoice_expiry_secs)
            .await?;

        Ok(invoice)
    }

    /// Redeems a claim code into a lightning payout to the caller's invoice.
    ///
    /// Claim-then-pay: the record is marked claimed atomically BEFORE the
    /// payout attempt, so no concurrent caller can redeem the same code.
    pub async fn claim(&self, req: ClaimRequest) -> Result<(), AppError> {
        if req.code.trim().is_empty() || req.invoice.trim().is_empty() {
            return Err(AppError::InvalidRequest("Missing code or invoice".into()));
        }

        let code = ClaimCode::from(req.code);
        let record = self
            .ledger
            .try_claim(&code)
            .await?
            .ok_or(AppError::InvalidCode)?;

        let amount = record.payable_amount(self.config.fixed_fee);

        match self
            .wallet
            .pay_invoice(&req.invoice, PayoutCurrency::Lightning, amount)
            .await
        {
            Ok(receipt) if receipt.is_rejected() => {
                // Explicit rejection: the code becomes redeemable again.
                self.ledger.release_claim(record.id()).await?;
                Err(AppError::PayoutFailed)
            }
            Ok(receipt) => {
                tracing::info!(payment = %record.id(), status = %receipt.status, "payout accepted");
                if let Err(err) = self
                    .ledger
                    .record_payout(record.id(), PayoutOutcome::Settled)
                    .await
                {
                    tracing::warn!(payment = %record.id(), %err, "failed to record payout outcome");
                }
                Ok(())
            }
            Err(err) => {
                // The payment may still have settled on the provider side;
                // the claim stays held and an operator reconciles it.
                tracing::error!(payment = %record.id(), %err, "payout attempt did not complete");
                if let Err(err) = self
                    .ledger
                    .record_payout(record.id(), PayoutOutcome::Indeterminate)
                    .await
                {
                    tracing::warn!(payment = %record.id(), %err, "failed to record payout outcome");
                }
                Err(AppError::PayoutIndeterminate)
            }
        }
    }
}
