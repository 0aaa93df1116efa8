//! # LNSMS Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the ledger adapter and collaborator clients
//! - Spawn the payment reconciler
//! - Start the HTTP server

mod config;

use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lnsms_clients::{TwilioClient, WalletClient};
use lnsms_hex::{Reconciler, ReconcilerConfig, RelayConfig, RelayService, inbound::HttpServer};
use lnsms_ledger::build_ledger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lnsms_app=debug,lnsms_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting relay server on port {}", config.port);
    tracing::info!("Using ledger: {}", config.database_url);

    // Build the ledger (handles connection and migration)
    let ledger = build_ledger(&config.database_url).await?;

    // Collaborator clients
    let wallet = WalletClient::new(
        &config.wallet_base_url,
        &config.wallet_token,
        &config.wallet_secret,
    )
    .map_err(|e| anyhow::anyhow!("wallet client: {e}"))?;
    let notifier = TwilioClient::new(
        &config.twilio_account_sid,
        &config.twilio_auth_token,
        &config.twilio_messaging_service_sid,
    )
    .map_err(|e| anyhow::anyhow!("SMS client: {e}"))?;

    let relay_config = RelayConfig {
        fixed_fee: config.fixed_fee,
        claim_url: config.claim_url.clone(),
        invoice_expiry_secs: config.invoice_expiry_secs,
    };

    // The reconciler runs for the life of the process; the stop channel
    // interrupts its sleep once the server has shut down.
    let (stop_tx, stop_rx) = watch::channel(false);
    let reconciler = Reconciler::new(
        ledger.clone(),
        wallet.clone(),
        notifier,
        relay_config.clone(),
        ReconcilerConfig {
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            page_limit: config.poll_page_limit,
        },
    );
    let worker = tokio::spawn(reconciler.run(stop_rx));

    // Create and run the HTTP server
    let service = RelayService::new(ledger, wallet, relay_config);
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Server is down; let the reconciler finish its current cycle.
    let _ = stop_tx.send(true);
    worker.await?;

    Ok(())
}
