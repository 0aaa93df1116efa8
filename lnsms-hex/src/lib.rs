//! # LNSMS Hex
//!
//! Application service layer, reconciler task, and HTTP adapter for the
//! lightning-to-SMS relay.
//!
//! ## Architecture
//!
//! - `service/` - Application service (invoice requests and claim redemption)
//! - `reconciler/` - Background task syncing the ledger with the provider
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service and reconciler are generic over the `Ledger`,
//! `LightningWallet`, and `Notifier` ports, allowing different adapter
//! implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod reconciler;
pub mod service;


pub use reconciler::{Reconciler, ReconcilerConfig};
pub use service::{RelayConfig, RelayService};
