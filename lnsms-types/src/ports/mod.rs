//! Port traits the adapters must implement.

pub mod ledger;
pub mod notifier;
pub mod wallet;

pub use ledger::{Ledger, LedgerError};
pub use notifier::{Notifier, NotifyError};
pub use wallet::{Invoice, LightningWallet, PayoutCurrency, PayoutReceipt, WalletError};
