//! Infrastructure layer: datastore adapters, the inventory ledger, config,
//! and the label printer.

pub mod config;
pub mod labels;
pub mod ledger;
pub mod reconcile;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use config::{ConfigError, StocktagConfig};
pub use labels::{CommandLabelPrinter, InMemoryLabelPrinter, LabelError, LabelPrinter};
pub use ledger::{InventoryLedger, LedgerError, PrintError};
pub use reconcile::{AuditFinding, AuditReport};
pub use store::{AssetStore, InMemoryAssetStore, PostgresAssetStore, StoreError};
