use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use stocktag_infra::{
    AssetStore, CommandLabelPrinter, InMemoryAssetStore, InventoryLedger, LabelPrinter,
    PostgresAssetStore, StocktagConfig,
};

pub type Ledger = InventoryLedger<Arc<dyn AssetStore>>;

/// Everything a handler needs, shared behind one `Arc`.
#[derive(Debug)]
pub struct AppServices {
    pub ledger: Ledger,
}

impl AppServices {
    /// In-memory store, optional printer. Used by tests and local runs.
    pub fn in_memory(timeout: Duration, printer: Option<Arc<dyn LabelPrinter>>) -> Self {
        let store: Arc<dyn AssetStore> = Arc::new(InMemoryAssetStore::new());
        let mut ledger = InventoryLedger::new(store, timeout);
        if let Some(printer) = printer {
            ledger = ledger.with_printer(printer);
        }
        Self { ledger }
    }
}

/// Construct the store client explicitly; it is closed again at shutdown.
pub async fn build_services(config: &StocktagConfig) -> anyhow::Result<AppServices> {
    let printer = config.printer.as_ref().map(|name| {
        info!(printer = %name, "label printing enabled");
        Arc::new(CommandLabelPrinter::new(name.clone())) as Arc<dyn LabelPrinter>
    });

    let Some(url) = &config.database_url else {
        return Ok(AppServices::in_memory(config.store_timeout, printer));
    };

    let store = PostgresAssetStore::connect(url, config.db_max_connections, config.store_timeout)
        .await
        .context("failed to connect to Postgres")?;
    store.migrate().await.context("failed to apply schema")?;
    info!(max_connections = config.db_max_connections, "using Postgres asset store");

    let store: Arc<dyn AssetStore> = Arc::new(store);
    let mut ledger = InventoryLedger::new(store, config.store_timeout);
    if let Some(printer) = printer {
        ledger = ledger.with_printer(printer);
    }
    Ok(AppServices { ledger })
}
