//! Inventory ledger: the public operations over assets and nesting.
//!
//! ```text
//! request
//!   ↓
//! 1. Validate input with the pure domain rules (no IO)
//!   ↓
//! 2. One store call, bounded by the configured timeout
//!   ↓
//! 3. Map store outcome to `LedgerError`
//! ```
//!
//! The ledger holds no mutable state of its own; all serialization of
//! counter updates happens inside the store. Nothing is retried: a retried
//! checkout is a second unit.

mod error;

pub use error::{LedgerError, PrintError};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, instrument, warn};

use stocktag_core::{AssetId, Page, PageRequest};
use stocktag_inventory::{
    Asset, AssetDraft, AssetRelationship, Attributes, ChildLink, CounterChange, QuantityInput,
    SUGGESTION_LIMIT, SearchTerms, normalize_attributes,
};

use crate::labels::LabelPrinter;
use crate::reconcile::{AuditReport, reconcile};
use crate::store::{AssetStore, StoreError};

/// Most keyword hits returned by one search.
pub const SEARCH_LIMIT: u64 = stocktag_core::page::MAX_PAGE_SIZE as u64;

pub struct InventoryLedger<S> {
    store: S,
    timeout: Duration,
    printer: Option<Arc<dyn LabelPrinter>>,
}

impl<S> std::fmt::Debug for InventoryLedger<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryLedger")
            .field("timeout", &self.timeout)
            .field("printer", &self.printer.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: AssetStore> InventoryLedger<S> {
    pub fn new(store: S, timeout: Duration) -> Self {
        Self {
            store,
            timeout,
            printer: None,
        }
    }

    pub fn with_printer(mut self, printer: Arc<dyn LabelPrinter>) -> Self {
        self.printer = Some(printer);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn can_print(&self) -> bool {
        self.printer.is_some()
    }

    /// Run one store call under the timeout.
    pub(crate) async fn guard<T, E, F>(&self, operation: &'static str, fut: F) -> Result<T, LedgerError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<LedgerError>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "store call timed out"
                );
                Err(LedgerError::Unavailable(format!(
                    "{operation} timed out after {}ms",
                    self.timeout.as_millis()
                )))
            }
        }
    }

    async fn require(&self, operation: &'static str, id: AssetId) -> Result<Asset, LedgerError> {
        self.guard(operation, self.store.get_asset(id))
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("asset {id}")))
    }

    fn note_floored(operation: &'static str, id: AssetId, change: CounterChange) {
        if change.floored() {
            warn!(
                operation,
                asset_id = %id,
                "in_use was already 0; counter floored (run the audit to find the drift)"
            );
        }
    }

    #[instrument(skip(self, draft), fields(name = %draft.name), err)]
    pub async fn create_asset(&self, draft: AssetDraft) -> Result<Asset, LedgerError> {
        let asset = Asset::create(AssetId::new(), draft.resolve()?, Utc::now())?;
        self.guard("create_asset", self.store.insert_asset(&asset)).await?;
        info!(asset_id = %asset.id, quantity = asset.quantity, "asset created");
        Ok(asset)
    }

    /// Replace the attribute map wholesale.
    #[instrument(skip(self, attributes), fields(asset_id = %id), err)]
    pub async fn update_attributes(
        &self,
        id: AssetId,
        attributes: Attributes,
    ) -> Result<Asset, LedgerError> {
        let attributes = normalize_attributes(attributes)?;
        self.guard(
            "update_attributes",
            self.store.replace_attributes(id, &attributes, Utc::now()),
        )
        .await
    }

    #[instrument(skip(self, quantity), fields(asset_id = %id), err)]
    pub async fn update_quantity(
        &self,
        id: AssetId,
        quantity: QuantityInput,
    ) -> Result<Asset, LedgerError> {
        let quantity = quantity.resolve()?;
        let resize = async {
            self.store
                .set_quantity(id, quantity, Utc::now())
                .await
                .map_err(|e| match e {
                    // The `in_use <= quantity` guard rejected the new total.
                    StoreError::Constraint(msg) => LedgerError::Validation(msg),
                    other => other.into(),
                })
        };
        self.guard("update_quantity", resize).await
    }

    /// Nest `child` under `parent`, committing one unit of the child.
    #[instrument(skip(self), fields(parent = %parent, child = %child), err)]
    pub async fn attach_child(
        &self,
        parent: AssetId,
        child: AssetId,
    ) -> Result<AssetRelationship, LedgerError> {
        let relationship = AssetRelationship::new(parent, child, Utc::now())?;
        let change = self
            .guard("attach_child", self.store.attach(&relationship))
            .await?;
        info!(in_use = change.after, "child attached");
        Ok(relationship)
    }

    /// Remove the edge and release the child's unit.
    #[instrument(skip(self), fields(parent = %parent, child = %child), err)]
    pub async fn detach_child(
        &self,
        parent: AssetId,
        child: AssetId,
    ) -> Result<CounterChange, LedgerError> {
        let change = self
            .guard("detach_child", self.store.detach(parent, child, Utc::now()))
            .await?;
        Self::note_floored("detach_child", child, change);
        info!(in_use = change.after, "child detached");
        Ok(change)
    }

    #[instrument(skip(self), fields(asset_id = %id), err)]
    pub async fn check_out(&self, id: AssetId) -> Result<CounterChange, LedgerError> {
        let change = self
            .guard("check_out", self.store.increment_in_use(id, Utc::now()))
            .await?;
        info!(in_use = change.after, "asset checked out");
        Ok(change)
    }

    #[instrument(skip(self), fields(asset_id = %id), err)]
    pub async fn check_in(&self, id: AssetId) -> Result<CounterChange, LedgerError> {
        let change = self
            .guard("check_in", self.store.decrement_in_use(id, Utc::now()))
            .await?;
        Self::note_floored("check_in", id, change);
        info!(in_use = change.after, "asset checked in");
        Ok(change)
    }

    #[instrument(skip(self), fields(parent = %parent), err)]
    pub async fn list_children(&self, parent: AssetId) -> Result<Vec<ChildLink>, LedgerError> {
        self.guard("list_children", self.store.list_children(parent))
            .await
    }

    /// Up to [`SUGGESTION_LIMIT`] assets that could be nested under `parent`.
    ///
    /// A blank `query` returns the most recently updated candidates.
    #[instrument(skip(self), fields(parent = %parent), err)]
    pub async fn suggest_attachable(
        &self,
        parent: AssetId,
        query: &str,
    ) -> Result<Vec<Asset>, LedgerError> {
        self.require("suggest_attachable", parent).await?;
        let terms = SearchTerms::parse(query);
        self.guard(
            "suggest_attachable",
            self.store
                .suggest_attachable(parent, terms.as_ref(), SUGGESTION_LIMIT as u64),
        )
        .await
    }

    #[instrument(skip(self), fields(asset_id = %id), err)]
    pub async fn find_by_id(&self, id: AssetId) -> Result<Asset, LedgerError> {
        self.require("find_by_id", id).await
    }

    #[instrument(skip(self), err)]
    pub async fn list_all(&self, page: u32, page_size: u32) -> Result<Page<Asset>, LedgerError> {
        let request = PageRequest::new(page, page_size)?;
        let (items, total) = self
            .guard(
                "list_all",
                self.store.list_page(request.offset(), request.limit()),
            )
            .await?;
        Ok(Page::new(items, request, total))
    }

    /// Blank keywords match nothing; the store is not consulted.
    ///
    /// Returns at most [`SEARCH_LIMIT`] hits, most recently updated first.
    #[instrument(skip(self), err)]
    pub async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<Asset>, LedgerError> {
        let Some(terms) = SearchTerms::parse(keyword) else {
            return Ok(Vec::new());
        };
        self.guard("search_by_keyword", self.store.search(&terms, SEARCH_LIMIT))
            .await
    }

    /// Send a QR label for an existing asset to the configured printer.
    #[instrument(skip(self), fields(asset_id = %id), err)]
    pub async fn print_label(&self, id: AssetId) -> Result<(), PrintError> {
        let printer = self.printer.as_ref().ok_or(PrintError::NotConfigured)?;
        self.require("print_label", id).await?;

        match tokio::time::timeout(self.timeout, printer.print(id)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(PrintError::Failed(format!(
                    "label job timed out after {}ms",
                    self.timeout.as_millis()
                )));
            }
        }
        info!("label sent to printer");
        Ok(())
    }

    /// Compare relationship counts with every asset's counter. Read-only.
    ///
    /// The two reads are separate store calls, so edits racing the audit can
    /// show up as transient findings.
    #[instrument(skip(self), err)]
    pub async fn audit(&self) -> Result<AuditReport, LedgerError> {
        let assets = self.guard("audit", self.store.all_assets()).await?;
        let counts = self.guard("audit", self.store.parent_counts()).await?;
        let report = reconcile(&assets, &counts);
        if !report.is_clean() {
            warn!(findings = report.findings.len(), "audit found counter drift");
        }
        Ok(report)
    }

    /// Release the store. Subsequent operations fail with `Unavailable`.
    pub async fn close(&self) {
        self.store.close().await;
    }
}
