use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use stocktag_core::AssetId;
use stocktag_inventory::{Asset, AssetRelationship, Attributes, ChildLink, CounterChange, SearchTerms};

/// Datastore operation error.
///
/// These are **storage-level** outcomes. Rule failures detected inside a
/// store transaction (missing row, no spare unit, duplicate edge, cycle) are
/// reported here too because only the store can check them atomically.
///
/// ## Error Categories
///
/// - **NotFound / Capacity / Duplicate / Cycle / Held**: the transaction was rolled back
/// - **Constraint**: a schema `CHECK` rejected the write
/// - **Unavailable**: the store could not be reached (pool closed, IO, timeout)
/// - **OutcomeUnknown**: commit was sent but its result was lost
/// - **Backend**: anything else the driver reported
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("no spare units: {0}")]
    Capacity(String),

    #[error("duplicate: {0}")]
    Duplicate(String),

    #[error("nesting cycle: {0}")]
    Cycle(String),

    /// The units in use all belong to parent edges; only detach frees them.
    #[error("held by a parent: {0}")]
    Held(String),

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("commit outcome unknown: {0}")]
    OutcomeUnknown(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Per-asset relationship tally used by the reconciliation audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentCount {
    pub child: AssetId,
    pub parents: u64,
}

/// Relational datastore boundary for assets and their nesting edges.
///
/// Implementations must:
/// - evaluate `in_use` changes atomically on the storage side (no caller-side
///   read-modify-write)
/// - apply `attach` / `detach` as a single all-or-nothing unit: either the edge
///   and the counter both change, or neither does
/// - apply suggestion exclusions before the limit
///
/// Callers never retry mutating methods: a retried increment is a second unit.
#[async_trait::async_trait]
pub trait AssetStore: Send + Sync {
    async fn insert_asset(&self, asset: &Asset) -> Result<(), StoreError>;

    async fn get_asset(&self, id: AssetId) -> Result<Option<Asset>, StoreError>;

    /// Replace the attribute map wholesale and bump `updated_at`.
    async fn replace_attributes(
        &self,
        id: AssetId,
        attributes: &Attributes,
        now: DateTime<Utc>,
    ) -> Result<Asset, StoreError>;

    /// Set `quantity`, guarded by `quantity >= in_use`.
    async fn set_quantity(
        &self,
        id: AssetId,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> Result<Asset, StoreError>;

    /// `in_use + 1`, guarded by `in_use < quantity`.
    async fn increment_in_use(&self, id: AssetId, now: DateTime<Utc>) -> Result<CounterChange, StoreError>;

    /// Check-in: `in_use - 1`, floored at zero, guarded by
    /// `in_use > parent edge count` whenever the asset is nested.
    async fn decrement_in_use(&self, id: AssetId, now: DateTime<Utc>) -> Result<CounterChange, StoreError>;

    /// Insert the edge and increment the child's counter in one unit.
    async fn attach(
        &self,
        relationship: &AssetRelationship,
    ) -> Result<CounterChange, StoreError>;

    /// Delete the edge and decrement the child's counter in one unit.
    async fn detach(
        &self,
        parent: AssetId,
        child: AssetId,
        now: DateTime<Utc>,
    ) -> Result<CounterChange, StoreError>;

    /// Edges under `parent`, most recently updated first.
    async fn list_children(&self, parent: AssetId) -> Result<Vec<ChildLink>, StoreError>;

    /// Stable page ordered by `(created_at, id)`, plus the total row count.
    async fn list_page(&self, offset: u64, limit: u64) -> Result<(Vec<Asset>, u64), StoreError>;

    /// Assets whose name or type matches every term, most recently updated first.
    async fn search(&self, terms: &SearchTerms, limit: u64) -> Result<Vec<Asset>, StoreError>;

    /// Attach candidates for `parent`: name matches (or most recent when
    /// `terms` is `None`), excluding `parent`, its children and its ancestors.
    async fn suggest_attachable(
        &self,
        parent: AssetId,
        terms: Option<&SearchTerms>,
        limit: u64,
    ) -> Result<Vec<Asset>, StoreError>;

    /// Number of parents each child is attached to.
    async fn parent_counts(&self) -> Result<Vec<ParentCount>, StoreError>;

    /// Every asset, in `(created_at, id)` order.
    async fn all_assets(&self) -> Result<Vec<Asset>, StoreError>;

    /// Release backend resources. Further calls fail with `Unavailable`.
    async fn close(&self);
}

#[async_trait::async_trait]
impl<S> AssetStore for Arc<S>
where
    S: AssetStore + ?Sized,
{
    async fn insert_asset(&self, asset: &Asset) -> Result<(), StoreError> {
        (**self).insert_asset(asset).await
    }

    async fn get_asset(&self, id: AssetId) -> Result<Option<Asset>, StoreError> {
        (**self).get_asset(id).await
    }

    async fn replace_attributes(
        &self,
        id: AssetId,
        attributes: &Attributes,
        now: DateTime<Utc>,
    ) -> Result<Asset, StoreError> {
        (**self).replace_attributes(id, attributes, now).await
    }

    async fn set_quantity(
        &self,
        id: AssetId,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> Result<Asset, StoreError> {
        (**self).set_quantity(id, quantity, now).await
    }

    async fn increment_in_use(&self, id: AssetId, now: DateTime<Utc>) -> Result<CounterChange, StoreError> {
        (**self).increment_in_use(id, now).await
    }

    async fn decrement_in_use(&self, id: AssetId, now: DateTime<Utc>) -> Result<CounterChange, StoreError> {
        (**self).decrement_in_use(id, now).await
    }

    async fn attach(&self, relationship: &AssetRelationship) -> Result<CounterChange, StoreError> {
        (**self).attach(relationship).await
    }

    async fn detach(
        &self,
        parent: AssetId,
        child: AssetId,
        now: DateTime<Utc>,
    ) -> Result<CounterChange, StoreError> {
        (**self).detach(parent, child, now).await
    }

    async fn list_children(&self, parent: AssetId) -> Result<Vec<ChildLink>, StoreError> {
        (**self).list_children(parent).await
    }

    async fn list_page(&self, offset: u64, limit: u64) -> Result<(Vec<Asset>, u64), StoreError> {
        (**self).list_page(offset, limit).await
    }

    async fn search(&self, terms: &SearchTerms, limit: u64) -> Result<Vec<Asset>, StoreError> {
        (**self).search(terms, limit).await
    }

    async fn suggest_attachable(
        &self,
        parent: AssetId,
        terms: Option<&SearchTerms>,
        limit: u64,
    ) -> Result<Vec<Asset>, StoreError> {
        (**self).suggest_attachable(parent, terms, limit).await
    }

    async fn parent_counts(&self) -> Result<Vec<ParentCount>, StoreError> {
        (**self).parent_counts().await
    }

    async fn all_assets(&self) -> Result<Vec<Asset>, StoreError> {
        (**self).all_assets().await
    }

    async fn close(&self) {
        (**self).close().await
    }
}
