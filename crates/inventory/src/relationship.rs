//! Parent/child nesting between assets.
//!
//! Edges are directed and form a forest-like DAG: self-nesting and cycles are
//! rejected at attach time. Multi-level nesting is allowed.

use std::collections::{BTreeSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocktag_core::{AssetId, DomainError, DomainResult};

use crate::asset::Asset;

/// Edge: `child` is nested inside / assigned to `parent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRelationship {
    pub parent: AssetId,
    pub child: AssetId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AssetRelationship {
    pub fn new(parent: AssetId, child: AssetId, now: DateTime<Utc>) -> DomainResult<Self> {
        ensure_distinct(parent, child)?;
        Ok(Self {
            parent,
            child,
            created_at: now,
            updated_at: now,
        })
    }
}

/// A relationship row with both endpoints resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildLink {
    pub parent: Asset,
    pub child: Asset,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reject self-nesting.
pub fn ensure_distinct(parent: AssetId, child: AssetId) -> DomainResult<()> {
    if parent == child {
        return Err(DomainError::validation("an asset cannot be nested inside itself"));
    }
    Ok(())
}

/// Reject an edge `parent -> child` when `parent` is already reachable from
/// `child` (the new edge would close a cycle).
pub fn ensure_acyclic<F, I>(parent: AssetId, child: AssetId, children_of: F) -> DomainResult<()>
where
    F: FnMut(AssetId) -> I,
    I: IntoIterator<Item = AssetId>,
{
    ensure_distinct(parent, child)?;
    if reachable(child, children_of).contains(&parent) {
        return Err(DomainError::conflict(format!(
            "attaching {child} under {parent} would create a nesting cycle"
        )));
    }
    Ok(())
}

/// Every asset `id` is (transitively) nested inside.
pub fn ancestors_of<F, I>(id: AssetId, parents_of: F) -> BTreeSet<AssetId>
where
    F: FnMut(AssetId) -> I,
    I: IntoIterator<Item = AssetId>,
{
    reachable(id, parents_of)
}

/// Breadth-first closure over `next`, excluding `start` unless a cycle leads back to it.
fn reachable<F, I>(start: AssetId, mut next: F) -> BTreeSet<AssetId>
where
    F: FnMut(AssetId) -> I,
    I: IntoIterator<Item = AssetId>,
{
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::from([start]);
    while let Some(id) = queue.pop_front() {
        for n in next(id) {
            if seen.insert(n) {
                queue.push_back(n);
            }
        }
    }
    seen
}
