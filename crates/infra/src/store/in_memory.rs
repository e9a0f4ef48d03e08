use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use stocktag_core::{AssetId, DomainError};
use stocktag_inventory::{
    Asset, AssetRelationship, Attributes, ChildLink, CounterChange, SearchTerms, ancestors_of,
    ensure_acyclic,
};

use super::r#trait::{AssetStore, ParentCount, StoreError};

#[derive(Debug, Default)]
struct State {
    assets: HashMap<AssetId, Asset>,
    /// Keyed by `(parent, child)`.
    edges: BTreeMap<(AssetId, AssetId), AssetRelationship>,
    closed: bool,
}

impl State {
    fn children_of(&self, parent: AssetId) -> Vec<AssetId> {
        self.edges
            .range((parent, AssetId::nil())..)
            .take_while(|((p, _), _)| *p == parent)
            .map(|((_, c), _)| *c)
            .collect()
    }

    fn parents_of(&self, child: AssetId) -> Vec<AssetId> {
        self.edges
            .keys()
            .filter(|(_, c)| *c == child)
            .map(|(p, _)| *p)
            .collect()
    }

    fn asset(&self, id: AssetId) -> Result<&Asset, StoreError> {
        self.assets
            .get(&id)
            .ok_or_else(|| StoreError::NotFound(format!("asset {id}")))
    }

    fn asset_mut(&mut self, id: AssetId) -> Result<&mut Asset, StoreError> {
        self.assets
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("asset {id}")))
    }

    fn sorted_by_recency(&self, mut assets: Vec<Asset>, limit: u64) -> Vec<Asset> {
        assets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        assets.truncate(limit as usize);
        assets
    }
}

fn domain_to_store(err: DomainError) -> StoreError {
    match err {
        DomainError::NotFound(msg) => StoreError::NotFound(msg),
        DomainError::Capacity(msg) => StoreError::Capacity(msg),
        DomainError::Conflict(msg) => StoreError::Cycle(msg),
        other => StoreError::Constraint(other.to_string()),
    }
}

/// In-memory asset store.
///
/// Intended for tests/dev. Every mutation runs under one write guard, so
/// counter updates and edge changes are linearizable exactly like the
/// single-statement / single-transaction writes of the Postgres store.
#[derive(Debug, Default)]
pub struct InMemoryAssetStore {
    state: RwLock<State>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a counter without any guard, to simulate a lost write.
    #[cfg(test)]
    pub(crate) fn force_in_use(&self, id: AssetId, in_use: i64) -> Result<(), StoreError> {
        self.write()?.asset_mut(id)?.in_use = in_use;
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        let guard = self
            .state
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        if guard.closed {
            return Err(StoreError::Unavailable("store closed".to_string()));
        }
        Ok(guard)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        let guard = self
            .state
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        if guard.closed {
            return Err(StoreError::Unavailable("store closed".to_string()));
        }
        Ok(guard)
    }
}

#[async_trait::async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn insert_asset(&self, asset: &Asset) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state.assets.contains_key(&asset.id) {
            return Err(StoreError::Duplicate(format!("asset {}", asset.id)));
        }
        state.assets.insert(asset.id, asset.clone());
        Ok(())
    }

    async fn get_asset(&self, id: AssetId) -> Result<Option<Asset>, StoreError> {
        Ok(self.read()?.assets.get(&id).cloned())
    }

    async fn replace_attributes(
        &self,
        id: AssetId,
        attributes: &Attributes,
        now: DateTime<Utc>,
    ) -> Result<Asset, StoreError> {
        let mut state = self.write()?;
        let asset = state.asset_mut(id)?;
        asset.attributes = attributes.clone();
        asset.updated_at = now;
        Ok(asset.clone())
    }

    async fn set_quantity(
        &self,
        id: AssetId,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> Result<Asset, StoreError> {
        let mut state = self.write()?;
        let asset = state.asset_mut(id)?;
        let quantity = asset
            .check_resize(quantity)
            .map_err(|e| StoreError::Constraint(e.to_string()))?;
        asset.quantity = quantity;
        asset.updated_at = now;
        Ok(asset.clone())
    }

    async fn increment_in_use(&self, id: AssetId, now: DateTime<Utc>) -> Result<CounterChange, StoreError> {
        let mut state = self.write()?;
        let asset = state.asset_mut(id)?;
        let change = asset.commit_unit().map_err(domain_to_store)?;
        asset.apply(change, now);
        Ok(change)
    }

    async fn decrement_in_use(&self, id: AssetId, now: DateTime<Utc>) -> Result<CounterChange, StoreError> {
        let mut state = self.write()?;
        let parents = state.parents_of(id).len() as u64;
        let asset = state.asset_mut(id)?;
        let change = asset.release_checkout(parents).map_err(|e| match e {
            DomainError::Conflict(msg) => StoreError::Held(msg),
            other => domain_to_store(other),
        })?;
        asset.apply(change, now);
        Ok(change)
    }

    async fn attach(&self, relationship: &AssetRelationship) -> Result<CounterChange, StoreError> {
        let (parent, child) = (relationship.parent, relationship.child);
        let mut state = self.write()?;

        // Decide everything before touching state so a failure changes nothing.
        state.asset(parent)?;
        let change = {
            let child_asset = state.asset(child)?;
            if state.edges.contains_key(&(parent, child)) {
                return Err(StoreError::Duplicate(format!("{child} is already nested under {parent}")));
            }
            ensure_acyclic(parent, child, |id| state.children_of(id)).map_err(domain_to_store)?;
            child_asset.commit_unit().map_err(domain_to_store)?
        };

        state.asset_mut(child)?.apply(change, relationship.created_at);
        state.edges.insert((parent, child), relationship.clone());
        Ok(change)
    }

    async fn detach(
        &self,
        parent: AssetId,
        child: AssetId,
        now: DateTime<Utc>,
    ) -> Result<CounterChange, StoreError> {
        let mut state = self.write()?;
        if !state.edges.contains_key(&(parent, child)) {
            return Err(StoreError::NotFound(format!("{child} is not nested under {parent}")));
        }
        let change = state.asset(child)?.release_unit();

        state.asset_mut(child)?.apply(change, now);
        state.edges.remove(&(parent, child));
        Ok(change)
    }

    async fn list_children(&self, parent: AssetId) -> Result<Vec<ChildLink>, StoreError> {
        let state = self.read()?;
        let parent_asset = state.asset(parent)?.clone();

        let mut links = Vec::new();
        for child in state.children_of(parent) {
            let edge = &state.edges[&(parent, child)];
            let child_asset = state
                .assets
                .get(&child)
                .ok_or_else(|| StoreError::Backend(format!("dangling relationship to {child}")))?;
            links.push(ChildLink {
                parent: parent_asset.clone(),
                child: child_asset.clone(),
                created_at: edge.created_at,
                updated_at: edge.updated_at,
            });
        }
        links.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.child.id.cmp(&a.child.id))
        });
        Ok(links)
    }

    async fn list_page(&self, offset: u64, limit: u64) -> Result<(Vec<Asset>, u64), StoreError> {
        let state = self.read()?;
        let total = state.assets.len() as u64;
        let mut all: Vec<&Asset> = state.assets.values().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let items = all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn search(&self, terms: &SearchTerms, limit: u64) -> Result<Vec<Asset>, StoreError> {
        let state = self.read()?;
        let hits = state
            .assets
            .values()
            .filter(|a| terms.matches_asset(a))
            .cloned()
            .collect();
        Ok(state.sorted_by_recency(hits, limit))
    }

    async fn suggest_attachable(
        &self,
        parent: AssetId,
        terms: Option<&SearchTerms>,
        limit: u64,
    ) -> Result<Vec<Asset>, StoreError> {
        let state = self.read()?;

        let mut excluded: HashSet<AssetId> = state.children_of(parent).into_iter().collect();
        excluded.extend(ancestors_of(parent, |id| state.parents_of(id)));
        excluded.insert(parent);

        let candidates = state
            .assets
            .values()
            .filter(|a| !excluded.contains(&a.id))
            .filter(|a| terms.is_none_or(|t| t.matches_name(a)))
            .cloned()
            .collect();
        Ok(state.sorted_by_recency(candidates, limit))
    }

    async fn parent_counts(&self) -> Result<Vec<ParentCount>, StoreError> {
        let state = self.read()?;
        let mut counts: BTreeMap<AssetId, u64> = BTreeMap::new();
        for (_, child) in state.edges.keys() {
            *counts.entry(*child).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(child, parents)| ParentCount { child, parents })
            .collect())
    }

    async fn all_assets(&self) -> Result<Vec<Asset>, StoreError> {
        let (assets, _) = self.list_page(0, u64::MAX).await?;
        Ok(assets)
    }

    async fn close(&self) {
        if let Ok(mut state) = self.state.write() {
            state.closed = true;
        }
    }
}
