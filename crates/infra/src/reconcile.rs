//! Counter reconciliation.
//!
//! Read-only scan comparing the relationship table against `in_use`
//! counters. Every attached child holds one committed unit per parent, so a
//! counter below its parent count (or outside `0..=quantity`) means an
//! earlier write was lost. Repair is left to an operator.

use std::collections::HashMap;

use serde::Serialize;

use stocktag_core::AssetId;
use stocktag_inventory::Asset;

use crate::store::ParentCount;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditFinding {
    /// `in_use` outside `0..=quantity`.
    CounterOutOfBounds {
        asset_id: AssetId,
        name: String,
        quantity: i64,
        in_use: i64,
    },
    /// Fewer units in use than parents holding the asset.
    CounterBelowParents {
        asset_id: AssetId,
        name: String,
        in_use: i64,
        parents: u64,
    },
    /// Edges point at an asset row that does not exist.
    OrphanedRelationships { asset_id: AssetId, parents: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub assets_scanned: usize,
    pub relationships_scanned: u64,
    pub findings: Vec<AuditFinding>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

pub fn reconcile(assets: &[Asset], parent_counts: &[ParentCount]) -> AuditReport {
    let mut parents: HashMap<AssetId, u64> =
        parent_counts.iter().map(|pc| (pc.child, pc.parents)).collect();
    let mut findings = Vec::new();

    for asset in assets {
        if asset.check_invariants().is_err() {
            findings.push(AuditFinding::CounterOutOfBounds {
                asset_id: asset.id,
                name: asset.name.clone(),
                quantity: asset.quantity,
                in_use: asset.in_use,
            });
        }
        let held = parents.remove(&asset.id).unwrap_or(0);
        if (asset.in_use.max(0) as u64) < held {
            findings.push(AuditFinding::CounterBelowParents {
                asset_id: asset.id,
                name: asset.name.clone(),
                in_use: asset.in_use,
                parents: held,
            });
        }
    }

    let mut orphans: Vec<_> = parents.into_iter().collect();
    orphans.sort();
    findings.extend(
        orphans
            .into_iter()
            .map(|(asset_id, parents)| AuditFinding::OrphanedRelationships { asset_id, parents }),
    );

    AuditReport {
        assets_scanned: assets.len(),
        relationships_scanned: parent_counts.iter().map(|pc| pc.parents).sum(),
        findings,
    }
}
