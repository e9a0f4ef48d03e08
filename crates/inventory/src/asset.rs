use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocktag_core::{AssetId, DomainError, DomainResult};

use crate::attributes::{Attributes, normalize_attributes};
use crate::quantity::{QuantityInput, validate_quantity};

/// One trackable item type with a stock count and a usage count.
///
/// `in_use` counts units either checked out directly or attached as a child
/// of another asset. `0 <= in_use <= quantity` holds after every transition
/// produced by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub quantity: i64,
    pub in_use: i64,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Command: register a new asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAsset {
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub quantity: i64,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Create request as submitted by a form or scanner: `quantity` is loosely
/// typed until [`AssetDraft::resolve`] runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDraft {
    pub name: String,
    #[serde(rename = "type", default)]
    pub asset_type: String,
    #[serde(default)]
    pub quantity: QuantityInput,
    #[serde(default)]
    pub attributes: Attributes,
}

impl AssetDraft {
    pub fn resolve(self) -> DomainResult<NewAsset> {
        Ok(NewAsset {
            quantity: self.quantity.resolve()?,
            name: self.name,
            asset_type: self.asset_type,
            attributes: self.attributes,
        })
    }
}

/// Before/after values of a single `in_use` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterChange {
    pub before: i64,
    pub after: i64,
}

impl CounterChange {
    pub fn increment(before: i64) -> Self {
        Self {
            before,
            after: before + 1,
        }
    }

    /// Decrement floored at zero.
    pub fn decrement(before: i64) -> Self {
        Self {
            before,
            after: (before - 1).max(0),
        }
    }

    /// True when a decrement found the counter already at zero.
    ///
    /// That means some earlier write was lost or applied twice.
    pub fn floored(&self) -> bool {
        self.after == self.before && self.after == 0
    }
}

impl Asset {
    /// Build a fresh asset from a validated command. `in_use` starts at 0.
    pub fn create(id: AssetId, cmd: NewAsset, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        let quantity = validate_quantity(cmd.quantity)?;
        let attributes = normalize_attributes(cmd.attributes)?;

        Ok(Self {
            id,
            created_at: now,
            updated_at: now,
            name: name.to_string(),
            asset_type: cmd.asset_type.trim().to_string(),
            quantity,
            in_use: 0,
            attributes,
        })
    }

    /// Units not currently committed.
    pub fn available(&self) -> i64 {
        self.quantity - self.in_use
    }

    /// Decide a +1 transition (checkout or attach-as-child).
    pub fn commit_unit(&self) -> DomainResult<CounterChange> {
        if self.in_use >= self.quantity {
            return Err(DomainError::capacity(format!(
                "all {} unit(s) of '{}' are already in use",
                self.quantity, self.name
            )));
        }
        Ok(CounterChange::increment(self.in_use))
    }

    /// Decide a -1 transition for a detach, floored at zero.
    pub fn release_unit(&self) -> CounterChange {
        CounterChange::decrement(self.in_use)
    }

    /// Decide a checkin while `parents` edges each hold one unit.
    ///
    /// Held units only come back through detach. With no edges this is a
    /// plain floored release.
    pub fn release_checkout(&self, parents: u64) -> DomainResult<CounterChange> {
        let held = i64::try_from(parents).unwrap_or(i64::MAX);
        if held > 0 && self.in_use <= held {
            return Err(DomainError::conflict(format!(
                "no unit of '{}' is checked out: all {} unit(s) in use are nested under {held} parent(s)",
                self.name, self.in_use
            )));
        }
        Ok(CounterChange::decrement(self.in_use))
    }

    /// Apply a decided transition.
    pub fn apply(&mut self, change: CounterChange, now: DateTime<Utc>) {
        self.in_use = change.after;
        self.updated_at = now;
    }

    /// Validate a new total quantity against the committed units.
    pub fn check_resize(&self, quantity: i64) -> DomainResult<i64> {
        let quantity = validate_quantity(quantity)?;
        if quantity < self.in_use {
            return Err(DomainError::validation(format!(
                "quantity {quantity} is below the {} unit(s) currently in use",
                self.in_use
            )));
        }
        Ok(quantity)
    }

    /// Verify the stored counter pair is consistent.
    pub fn check_invariants(&self) -> DomainResult<()> {
        if self.in_use < 0 || self.in_use > self.quantity {
            return Err(DomainError::invariant(format!(
                "asset {} has in_use {} outside 0..={}",
                self.id, self.in_use, self.quantity
            )));
        }
        Ok(())
    }
}
