//! Inventory domain module.
//!
//! This crate contains the stock-count and nesting rules for assets,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).
//! Storage adapters call into these rules so every backend agrees on what a
//! valid transition is.

pub mod asset;
pub mod attributes;
pub mod quantity;
pub mod relationship;
pub mod search;

pub use asset::{Asset, AssetDraft, CounterChange, NewAsset};
pub use attributes::{Attributes, normalize_attributes};
pub use quantity::{QuantityInput, coerce_quantity, validate_quantity};
pub use relationship::{AssetRelationship, ChildLink, ancestors_of, ensure_acyclic, ensure_distinct};
pub use search::{SUGGESTION_LIMIT, SearchTerms};
