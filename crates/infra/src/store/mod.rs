//! Asset datastore boundary.
//!
//! The trait is storage-agnostic; `in_memory` backs tests and local runs,
//! `postgres` is the production adapter.

pub mod in_memory;
pub mod postgres;
pub mod schema;
pub mod r#trait;

pub use in_memory::InMemoryAssetStore;
pub use postgres::PostgresAssetStore;
pub use r#trait::{AssetStore, ParentCount, StoreError};
