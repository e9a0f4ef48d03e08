//! `stocktag-core`: identifiers, rule errors and pagination shared by every
//! other crate. Nothing here touches storage or the network.

pub mod error;
pub mod id;
pub mod page;

pub use error::{DomainError, DomainResult};
pub use id::AssetId;
pub use page::{Page, PageRequest};
