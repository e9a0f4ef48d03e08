//! Free-form asset attributes.

use std::collections::BTreeMap;

use stocktag_core::{DomainError, DomainResult};

/// Attribute map: unique string keys to string values.
pub type Attributes = BTreeMap<String, String>;

/// Trim keys and reject blank or colliding ones.
///
/// The caller always supplies the complete desired mapping; there is no merge
/// with what was stored before.
pub fn normalize_attributes(attributes: Attributes) -> DomainResult<Attributes> {
    let mut out = Attributes::new();
    for (key, value) in attributes {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("attribute keys cannot be blank"));
        }
        if out.insert(trimmed.to_string(), value).is_some() {
            return Err(DomainError::validation(format!(
                "duplicate attribute key '{trimmed}'"
            )));
        }
    }
    Ok(out)
}
