//! Asset identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of an asset.
///
/// This is the value encoded into printed QR labels, so scanners hand it back
/// verbatim (possibly upper-cased; parsing is case-insensitive).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(Uuid);

impl AssetId {
    /// Fresh UUIDv7, so ids sort roughly by creation time.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// The all-zero id. Sorts before every generated id.
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for AssetId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Hyphenated lowercase, the same text printed on labels.
        core::fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl From<Uuid> for AssetId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<AssetId> for Uuid {
    fn from(value: AssetId) -> Self {
        value.0
    }
}

impl FromStr for AssetId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s.trim())
            .map(Self)
            .map_err(|e| DomainError::invalid_id(format!("AssetId: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scanned_ids_regardless_of_case() {
        let id = AssetId::new();
        let scanned = id.to_string().to_uppercase();
        assert_eq!(scanned.parse::<AssetId>().unwrap(), id);
    }

    #[test]
    fn surrounding_whitespace_from_scanners_is_ignored() {
        let id = AssetId::new();
        assert_eq!(format!(" {id}\n").parse::<AssetId>().unwrap(), id);
    }

    #[test]
    fn rejects_garbage() {
        let err = "not-an-id".parse::<AssetId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(msg) if msg.starts_with("AssetId")));
    }

    #[test]
    fn nil_sorts_first() {
        assert!(AssetId::nil() < AssetId::new());
    }

    #[test]
    fn serializes_as_bare_string() {
        let id = AssetId::new();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }
}
