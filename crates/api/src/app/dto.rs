use axum::http::StatusCode;
use serde::Deserialize;

use stocktag_core::page::DEFAULT_PAGE_SIZE;
use stocktag_inventory::{Attributes, CounterChange, QuantityInput};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct UpdateAttributesRequest {
    pub attributes: Attributes,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: QuantityInput,
}

#[derive(Debug, Deserialize)]
pub struct AttachChildRequest {
    pub child_id: String,
}

/// Body of `/checkout` and `/checkin`: the scanned label value.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextQuery {
    #[serde(default)]
    pub q: String,
}

// -------------------------
// Mapping helpers
// -------------------------

impl ListQuery {
    /// `(page, page_size)`, defaulting to the first page of ten.
    pub fn resolve(&self) -> Result<(u32, u32), axum::response::Response> {
        Ok((
            parse_number("page", self.page.as_deref(), 1)?,
            parse_number("page_size", self.page_size.as_deref(), DEFAULT_PAGE_SIZE)?,
        ))
    }
}

fn parse_number(
    name: &str,
    raw: Option<&str>,
    default: u32,
) -> Result<u32, axum::response::Response> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s.parse().map_err(|_| {
            errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                format!("{name} must be a positive integer"),
            )
        }),
    }
}

pub fn counter_to_json(id: impl ToString, change: CounterChange) -> serde_json::Value {
    serde_json::json!({
        "id": id.to_string(),
        "in_use_before": change.before,
        "in_use": change.after,
    })
}
