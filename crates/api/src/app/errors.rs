use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stocktag_core::AssetId;
use stocktag_infra::{LedgerError, PrintError};

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    match err {
        LedgerError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        LedgerError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        LedgerError::Capacity(msg) => json_error(StatusCode::CONFLICT, "capacity_exceeded", msg),
        LedgerError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        LedgerError::Invariant(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "invariant_violation", msg)
        }
        LedgerError::PartialFailure(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "partial_failure", msg)
        }
        LedgerError::Unavailable(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg)
        }
    }
}

pub fn print_error_to_response(err: PrintError) -> axum::response::Response {
    match err {
        PrintError::Ledger(e) => ledger_error_to_response(e),
        PrintError::NotConfigured => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "printer_unavailable",
            "no label printer is configured",
        ),
        PrintError::Failed(msg) => json_error(StatusCode::BAD_GATEWAY, "printer_error", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Malformed or mistyped request body.
pub fn json_rejection(rejection: JsonRejection) -> axum::response::Response {
    json_error(rejection.status(), "validation_error", rejection.body_text())
}

/// Malformed query string.
pub fn query_rejection(rejection: QueryRejection) -> axum::response::Response {
    json_error(rejection.status(), "validation_error", rejection.body_text())
}

pub fn parse_asset_id(raw: &str) -> Result<AssetId, axum::response::Response> {
    raw.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid asset id"))
}
