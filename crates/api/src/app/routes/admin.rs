use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/audit", get(audit))
}

/// Read-only counter reconciliation report.
pub async fn audit(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.ledger.audit().await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
