//! Checkout / checkin by scanned label value.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn check_out(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::ScanRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    let id = match errors::parse_asset_id(&body.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.check_out(id).await {
        Ok(change) => (StatusCode::OK, Json(dto::counter_to_json(id, change))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn check_in(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::ScanRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    let id = match errors::parse_asset_id(&body.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.check_in(id).await {
        Ok(change) => (StatusCode::OK, Json(dto::counter_to_json(id, change))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
