use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use crate::app::errors;
use crate::app::services::AppServices;

pub async fn print_label(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_asset_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.print_label(id).await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "id": id.to_string(), "printed": true })),
        )
            .into_response(),
        Err(e) => errors::print_error_to_response(e),
    }
}
