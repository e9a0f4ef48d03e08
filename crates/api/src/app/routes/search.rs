use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// `GET /search?q=`. A missing or blank `q` returns `[]`.
///
/// At most `SEARCH_LIMIT` (100) hits come back, most recently updated first;
/// narrow the query to reach older matches.
pub async fn search(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::TextQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(v) => v,
        Err(rejection) => return errors::query_rejection(rejection),
    };

    match services.ledger.search_by_keyword(&query.q).await {
        Ok(assets) => (StatusCode::OK, Json(assets)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
