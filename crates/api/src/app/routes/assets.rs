use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};

use stocktag_inventory::AssetDraft;

use crate::app::routes::labels;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_asset).get(list_assets))
        .route("/:id", get(get_asset))
        .route("/:id/attributes", put(update_attributes))
        .route("/:id/quantity", put(update_quantity))
        .route("/:id/children", get(list_children).post(attach_child))
        .route("/:id/children/:child_id", delete(detach_child))
        .route("/:id/attachable", get(suggest_attachable))
        .route("/:id/print", post(labels::print_label))
}

pub async fn create_asset(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<AssetDraft>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services.ledger.create_asset(body).await {
        Ok(asset) => (StatusCode::CREATED, Json(asset)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_assets(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::ListQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(v) => v,
        Err(rejection) => return errors::query_rejection(rejection),
    };

    let (page, page_size) = match query.resolve() {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.list_all(page, page_size).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_asset(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_asset_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.find_by_id(id).await {
        Ok(asset) => (StatusCode::OK, Json(asset)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn update_attributes(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateAttributesRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    let id = match errors::parse_asset_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.update_attributes(id, body.attributes).await {
        Ok(asset) => (StatusCode::OK, Json(asset)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn update_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateQuantityRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    let id = match errors::parse_asset_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.update_quantity(id, body.quantity).await {
        Ok(asset) => (StatusCode::OK, Json(asset)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_children(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_asset_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.list_children(id).await {
        Ok(links) => (StatusCode::OK, Json(links)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn attach_child(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::AttachChildRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    let (parent, child) = match (
        errors::parse_asset_id(&id),
        errors::parse_asset_id(&body.child_id),
    ) {
        (Ok(p), Ok(c)) => (p, c),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };

    match services.ledger.attach_child(parent, child).await {
        Ok(relationship) => (StatusCode::CREATED, Json(relationship)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn detach_child(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, child_id)): Path<(String, String)>,
) -> axum::response::Response {
    let (parent, child) = match (errors::parse_asset_id(&id), errors::parse_asset_id(&child_id)) {
        (Ok(p), Ok(c)) => (p, c),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };

    match services.ledger.detach_child(parent, child).await {
        Ok(change) => (StatusCode::OK, Json(dto::counter_to_json(child, change))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn suggest_attachable(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    query: Result<Query<dto::TextQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(v) => v,
        Err(rejection) => return errors::query_rejection(rejection),
    };

    let id = match errors::parse_asset_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.suggest_attachable(id, &query.q).await {
        Ok(assets) => (StatusCode::OK, Json(assets)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
