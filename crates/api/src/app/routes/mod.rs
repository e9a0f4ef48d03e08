use axum::{
    Router,
    routing::{get, post},
};

pub mod admin;
pub mod assets;
pub mod circulation;
pub mod labels;
pub mod search;
pub mod system;

/// Router for every ledger endpoint.
pub fn router() -> Router {
    Router::new()
        .nest("/assets", assets::router())
        .route("/checkout", post(circulation::check_out))
        .route("/checkin", post(circulation::check_in))
        .route("/search", get(search::search))
        .nest("/admin", admin::router())
}
