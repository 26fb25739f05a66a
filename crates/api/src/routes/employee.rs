use axum::routing::{get, post};
use axum::Router;

use crate::handlers::employee;
use crate::state::AppState;

/// Routes mounted at `/employees`.
///
/// The literal `/page` and `/ids` segments take precedence over `/{id}`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(employee::create).get(employee::get_all))
        .route("/page", get(employee::find_page))
        .route(
            "/ids",
            post(employee::find_by_ids).delete(employee::delete_by_ids),
        )
        .route(
            "/{id}",
            get(employee::find_by_id).delete(employee::delete_by_id),
        )
}
