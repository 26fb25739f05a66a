use axum::routing::{get, post};
use axum::Router;

use crate::handlers::role;
use crate::state::AppState;

/// Routes mounted at `/roles`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(role::create).get(role::get_all))
        .route("/ids", post(role::find_by_ids).delete(role::delete_by_ids))
        .route("/{id}", get(role::find_by_id).delete(role::delete_by_id))
}
