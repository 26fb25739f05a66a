use axum::routing::get;
use axum::Router;

use crate::handlers::internal;
use crate::state::AppState;

/// Mount the unauthenticated routes (intended for `/internal`, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/info", get(internal::info))
        .route("/health", get(internal::health))
}
