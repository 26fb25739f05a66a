pub mod employee;
pub mod internal;
pub mod role;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /employees                  create (admin), list (reader)
/// /employees/page             filtered page (reader)
/// /employees/ids              find (POST), delete (DELETE) by ids (admin)
/// /employees/{id}             get (reader), delete (admin)
///
/// /roles                      create (admin), list (reader)
/// /roles/ids                  find (POST), delete (DELETE) by ids (admin)
/// /roles/{id}                 get (reader), delete (admin)
/// ```
///
/// "reader" is either `IDM_ADMIN` or `IDM_USER`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/employees", employee::router())
        .nest("/roles", role::router())
}
