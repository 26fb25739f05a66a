//! Unauthenticated `/internal` endpoints for operators and orchestrators.

use std::time::Duration;

use axum::extract::State;
use axum::Json;
use idm_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::{Empty, Envelope};
use crate::state::AppState;

/// How long the health check waits for the database.
const DB_PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Body of `GET /internal/info`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
}

/// GET /internal/info
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: state.config.app_name.clone(),
        version: state.config.app_version.clone(),
    })
}

/// GET /internal/health -- 200 when the database answers within five seconds.
pub async fn health(State(state): State<AppState>) -> AppResult<Json<Envelope<Empty>>> {
    match tokio::time::timeout(DB_PING_TIMEOUT, idm_db::health_check(&state.pool)).await {
        Ok(Ok(())) => Ok(Json(Envelope::ok(Empty {}))),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Health check failed");
            Err(db_unavailable())
        }
        Err(_) => {
            tracing::error!(timeout_secs = DB_PING_TIMEOUT.as_secs(), "Health check timed out");
            Err(db_unavailable())
        }
    }
}

fn db_unavailable() -> AppError {
    AppError::Core(CoreError::Internal("Database connection failed".into()))
}
