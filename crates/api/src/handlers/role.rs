//! Handlers for the `/roles` resource.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use idm_core::types::DbId;
use idm_db::models::role::{CreateRole, RoleResponse};
use idm_db::models::IdsRequest;

use super::{bad_request, failed};
use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireReader};
use crate::response::{Empty, Envelope};
use crate::state::AppState;

/// POST /api/v1/roles
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    body: Result<Json<CreateRole>, JsonRejection>,
) -> AppResult<Json<Envelope<DbId>>> {
    let Json(request) = body.map_err(bad_request)?;
    tracing::debug!(name = %request.name, "create role: received request");

    let id = state
        .roles
        .create(request)
        .await
        .map_err(failed("create role"))?;
    Ok(Json(Envelope::ok(id)))
}

/// GET /api/v1/roles/{id}
pub async fn find_by_id(
    State(state): State<AppState>,
    RequireReader(_user): RequireReader,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<Envelope<RoleResponse>>> {
    let Path(id) = id.map_err(bad_request)?;
    tracing::debug!(id, "find role by id");

    let role = state
        .roles
        .find_by_id(id)
        .await
        .map_err(failed("find role by id"))?;
    Ok(Json(Envelope::ok(role)))
}

/// GET /api/v1/roles
pub async fn get_all(
    State(state): State<AppState>,
    RequireReader(_user): RequireReader,
) -> AppResult<Json<Envelope<Vec<RoleResponse>>>> {
    let roles = state
        .roles
        .get_all()
        .await
        .map_err(failed("get all roles"))?;
    Ok(Json(Envelope::ok(roles)))
}

/// POST /api/v1/roles/ids
pub async fn find_by_ids(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    body: Result<Json<IdsRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<Vec<RoleResponse>>>> {
    let Json(request) = body.map_err(bad_request)?;
    tracing::debug!(ids = ?request.ids, "find roles by ids");

    let roles = state
        .roles
        .find_by_ids(&request.ids)
        .await
        .map_err(failed("find roles by ids"))?;
    Ok(Json(Envelope::ok(roles)))
}

/// DELETE /api/v1/roles/{id}
pub async fn delete_by_id(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<Envelope<Empty>>> {
    let Path(id) = id.map_err(bad_request)?;
    tracing::debug!(id, "delete role by id");

    state
        .roles
        .delete_by_id(id)
        .await
        .map_err(failed("delete role by id"))?;
    Ok(Json(Envelope::ok(Empty {})))
}

/// DELETE /api/v1/roles/ids
pub async fn delete_by_ids(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    body: Result<Json<IdsRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<Empty>>> {
    let Json(request) = body.map_err(bad_request)?;
    tracing::debug!(ids = ?request.ids, "delete roles by ids");

    state
        .roles
        .delete_by_ids(&request.ids)
        .await
        .map_err(failed("delete roles by ids"))?;
    Ok(Json(Envelope::ok(Empty {})))
}
