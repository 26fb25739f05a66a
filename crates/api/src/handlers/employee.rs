//! Handlers for the `/employees` resource.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use idm_core::paging::{PageRequest, PageResponse};
use idm_core::types::DbId;
use idm_db::models::employee::{CreateEmployee, EmployeeResponse};
use idm_db::models::IdsRequest;
use serde::Deserialize;

use super::{bad_request, failed};
use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireReader};
use crate::response::{Empty, Envelope};
use crate::state::AppState;

/// Query string of `GET /employees/page`.
///
/// `pageNumber` defaults to 0 and `pageSize` to 1.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
    #[serde(default)]
    pub text_filter: String,
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        PageRequest {
            page_number: query.page_number.unwrap_or(0),
            page_size: query.page_size.unwrap_or(1),
            text_filter: query.text_filter,
        }
    }
}

/// POST /api/v1/employees
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    body: Result<Json<CreateEmployee>, JsonRejection>,
) -> AppResult<Json<Envelope<DbId>>> {
    let Json(request) = body.map_err(bad_request)?;
    tracing::debug!(name = %request.name, "create employee: received request");

    let id = state
        .employees
        .create(request)
        .await
        .map_err(failed("create employee"))?;
    Ok(Json(Envelope::ok(id)))
}

/// GET /api/v1/employees/page
pub async fn find_page(
    State(state): State<AppState>,
    RequireReader(_user): RequireReader,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> AppResult<Json<Envelope<PageResponse<EmployeeResponse>>>> {
    let Query(query) = query.map_err(bad_request)?;
    let request = PageRequest::from(query);
    tracing::debug!(?request, "find employee page");

    let page = state
        .employees
        .find_page(request)
        .await
        .map_err(failed("find employee page"))?;
    Ok(Json(Envelope::ok(page)))
}

/// GET /api/v1/employees/{id}
pub async fn find_by_id(
    State(state): State<AppState>,
    RequireReader(_user): RequireReader,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<Envelope<EmployeeResponse>>> {
    let Path(id) = id.map_err(bad_request)?;
    tracing::debug!(id, "find employee by id");

    let employee = state
        .employees
        .find_by_id(id)
        .await
        .map_err(failed("find employee by id"))?;
    Ok(Json(Envelope::ok(employee)))
}

/// GET /api/v1/employees
pub async fn get_all(
    State(state): State<AppState>,
    RequireReader(_user): RequireReader,
) -> AppResult<Json<Envelope<Vec<EmployeeResponse>>>> {
    let employees = state
        .employees
        .get_all()
        .await
        .map_err(failed("get all employees"))?;
    Ok(Json(Envelope::ok(employees)))
}

/// POST /api/v1/employees/ids
pub async fn find_by_ids(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    body: Result<Json<IdsRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<Vec<EmployeeResponse>>>> {
    let Json(request) = body.map_err(bad_request)?;
    tracing::debug!(ids = ?request.ids, "find employees by ids");

    let employees = state
        .employees
        .find_by_ids(&request.ids)
        .await
        .map_err(failed("find employees by ids"))?;
    Ok(Json(Envelope::ok(employees)))
}

/// DELETE /api/v1/employees/{id}
pub async fn delete_by_id(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<Envelope<Empty>>> {
    let Path(id) = id.map_err(bad_request)?;
    tracing::debug!(id, "delete employee by id");

    state
        .employees
        .delete_by_id(id)
        .await
        .map_err(failed("delete employee by id"))?;
    Ok(Json(Envelope::ok(Empty {})))
}

/// DELETE /api/v1/employees/ids
pub async fn delete_by_ids(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    body: Result<Json<IdsRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<Empty>>> {
    let Json(request) = body.map_err(bad_request)?;
    tracing::debug!(ids = ?request.ids, "delete employees by ids");

    state
        .employees
        .delete_by_ids(&request.ids)
        .await
        .map_err(failed("delete employees by ids"))?;
    Ok(Json(Envelope::ok(Empty {})))
}
