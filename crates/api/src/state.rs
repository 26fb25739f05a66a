use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::{DynEmployeeService, DynRoleService};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used directly only by the health check.
    pub pool: idm_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub employees: DynEmployeeService,
    pub roles: DynRoleService,
}
