#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use idm_core::error::CoreError;
use idm_core::paging::{PageRequest, PageResponse};
use idm_core::types::DbId;
use idm_core::validation::DeclarativeValidator;
use idm_db::cache::MemoryCache;
use idm_db::models::employee::{CreateEmployee, EmployeeResponse};
use idm_db::models::role::{CreateRole, RoleResponse};
use idm_db::repositories::{CachedRoleRepo, PgEmployeeRepo, PgRoleRepo};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

use idm_api::auth::jwt::{Claims, JwtConfig, RealmAccess};
use idm_api::config::{LogConfig, RoleCacheConfig, ServerConfig};
use idm_api::router::build_app_router;
use idm_api::services::{EmployeeService, EmployeeSvc, RoleService, RoleSvc};
use idm_api::state::AppState;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        app_name: "idm".to_string(),
        app_version: "0.1.0-test".to_string(),
        database_url: "postgres://localhost/unused".to_string(),
        db_max_connections: 5,
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
        role_cache: RoleCacheConfig {
            enabled: true,
            redis_url: None,
            ttl_secs: 300,
        },
        log: LogConfig {
            level: "info".to_string(),
            develop_mode: true,
        },
    }
}

/// Build the full application router over the PostgreSQL services, with the
/// role cache held in process.
///
/// Goes through [`build_app_router`] so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let employees = Arc::new(EmployeeSvc::new(
        PgEmployeeRepo::new(pool.clone()),
        DeclarativeValidator,
    ));
    let roles = Arc::new(RoleSvc::new(
        CachedRoleRepo::new(PgRoleRepo::new(pool.clone()), Arc::new(MemoryCache::new())),
        DeclarativeValidator,
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        employees,
        roles,
    };
    build_app_router(state, &config)
}

/// Build the router over canned services and a pool that never connects.
///
/// For tests that stop at the auth layer or never reach the store.
pub fn build_stub_app() -> Router {
    build_stub_app_with(test_config())
}

/// [`build_stub_app`] with a caller-supplied configuration.
pub fn build_stub_app_with(config: ServerConfig) -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool needs only a parseable URL");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        employees: Arc::new(StubEmployees),
        roles: Arc::new(StubRoles),
    };
    build_app_router(state, &config)
}

/// A valid access token carrying `roles`, signed as the identity provider
/// would sign it.
pub fn token(roles: &[&str]) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: Some("test-user".to_string()),
        realm_access: RealmAccess {
            roles: roles.iter().map(|r| r.to_string()).collect(),
        },
        exp: now + 900,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("token signing should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_request(app, Method::POST, uri, body, token).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_request(app, Method::DELETE, uri, body, token).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Canned services
// ---------------------------------------------------------------------------

pub struct StubEmployees;

/// Looking up this employee id never completes.
pub const STALLED_EMPLOYEE_ID: DbId = 408;

fn stub_employee(id: DbId) -> EmployeeResponse {
    EmployeeResponse {
        id,
        name: format!("employee-{id}"),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl EmployeeService for StubEmployees {
    async fn create(&self, _request: CreateEmployee) -> Result<DbId, CoreError> {
        Ok(1)
    }

    async fn find_by_id(&self, id: DbId) -> Result<EmployeeResponse, CoreError> {
        if id == STALLED_EMPLOYEE_ID {
            std::future::pending::<()>().await;
        }
        Ok(stub_employee(id))
    }

    async fn get_all(&self) -> Result<Vec<EmployeeResponse>, CoreError> {
        Ok(vec![stub_employee(1)])
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<EmployeeResponse>, CoreError> {
        Ok(ids.iter().copied().map(stub_employee).collect())
    }

    async fn delete_by_id(&self, _id: DbId) -> Result<(), CoreError> {
        Ok(())
    }

    async fn delete_by_ids(&self, _ids: &[DbId]) -> Result<(), CoreError> {
        Ok(())
    }

    async fn find_page(
        &self,
        _request: PageRequest,
    ) -> Result<PageResponse<EmployeeResponse>, CoreError> {
        Ok(PageResponse {
            result: vec![stub_employee(1)],
            total: 1,
        })
    }
}

pub struct StubRoles;

fn stub_role(id: DbId) -> RoleResponse {
    RoleResponse {
        id,
        name: format!("role-{id}"),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl RoleService for StubRoles {
    async fn create(&self, _request: CreateRole) -> Result<DbId, CoreError> {
        Ok(1)
    }

    async fn find_by_id(&self, id: DbId) -> Result<RoleResponse, CoreError> {
        Ok(stub_role(id))
    }

    async fn get_all(&self) -> Result<Vec<RoleResponse>, CoreError> {
        Ok(vec![stub_role(1)])
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<RoleResponse>, CoreError> {
        Ok(ids.iter().copied().map(stub_role).collect())
    }

    async fn delete_by_id(&self, _id: DbId) -> Result<(), CoreError> {
        Ok(())
    }

    async fn delete_by_ids(&self, _ids: &[DbId]) -> Result<(), CoreError> {
        Ok(())
    }
}
