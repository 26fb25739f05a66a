//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose realm roles do
//! not include a required one. Use these in route handlers to enforce
//! authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use idm_core::error::CoreError;
use idm_core::roles::{ROLE_ADMIN, ROLE_USER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

const PERMISSION_DENIED: &str = "Permission denied";

/// Requires the `IDM_ADMIN` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.has_role(ROLE_ADMIN) {
            return Err(AppError::Core(CoreError::Forbidden(PERMISSION_DENIED.into())));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `IDM_ADMIN` or `IDM_USER`. Rejects with 403 Forbidden otherwise.
pub struct RequireReader(pub AuthUser);

impl FromRequestParts<AppState> for RequireReader {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.has_role(ROLE_ADMIN) && !user.has_role(ROLE_USER) {
            return Err(AppError::Core(CoreError::Forbidden(PERMISSION_DENIED.into())));
        }
        Ok(RequireReader(user))
    }
}
