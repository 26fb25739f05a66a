//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller's realm roles from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `IDM_ADMIN` role.
//! - [`rbac::RequireReader`] -- Requires `IDM_ADMIN` or `IDM_USER`.

pub mod auth;
pub mod rbac;
