//! Role entity model and DTOs.

use idm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `role` table. Also the payload stored in the role cache.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    #[sqlx(rename = "create_at")]
    pub created_at: Timestamp,
    #[sqlx(rename = "update_at")]
    pub updated_at: Timestamp,
}

/// DTO for creating a role.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateRole {
    #[serde(default)]
    #[validate(length(min = 2, max = 155))]
    pub name: String,
}

/// Client-facing projection of [`Role`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleResponse {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "create_at")]
    pub created_at: Timestamp,
    #[serde(rename = "update_at")]
    pub updated_at: Timestamp,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}
