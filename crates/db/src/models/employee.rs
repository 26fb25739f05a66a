//! Employee entity model and DTOs.

use idm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `employee` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Employee {
    pub id: DbId,
    pub name: String,
    #[sqlx(rename = "create_at")]
    pub created_at: Timestamp,
    #[sqlx(rename = "update_at")]
    pub updated_at: Timestamp,
}

/// DTO for creating an employee.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateEmployee {
    #[serde(default)]
    #[validate(length(min = 2, max = 155))]
    pub name: String,
}

/// Client-facing projection of [`Employee`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeResponse {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "create_at")]
    pub created_at: Timestamp,
    #[serde(rename = "update_at")]
    pub updated_at: Timestamp,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}
