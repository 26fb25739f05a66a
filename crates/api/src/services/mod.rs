//! Service layer.
//!
//! Services sit between the handlers and the repositories: they validate
//! requests, run the transactional create flow, map rows to responses and
//! wrap store errors with the operation that failed. Handlers only see the
//! [`EmployeeService`] and [`RoleService`] traits.

pub mod employee;
pub mod role;
mod unique_create;

#[cfg(test)]
mod mock;

use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use idm_core::error::CoreError;
use idm_core::paging::{PageRequest, PageResponse};
use idm_core::types::DbId;
use idm_db::error::StoreError;
use idm_db::models::employee::{CreateEmployee, EmployeeResponse};
use idm_db::models::role::{CreateRole, RoleResponse};

pub use employee::EmployeeSvc;
pub use role::RoleSvc;

pub type DynEmployeeService = Arc<dyn EmployeeService>;
pub type DynRoleService = Arc<dyn RoleService>;

#[async_trait]
pub trait EmployeeService: Send + Sync {
    /// Validate, then insert unless an employee with the same name exists.
    async fn create(&self, request: CreateEmployee) -> Result<DbId, CoreError>;
    async fn find_by_id(&self, id: DbId) -> Result<EmployeeResponse, CoreError>;
    async fn get_all(&self) -> Result<Vec<EmployeeResponse>, CoreError>;
    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<EmployeeResponse>, CoreError>;
    async fn delete_by_id(&self, id: DbId) -> Result<(), CoreError>;
    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<(), CoreError>;
    /// One page of employees plus the total matching the same filter.
    async fn find_page(
        &self,
        request: PageRequest,
    ) -> Result<PageResponse<EmployeeResponse>, CoreError>;
}

#[async_trait]
pub trait RoleService: Send + Sync {
    /// Validate, then insert unless a role with the same name exists.
    async fn create(&self, request: CreateRole) -> Result<DbId, CoreError>;
    async fn find_by_id(&self, id: DbId) -> Result<RoleResponse, CoreError>;
    async fn get_all(&self) -> Result<Vec<RoleResponse>, CoreError>;
    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<RoleResponse>, CoreError>;
    async fn delete_by_id(&self, id: DbId) -> Result<(), CoreError>;
    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<(), CoreError>;
}

/// Convert a store error, prefixing the operation that failed.
fn store_error(context: impl Display) -> impl FnOnce(StoreError) -> CoreError {
    move |err| CoreError::from(err).context(context)
}
