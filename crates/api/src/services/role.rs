use async_trait::async_trait;
use idm_core::error::CoreError;
use idm_core::types::DbId;
use idm_core::validation::RequestValidator;
use idm_db::models::role::{CreateRole, RoleResponse};
use idm_db::repositories::{NamedRepository, RoleRepository};

use super::unique_create::create_unique;
use super::{store_error, RoleService};

const ENTITY: &str = "role";

/// Role service over any role store (cached or not) and validator.
pub struct RoleSvc<R, V> {
    repo: R,
    validator: V,
}

impl<R, V> RoleSvc<R, V> {
    pub fn new(repo: R, validator: V) -> Self {
        Self { repo, validator }
    }
}

#[async_trait]
impl<R, V> RoleService for RoleSvc<R, V>
where
    R: RoleRepository + NamedRepository<Create = CreateRole>,
    V: RequestValidator,
{
    /// A concurrent insert that slips past the name check still fails on the
    /// `role.name` unique constraint and surfaces as `AlreadyExists`.
    async fn create(&self, request: CreateRole) -> Result<DbId, CoreError> {
        self.validator.validate(&request)?;
        create_unique(&self.repo, ENTITY, &request.name, &request).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<RoleResponse, CoreError> {
        let role = self
            .repo
            .find_by_id(id)
            .await
            .map_err(store_error(format!("error finding role with id {id}")))?;
        Ok(role.into())
    }

    async fn get_all(&self) -> Result<Vec<RoleResponse>, CoreError> {
        let roles = self
            .repo
            .get_all()
            .await
            .map_err(store_error("error getting all roles"))?;
        Ok(roles.into_iter().map(Into::into).collect())
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<RoleResponse>, CoreError> {
        let roles = self
            .repo
            .find_by_ids(ids)
            .await
            .map_err(store_error(format!("error finding roles with ids {ids:?}")))?;
        Ok(roles.into_iter().map(Into::into).collect())
    }

    async fn delete_by_id(&self, id: DbId) -> Result<(), CoreError> {
        self.repo
            .delete_by_id(id)
            .await
            .map_err(store_error(format!("error deleting role with id {id}")))
    }

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<(), CoreError> {
        self.repo
            .delete_by_ids(ids)
            .await
            .map_err(store_error(format!("error deleting roles with ids {ids:?}")))
    }
}
