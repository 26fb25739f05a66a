use async_trait::async_trait;
use idm_core::error::CoreError;
use idm_core::paging::{PageRequest, PageResponse};
use idm_core::types::DbId;
use idm_core::validation::RequestValidator;
use idm_db::models::employee::{CreateEmployee, EmployeeResponse};
use idm_db::repositories::{EmployeeRepository, NamedRepository};

use super::unique_create::create_unique;
use super::{store_error, EmployeeService};

const ENTITY: &str = "employee";

/// Employee service over any employee store and validator.
pub struct EmployeeSvc<R, V> {
    repo: R,
    validator: V,
}

impl<R, V> EmployeeSvc<R, V> {
    pub fn new(repo: R, validator: V) -> Self {
        Self { repo, validator }
    }
}

#[async_trait]
impl<R, V> EmployeeService for EmployeeSvc<R, V>
where
    R: EmployeeRepository + NamedRepository<Create = CreateEmployee>,
    V: RequestValidator,
{
    async fn create(&self, request: CreateEmployee) -> Result<DbId, CoreError> {
        self.validator.validate(&request)?;
        create_unique(&self.repo, ENTITY, &request.name, &request).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<EmployeeResponse, CoreError> {
        let employee = self
            .repo
            .find_by_id(id)
            .await
            .map_err(store_error(format!("error finding employee with id {id}")))?;
        Ok(employee.into())
    }

    async fn get_all(&self) -> Result<Vec<EmployeeResponse>, CoreError> {
        let employees = self
            .repo
            .get_all()
            .await
            .map_err(store_error("error getting all employees"))?;
        Ok(employees.into_iter().map(Into::into).collect())
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<EmployeeResponse>, CoreError> {
        let employees = self
            .repo
            .find_by_ids(ids)
            .await
            .map_err(store_error(format!("error finding employees with ids {ids:?}")))?;
        Ok(employees.into_iter().map(Into::into).collect())
    }

    async fn delete_by_id(&self, id: DbId) -> Result<(), CoreError> {
        self.repo
            .delete_by_id(id)
            .await
            .map_err(store_error(format!("error deleting employee with id {id}")))
    }

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<(), CoreError> {
        self.repo
            .delete_by_ids(ids)
            .await
            .map_err(store_error(format!("error deleting employees with ids {ids:?}")))
    }

    /// The page and the total are read with the same filter value, so `total`
    /// always describes the filtered set the page was cut from.
    async fn find_page(
        &self,
        request: PageRequest,
    ) -> Result<PageResponse<EmployeeResponse>, CoreError> {
        self.validator.validate(&request)?;

        let filter = request.text_filter.as_str();
        let rows = self
            .repo
            .find_page(request.offset(), request.limit(), filter)
            .await
            .map_err(store_error("error finding employee page"))?;
        let total = self
            .repo
            .count_all(filter)
            .await
            .map_err(store_error("error counting employees"))?;

        Ok(PageResponse {
            result: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }
}
