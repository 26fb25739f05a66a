//! Repository layer.
//!
//! Both resources share the [`NamedRepository`] contract (single- and bulk-row
//! reads and deletes, plus a transactional create path keyed on the row's
//! name). Employees add filtered paging on top. The PostgreSQL
//! implementations hold a cloned [`PgPool`](sqlx::PgPool); services and tests
//! only depend on the traits.

pub mod cached_role_repo;
pub mod employee_repo;
pub mod role_repo;

use async_trait::async_trait;
use idm_core::types::DbId;

use crate::error::StoreError;
use crate::models::employee::Employee;
use crate::models::role::Role;

pub use cached_role_repo::{CachedRoleRepo, ROLE_CACHE_PREFIX};
pub use employee_repo::PgEmployeeRepo;
pub use role_repo::PgRoleRepo;

/// PostgreSQL transaction handle used by the `Pg*` repositories.
pub type PgTx = sqlx::Transaction<'static, sqlx::Postgres>;

/// Store operations for a resource whose natural key is its name.
///
/// `Tx` is the transaction handle returned by [`begin_transaction`]. Exactly
/// one of [`commit`] or [`rollback`] must consume it; a handle that is dropped
/// instead is rolled back by the driver.
///
/// [`begin_transaction`]: NamedRepository::begin_transaction
/// [`commit`]: NamedRepository::commit
/// [`rollback`]: NamedRepository::rollback
#[async_trait]
pub trait NamedRepository: Send + Sync {
    type Entity: Send;
    type Create: Send + Sync;
    type Tx: Send;

    /// Insert one row and return its generated id.
    async fn create(&self, input: &Self::Create) -> Result<DbId, StoreError>;

    /// Insert one row inside a transaction opened by the caller.
    async fn create_in_transaction(
        &self,
        tx: &mut Self::Tx,
        input: &Self::Create,
    ) -> Result<DbId, StoreError>;

    /// Fails with [`StoreError::NotFound`] when no row matches.
    async fn find_by_id(&self, id: DbId) -> Result<Self::Entity, StoreError>;

    /// Every row, unordered and unbounded.
    async fn get_all(&self) -> Result<Vec<Self::Entity>, StoreError>;

    /// Fails with [`StoreError::EmptyIds`] before touching the store when `ids` is empty.
    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<Self::Entity>, StoreError>;

    async fn delete_by_id(&self, id: DbId) -> Result<(), StoreError>;

    /// Fails with [`StoreError::EmptyIds`] before touching the store when `ids` is empty.
    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<(), StoreError>;

    /// Whether a row with exactly this name exists, checked inside `tx`.
    async fn find_by_name(&self, tx: &mut Self::Tx, name: &str) -> Result<bool, StoreError>;

    async fn begin_transaction(&self) -> Result<Self::Tx, StoreError>;

    async fn commit(&self, tx: Self::Tx) -> Result<(), StoreError>;

    async fn rollback(&self, tx: Self::Tx) -> Result<(), StoreError>;
}

/// Employee store: the shared contract plus filtered paging.
#[async_trait]
pub trait EmployeeRepository: NamedRepository<Entity = Employee> {
    /// One window of rows, ordered by id, optionally filtered by name.
    ///
    /// The filter applies only when at least three characters remain after
    /// trimming; it is a case-insensitive substring match.
    async fn find_page(
        &self,
        offset: i64,
        limit: i64,
        text_filter: &str,
    ) -> Result<Vec<Employee>, StoreError>;

    /// Number of rows matching `text_filter` under the same rule as [`find_page`].
    ///
    /// [`find_page`]: EmployeeRepository::find_page
    async fn count_all(&self, text_filter: &str) -> Result<i64, StoreError>;
}

/// Role store. Any [`NamedRepository`] over [`Role`] qualifies.
pub trait RoleRepository: NamedRepository<Entity = Role> {}

impl<T: NamedRepository<Entity = Role>> RoleRepository for T {}
