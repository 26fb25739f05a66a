//! Repository for the `employee` table.

use async_trait::async_trait;
use idm_core::paging::{contains_pattern, effective_filter};
use idm_core::types::DbId;
use sqlx::PgPool;

use super::{EmployeeRepository, NamedRepository, PgTx};
use crate::error::StoreError;
use crate::models::employee::{CreateEmployee, Employee};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, create_at, update_at";

const ENTITY: &str = "employee";

/// PostgreSQL-backed employee store.
#[derive(Clone)]
pub struct PgEmployeeRepo {
    pool: PgPool,
}

impl PgEmployeeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `WHERE` clause and bind value for an optional name filter.
///
/// Returns `("", None)` when the filter is too short to apply.
fn name_filter(text_filter: &str) -> (&'static str, Option<String>) {
    match effective_filter(text_filter) {
        Some(filter) => ("WHERE name ILIKE $1", Some(contains_pattern(filter))),
        None => ("", None),
    }
}

#[async_trait]
impl NamedRepository for PgEmployeeRepo {
    type Entity = Employee;
    type Create = CreateEmployee;
    type Tx = PgTx;

    async fn create(&self, input: &CreateEmployee) -> Result<DbId, StoreError> {
        let id = sqlx::query_scalar::<_, DbId>("INSERT INTO employee (name) VALUES ($1) RETURNING id")
            .bind(&input.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn create_in_transaction(
        &self,
        tx: &mut PgTx,
        input: &CreateEmployee,
    ) -> Result<DbId, StoreError> {
        let id = sqlx::query_scalar::<_, DbId>("INSERT INTO employee (name) VALUES ($1) RETURNING id")
            .bind(&input.name)
            .fetch_one(&mut **tx)
            .await?;
        Ok(id)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Employee, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM employee WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { entity: ENTITY, id })
    }

    async fn get_all(&self) -> Result<Vec<Employee>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM employee");
        Ok(sqlx::query_as::<_, Employee>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<Employee>, StoreError> {
        if ids.is_empty() {
            return Err(StoreError::EmptyIds { entity: ENTITY });
        }
        let query = format!("SELECT {COLUMNS} FROM employee WHERE id = ANY($1)");
        Ok(sqlx::query_as::<_, Employee>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn delete_by_id(&self, id: DbId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM employee WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Err(StoreError::EmptyIds { entity: ENTITY });
        }
        sqlx::query("DELETE FROM employee WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Takes a transaction-scoped advisory lock on the name before checking,
    /// so concurrent creates of the same name run their check-then-insert one
    /// after another. The lock is released on commit or rollback.
    async fn find_by_name(&self, tx: &mut PgTx, name: &str) -> Result<bool, StoreError> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(format!("{ENTITY}:{name}"))
            .execute(&mut **tx)
            .await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM employee WHERE name = $1)",
        )
        .bind(name)
        .fetch_one(&mut **tx)
        .await?;
        Ok(exists)
    }

    async fn begin_transaction(&self) -> Result<PgTx, StoreError> {
        Ok(self.pool.begin().await?)
    }

    async fn commit(&self, tx: PgTx) -> Result<(), StoreError> {
        Ok(tx.commit().await?)
    }

    async fn rollback(&self, tx: PgTx) -> Result<(), StoreError> {
        Ok(tx.rollback().await?)
    }
}

#[async_trait]
impl EmployeeRepository for PgEmployeeRepo {
    async fn find_page(
        &self,
        offset: i64,
        limit: i64,
        text_filter: &str,
    ) -> Result<Vec<Employee>, StoreError> {
        let (where_clause, pattern) = name_filter(text_filter);
        let bind_idx = if pattern.is_some() { 2 } else { 1 };
        let query = format!(
            "SELECT {COLUMNS} FROM employee {where_clause} \
             ORDER BY id ASC \
             OFFSET ${bind_idx} LIMIT ${}",
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, Employee>(&query);
        if let Some(pattern) = pattern {
            q = q.bind(pattern);
        }
        Ok(q.bind(offset).bind(limit).fetch_all(&self.pool).await?)
    }

    async fn count_all(&self, text_filter: &str) -> Result<i64, StoreError> {
        let (where_clause, pattern) = name_filter(text_filter);
        let query = format!("SELECT COUNT(*)::BIGINT FROM employee {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        if let Some(pattern) = pattern {
            q = q.bind(pattern);
        }
        Ok(q.fetch_one(&self.pool).await?)
    }
}
