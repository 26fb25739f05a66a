//! Repository for the `role` table.
//!
//! `role.name` carries the `uq_role_name` unique constraint, so a duplicate
//! insert that slips past the in-transaction name check still fails with
//! [`StoreError::AlreadyExists`].

use async_trait::async_trait;
use idm_core::types::DbId;
use sqlx::PgPool;

use super::{NamedRepository, PgTx};
use crate::error::StoreError;
use crate::models::role::{CreateRole, Role};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, create_at, update_at";

const ENTITY: &str = "role";

/// PostgreSQL-backed role store without caching. Wrap it in
/// [`CachedRoleRepo`](super::CachedRoleRepo) for cache-aside reads.
#[derive(Clone)]
pub struct PgRoleRepo {
    pool: PgPool,
}

impl PgRoleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NamedRepository for PgRoleRepo {
    type Entity = Role;
    type Create = CreateRole;
    type Tx = PgTx;

    async fn create(&self, input: &CreateRole) -> Result<DbId, StoreError> {
        let id = sqlx::query_scalar::<_, DbId>("INSERT INTO role (name) VALUES ($1) RETURNING id")
            .bind(&input.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn create_in_transaction(
        &self,
        tx: &mut PgTx,
        input: &CreateRole,
    ) -> Result<DbId, StoreError> {
        let id = sqlx::query_scalar::<_, DbId>("INSERT INTO role (name) VALUES ($1) RETURNING id")
            .bind(&input.name)
            .fetch_one(&mut **tx)
            .await?;
        Ok(id)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Role, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM role WHERE id = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { entity: ENTITY, id })
    }

    async fn get_all(&self) -> Result<Vec<Role>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM role");
        Ok(sqlx::query_as::<_, Role>(&query).fetch_all(&self.pool).await?)
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<Role>, StoreError> {
        if ids.is_empty() {
            return Err(StoreError::EmptyIds { entity: ENTITY });
        }
        let query = format!("SELECT {COLUMNS} FROM role WHERE id = ANY($1)");
        Ok(sqlx::query_as::<_, Role>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn delete_by_id(&self, id: DbId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM role WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Err(StoreError::EmptyIds { entity: ENTITY });
        }
        sqlx::query("DELETE FROM role WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_by_name(&self, tx: &mut PgTx, name: &str) -> Result<bool, StoreError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM role WHERE name = $1)")
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
