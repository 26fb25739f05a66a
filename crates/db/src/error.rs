use idm_core::error::CoreError;
use idm_core::types::DbId;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Errors raised by repositories.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A bulk operation was called with no ids; the store was not touched.
    #[error("{entity} ids cannot be empty")]
    EmptyIds { entity: &'static str },

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// An insert violated a unique constraint.
    #[error("duplicate value violates unique constraint: {constraint}")]
    AlreadyExists { constraint: String },

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return StoreError::AlreadyExists {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmptyIds { .. } => CoreError::InvalidArgument(err.to_string()),
            StoreError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            StoreError::AlreadyExists { .. } => CoreError::AlreadyExists(err.to_string()),
            StoreError::Database(_) => CoreError::Store(err.to_string()),
        }
    }
}

/// Errors raised by cache backends. Callers log these and carry on.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cache payload: {0}")]
    Payload(#[from] serde_json::Error),
}
