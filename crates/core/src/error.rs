use crate::types::DbId;

/// Domain error returned by services.
///
/// The variant decides the HTTP status; the message is what the client sees.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Client input failed its declared constraints.
    #[error("{0}")]
    Validation(String),

    /// A row with the same natural key (name) already exists.
    #[error("{0}")]
    AlreadyExists(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A bulk operation received an empty id list.
    #[error("{0}")]
    InvalidArgument(String),

    /// A transaction or query failed.
    #[error("{0}")]
    Store(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    /// Prefix the message with operation context, keeping the variant.
    ///
    /// `NotFound` already names the entity and id, so it is returned as is.
    pub fn context(self, context: impl std::fmt::Display) -> Self {
        match self {
            CoreError::Validation(msg) => CoreError::Validation(format!("{context}: {msg}")),
            CoreError::AlreadyExists(msg) => CoreError::AlreadyExists(format!("{context}: {msg}")),
            CoreError::InvalidArgument(msg) => {
                CoreError::InvalidArgument(format!("{context}: {msg}"))
            }
            CoreError::Store(msg) => CoreError::Store(format!("{context}: {msg}")),
            CoreError::Internal(msg) => CoreError::Internal(format!("{context}: {msg}")),
            other => other,
        }
    }
}
