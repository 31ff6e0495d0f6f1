use sea_orm::DbErr;
use thiserror::Error;

/// Errors raised by repository backends.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// The backend could not complete the operation for a reason other than
    /// the database, e.g. the in-memory id sequence ran out.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    pub fn permission_not_found() -> Self {
        Self::NotFound("Permission not found".into())
    }
}
