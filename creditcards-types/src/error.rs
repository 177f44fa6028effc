//! Error types for the credit cards service.

/// Domain-level errors (invalid records or requests).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Credit card not found: {0}")]
    CardNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Persistence-level errors.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Failure reported by the storage backend or its transport, kept as-is.
    #[error("Backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("Persistence is not opened")]
    NotOpened,
}

impl RepoError {
    /// Wraps a backend error without altering it.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RepoError::Backend(Box::new(err))
    }
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(DomainError::ValidationError(msg)) => AppError::BadRequest(msg),
            RepoError::Domain(DomainError::CardNotFound(id)) => {
                AppError::NotFound(format!("Credit card not found: {}", id))
            }
            RepoError::NotOpened => AppError::Unavailable("Persistence is not opened".into()),
            RepoError::Credentials(e) => AppError::Unavailable(e),
            RepoError::Backend(e) => AppError::Internal(e.to_string()),
        }
    }
}
