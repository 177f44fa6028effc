//! Open/close lifecycle for components holding a backend connection.

use crate::error::RepoError;

/// A component that must be opened before use.
///
/// `open` and `close` are idempotent.
#[async_trait::async_trait]
pub trait Openable: Send + Sync {
    fn is_opened(&self) -> bool;

    async fn open(&self, correlation_id: Option<&str>) -> Result<(), RepoError>;

    async fn close(&self, correlation_id: Option<&str>) -> Result<(), RepoError>;
}
