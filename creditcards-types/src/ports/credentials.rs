//! Credential resolution port.

use crate::error::RepoError;

/// Access credentials for an external backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_id: String,
    pub access_key: String,
}

impl Credential {
    pub fn new(access_id: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            access_id: access_id.into(),
            access_key: access_key.into(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_id", &self.access_id)
            .field("access_key", &"***")
            .finish()
    }
}

/// Looks up the credentials a persistence adapter connects with.
#[async_trait::async_trait]
pub trait CredentialResolver: Send + Sync {
    async fn lookup(&self, correlation_id: Option<&str>) -> Result<Credential, RepoError>;
}
