//! Credential resolvers.

use async_trait::async_trait;
use tracing::debug;

use creditcards_types::{Credential, CredentialResolver, RepoError};

/// Resolver returning credentials fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialResolver {
    credential: Option<Credential>,
}

impl StaticCredentialResolver {
    pub fn new(credential: Credential) -> Self {
        Self {
            credential: Some(credential),
        }
    }

    /// Builds a resolver from an optional id/key pair; both must be present.
    pub fn from_parts(access_id: Option<String>, access_key: Option<String>) -> Self {
        let credential = match (access_id, access_key) {
            (Some(id), Some(key)) if !id.is_empty() && !key.is_empty() => {
                Some(Credential::new(id, key))
            }
            _ => None,
        };
        Self { credential }
    }
}

#[async_trait]
impl CredentialResolver for StaticCredentialResolver {
    async fn lookup(&self, correlation_id: Option<&str>) -> Result<Credential, RepoError> {
        debug!(?correlation_id, "Resolving static credentials");
        self.credential
            .clone()
            .ok_or_else(|| RepoError::Credentials("Access id and access key are required".into()))
    }
}
