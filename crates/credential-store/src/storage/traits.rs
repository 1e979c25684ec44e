//! Storage trait definitions

use crate::credential::{CredentialAttributes, Credentials};
use crate::error::Result;
use async_trait::async_trait;

/// Trait for native credential backends.
///
/// Implementations classify failures so the facade can react:
/// `Unavailable` switches to the in-memory fallback permanently,
/// `AccessDenied` is cached, anything else is logged and treated as absent.
#[async_trait]
pub trait CredentialBackend: Send + Sync {
    /// Look up the credentials stored for `attributes`
    async fn get(&self, attributes: &CredentialAttributes) -> Result<Option<Credentials>>;

    /// Store credentials for `attributes`; `None` removes the entry
    async fn set(
        &self,
        attributes: &CredentialAttributes,
        credentials: Option<&Credentials>,
    ) -> Result<()>;

    /// Get a human-readable name for this backend
    fn backend_name(&self) -> &'static str;
}
