//! Error types for credential-store

use thiserror::Error;

/// Result type alias for credential store operations
pub type Result<T> = std::result::Result<T, CredentialStoreError>;

/// Credential store error types
#[derive(Error, Debug)]
pub enum CredentialStoreError {
    /// The native store cannot be used at all (library or service missing).
    /// Seeing this once switches the facade to its in-memory fallback for good.
    #[error("Native keychain unavailable: {0}")]
    Unavailable(String),

    /// The user or the OS refused access to the requested item
    #[error("Access to keychain item denied: {0}")]
    AccessDenied(String),

    /// Any other backend failure
    #[error("Keychain error: {0}")]
    Backend(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CredentialStoreError {
    /// Whether this error means the backend is permanently unusable
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Whether this error is an access denial
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(CredentialStoreError::Unavailable("libsecret".into()).is_unavailable());
        assert!(CredentialStoreError::AccessDenied("svc".into()).is_access_denied());

        let other = CredentialStoreError::Backend("boom".into());
        assert!(!other.is_unavailable());
        assert!(!other.is_access_denied());
    }
}
