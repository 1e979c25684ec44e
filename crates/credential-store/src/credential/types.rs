//! Credential type definitions

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Identifies a secret in the store (service plus optional account)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialAttributes {
    /// Service name (e.g., "github.com")
    pub service_name: String,

    /// Account within the service, if the secret is per-user
    pub user_name: Option<String>,
}

impl CredentialAttributes {
    /// Create attributes for a service/account pair
    pub fn new(service_name: impl Into<String>, user_name: Option<&str>) -> Self {
        Self {
            service_name: service_name.into(),
            user_name: user_name.map(str::to_string),
        }
    }

    /// Create attributes that only name a service
    pub fn service_only(service_name: impl Into<String>) -> Self {
        Self::new(service_name, None)
    }
}

impl fmt::Display for CredentialAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.user_name {
            Some(user) => write!(f, "{}/{}", self.service_name, user),
            None => f.write_str(&self.service_name),
        }
    }
}

/// Secret value - automatically zeroed when dropped
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    /// Create a new secret string
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Get the secret value (use carefully)
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for SecretString {}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// A user name plus secret, zeroed when dropped
#[derive(Clone, PartialEq, Eq, Default, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub user_name: Option<String>,
    pub password: Option<SecretString>,
}

impl Credentials {
    pub fn new(user_name: Option<&str>, password: Option<&str>) -> Self {
        Self {
            user_name: user_name.map(str::to_string),
            password: password.map(SecretString::new),
        }
    }

    /// Password as plain text, if any
    pub fn password_str(&self) -> Option<&str> {
        self.password.as_ref().map(SecretString::expose)
    }

    /// True when neither a user name nor a password is present
    pub fn is_empty(&self) -> bool {
        self.user_name.is_none() && self.password.is_none()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// What the staging store knows about a key.
///
/// `Empty` records an explicit clear that has not reached the backend yet,
/// which must not be confused with `Unresolved` (nothing staged, ask the
/// backend).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staged {
    Unresolved,
    Empty,
    Present(Credentials),
}

impl Staged {
    /// Build the staged form of a pending write
    pub fn from_write(credentials: Option<&Credentials>) -> Self {
        match credentials {
            Some(c) => Self::Present(c.clone()),
            None => Self::Empty,
        }
    }
}
