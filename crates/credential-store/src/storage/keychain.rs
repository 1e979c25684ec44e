//! OS Keychain storage backend
//!
//! Uses the system keychain for secure storage:
//! - macOS: Keychain
//! - Linux: Secret Service (GNOME Keyring, KWallet)

use async_trait::async_trait;
use keyring::Entry;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::CredentialBackend;
use crate::credential::{CredentialAttributes, Credentials, SecretString};
use crate::error::{CredentialStoreError, Result};

/// What one keychain entry holds: the user name travels with the secret,
/// so service-only attributes read back exactly what was written
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
struct KeychainRecord {
    user_name: Option<String>,
    password: Option<String>,
}

/// Serialize credentials for the keychain; `None` means "delete the entry"
fn encode_record(credentials: Option<&Credentials>) -> Result<Option<SecretString>> {
    let Some(credentials) = credentials.filter(|c| !c.is_empty()) else {
        return Ok(None);
    };

    let record = KeychainRecord {
        user_name: credentials.user_name.clone(),
        password: credentials.password_str().map(str::to_string),
    };
    Ok(Some(SecretString::new(serde_json::to_string(&record)?)))
}

/// Parse a keychain entry. Entries written by other tools hold a bare
/// password; those get the account from the attributes as user name.
fn decode_record(raw: &str, attributes: &CredentialAttributes) -> Credentials {
    match serde_json::from_str::<KeychainRecord>(raw) {
        Ok(mut record) => Credentials {
            user_name: record.user_name.take(),
            password: record.password.take().map(SecretString::new),
        },
        Err(_) => Credentials::new(attributes.user_name.as_deref(), Some(raw)),
    }
}

/// OS Keychain storage backend
pub struct KeychainBackend {
    /// Prefix for every service name (for namespacing)
    namespace: String,
}

impl KeychainBackend {
    /// Create a keychain backend whose entries live under `namespace`
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
        }
    }

    fn service_for(&self, attributes: &CredentialAttributes) -> String {
        format!("{}:{}", self.namespace, attributes.service_name)
    }

    /// Account of the entry; identical for reads and writes
    fn account_for(attributes: &CredentialAttributes) -> &str {
        attributes
            .user_name
            .as_deref()
            .unwrap_or(attributes.service_name.as_str())
    }

    /// Run a keyring call on the blocking pool; the platform may show a
    /// prompt and hold the thread for a long time.
    async fn with_entry<T, F>(&self, service: String, account: String, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Entry) -> keyring::Result<T> + Send + 'static,
    {
        tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, &account).map_err(map_keyring_error)?;
            op(&entry).map_err(map_keyring_error)
        })
        .await
        .map_err(|e| CredentialStoreError::Backend(format!("keychain task failed: {}", e)))?
    }
}

/// Sort keyring failures into the outcomes the facade reacts to
fn map_keyring_error(err: keyring::Error) -> CredentialStoreError {
    match err {
        keyring::Error::PlatformFailure(e) => CredentialStoreError::Unavailable(e.to_string()),
        keyring::Error::NoStorageAccess(e) => CredentialStoreError::AccessDenied(e.to_string()),
        other => CredentialStoreError::Backend(other.to_string()),
    }
}

#[async_trait]
impl CredentialBackend for KeychainBackend {
    async fn get(&self, attributes: &CredentialAttributes) -> Result<Option<Credentials>> {
        let service = self.service_for(attributes);
        let account = Self::account_for(attributes).to_string();

        let raw = self
            .with_entry(service, account, |entry| match entry.get_password() {
                Ok(raw) => Ok(Some(SecretString::new(raw))),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(e) => Err(e),
            })
            .await?;

        match raw {
            Some(raw) => {
                debug!("Retrieved credentials from keychain: {}", attributes);
                Ok(Some(decode_record(raw.expose(), attributes)))
            }
            None => {
                debug!("Credentials not found in keychain: {}", attributes);
                Ok(None)
            }
        }
    }

    async fn set(
        &self,
        attributes: &CredentialAttributes,
        credentials: Option<&Credentials>,
    ) -> Result<()> {
        let service = self.service_for(attributes);
        let account = Self::account_for(attributes).to_string();

        match encode_record(credentials)? {
            Some(record) => {
                self.with_entry(service, account, move |entry| {
                    entry.set_password(record.expose())
                })
                .await?;
                debug!("Stored credentials in keychain: {}", attributes);
            }
            None => {
                self.with_entry(service, account, |entry| match entry.delete_password() {
                    // Key doesn't exist, that's fine
                    Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                    Err(e) => Err(e),
                })
                .await?;
                debug!("Deleted credentials from keychain: {}", attributes);
            }
        }

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        #[cfg(target_os = "macos")]
        return "macOS Keychain";

        #[cfg(target_os = "linux")]
        return "Linux Secret Service";

        #[cfg(not(any(target_os = "macos", target_os = "linux")))]
        return "System Keychain";
    }
}
