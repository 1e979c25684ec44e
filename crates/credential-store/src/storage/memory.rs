//! In-memory credential store
//!
//! Lives for the process lifetime only. Used as the fallback once the
//! native keychain is known to be unusable.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::CredentialBackend;
use crate::credential::{CredentialAttributes, Credentials};
use crate::error::Result;

/// In-memory credential store
#[derive(Default)]
pub struct InMemoryCredentialStore {
    entries: RwLock<HashMap<CredentialAttributes, Credentials>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the credentials stored for `attributes`
    pub async fn read(&self, attributes: &CredentialAttributes) -> Option<Credentials> {
        self.entries.read().await.get(attributes).cloned()
    }

    /// Store or remove credentials; empty credentials remove the entry
    pub async fn write(&self, attributes: &CredentialAttributes, credentials: Option<&Credentials>) {
        let mut entries = self.entries.write().await;
        match credentials.filter(|c| !c.is_empty()) {
            Some(credentials) => {
                entries.insert(attributes.clone(), credentials.clone());
                debug!("Stored credentials in memory: {}", attributes);
            }
            None => {
                entries.remove(attributes);
                debug!("Removed credentials from memory: {}", attributes);
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialBackend for InMemoryCredentialStore {
    async fn get(&self, attributes: &CredentialAttributes) -> Result<Option<Credentials>> {
        Ok(self.read(attributes).await)
    }

    async fn set(
        &self,
        attributes: &CredentialAttributes,
        credentials: Option<&Credentials>,
    ) -> Result<()> {
        self.write(attributes, credentials).await;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "In-Memory Store"
    }
}
