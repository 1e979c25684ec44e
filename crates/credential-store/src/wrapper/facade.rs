//! Credential store facade
//!
//! Reads go staging store → denial cache → active store. Writes are staged
//! and committed by the deferred-write queue until the backend proves
//! unusable; from then on the in-memory fallback takes everything.

use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info, warn};

use super::{DenialCache, StagingStore, WriteQueue};
use crate::credential::{CredentialAttributes, Credentials, Staged};
use crate::error::{CredentialStoreError, Result};
use crate::notification::{unavailable_message, LogNotifier, Notifier, UNAVAILABLE_TITLE};
use crate::settings::Settings;
use crate::storage::{CredentialBackend, InMemoryCredentialStore};

/// State shared between callers and the queue worker
struct FacadeInner {
    backend: Arc<dyn CredentialBackend>,
    /// Set at most once, never reset
    fallback: OnceLock<Arc<InMemoryCredentialStore>>,
    staging: StagingStore,
    denied: DenialCache,
    notifier: Arc<dyn Notifier>,
    product_name: String,
}

impl FacadeInner {
    /// Switch to the in-memory store for good and tell the user
    fn activate_fallback(&self, cause: &CredentialStoreError) -> Arc<InMemoryCredentialStore> {
        let mut created = false;
        let fallback = self.fallback.get_or_init(|| {
            created = true;
            Arc::new(InMemoryCredentialStore::new())
        });

        error!("{} failed: {}", self.backend.backend_name(), cause);
        if created {
            info!("Credentials are now kept in memory for the rest of this process");
        }

        let detail = cause.to_string();
        self.notifier
            .notify(UNAVAILABLE_TITLE, &unavailable_message(&self.product_name, &detail));

        Arc::clone(fallback)
    }

    /// Read from whichever store is active. Errors stay distinct from
    /// "not found" here; only the public `get` folds them away.
    async fn lookup(&self, attributes: &CredentialAttributes) -> Result<Option<Credentials>> {
        if let Some(fallback) = self.fallback.get() {
            return Ok(fallback.read(attributes).await);
        }

        match self.backend.get(attributes).await {
            Err(e) if e.is_unavailable() => {
                let fallback = self.activate_fallback(&e);
                Ok(fallback.read(attributes).await)
            }
            other => other,
        }
    }

    /// Write to whichever store is active, re-checking the fallback first
    /// since another caller may have switched over since the write was queued
    async fn commit(
        &self,
        attributes: &CredentialAttributes,
        credentials: Option<&Credentials>,
    ) -> Result<()> {
        if let Some(fallback) = self.fallback.get() {
            fallback.write(attributes, credentials).await;
            return Ok(());
        }

        match self.backend.set(attributes, credentials).await {
            Err(e) if e.is_unavailable() => {
                let fallback = self.activate_fallback(&e);
                fallback.write(attributes, credentials).await;
                Ok(())
            }
            other => other,
        }
    }
}

/// Resilient credential store wrapping one native backend.
///
/// `get` and `set` never fail: backend errors are logged and read as
/// absent, writes are best-effort until the fallback store takes over.
/// Cloning is cheap and clones share all state.
#[derive(Clone)]
pub struct CredentialStoreFacade {
    inner: Arc<FacadeInner>,
    queue: WriteQueue,
}

impl CredentialStoreFacade {
    /// Wrap `backend`, reporting problems through the log.
    /// Must be called from within a Tokio runtime.
    pub fn new(backend: Arc<dyn CredentialBackend>, settings: &Settings) -> Self {
        Self::with_notifier(backend, Arc::new(LogNotifier), settings)
    }

    /// Wrap `backend` with a custom notifier
    pub fn with_notifier(
        backend: Arc<dyn CredentialBackend>,
        notifier: Arc<dyn Notifier>,
        settings: &Settings,
    ) -> Self {
        debug!("Credential store using {}", backend.backend_name());

        Self {
            inner: Arc::new(FacadeInner {
                backend,
                fallback: OnceLock::new(),
                staging: StagingStore::new(),
                denied: DenialCache::new(settings.denial_ttl()),
                notifier,
                product_name: settings.product_name.clone(),
            }),
            queue: WriteQueue::spawn(),
        }
    }

    /// Look up credentials for `attributes`
    pub async fn get(&self, attributes: &CredentialAttributes) -> Option<Credentials> {
        match self.inner.staging.lookup(attributes).await {
            Staged::Present(credentials) => return Some(credentials),
            Staged::Empty => return None,
            Staged::Unresolved => {}
        }

        if self.inner.denied.is_denied(attributes).await {
            warn!("User denied access to {}", attributes);
            return None;
        }

        match self.inner.lookup(attributes).await {
            Ok(credentials) => credentials,
            Err(CredentialStoreError::AccessDenied(reason)) => {
                warn!("User denied access to {}: {}", attributes, reason);
                self.inner.denied.record(attributes.clone()).await;
                None
            }
            Err(e) => {
                error!("Failed to read credentials for {}: {}", attributes, e);
                None
            }
        }
    }

    /// Store credentials for `attributes`; `None` clears them.
    ///
    /// Returns once the value is visible to `get`. The backend write itself
    /// happens later on the queue, unless the fallback store is active.
    /// A key with an older write still queued stays on the queue so the
    /// older commit cannot land after this one.
    pub async fn set(&self, attributes: &CredentialAttributes, credentials: Option<Credentials>) {
        if let Some(fallback) = self.inner.fallback.get() {
            if self.inner.staging.lookup(attributes).await == Staged::Unresolved {
                fallback.write(attributes, credentials.as_ref()).await;
                return;
            }
            debug!("Queueing write for {} behind a pending commit", attributes);
        }

        let generation = self.inner.staging.stage(attributes, credentials.as_ref()).await;

        let inner = Arc::clone(&self.inner);
        let attributes = attributes.clone();
        self.queue.submit(async move {
            match inner.commit(&attributes, credentials.as_ref()).await {
                Ok(()) => debug!("Committed credentials for {}", attributes),
                Err(e) if e.is_access_denied() => {
                    warn!("User denied write access to {}: {}", attributes, e)
                }
                Err(e) => error!("Failed to save credentials for {}: {}", attributes, e),
            }
            inner.staging.clear(&attributes, generation).await;
        });
    }

    /// Wait until every write issued so far has been committed
    pub async fn flush(&self) {
        self.queue.flush().await;
    }

    /// Whether the in-memory fallback has taken over
    pub fn is_fallback_active(&self) -> bool {
        self.inner.fallback.get().is_some()
    }

    /// The fallback store, once it exists
    pub fn fallback_store(&self) -> Option<Arc<InMemoryCredentialStore>> {
        self.inner.fallback.get().cloned()
    }

    /// Name of the store currently answering requests
    pub fn backend_name(&self) -> &'static str {
        match self.inner.fallback.get() {
            Some(fallback) => fallback.backend_name(),
            None => self.inner.backend.backend_name(),
        }
    }

    /// Writes queued but not yet committed
    pub fn pending_writes(&self) -> usize {
        self.queue.pending()
    }

    /// Keys whose latest write is still staged
    pub async fn staged_writes(&self) -> usize {
        self.inner.staging.len().await
    }
}
