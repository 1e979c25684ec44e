//! Short-lived negative cache for access denials

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::credential::CredentialAttributes;

/// Remembers items the user refused access to, so the OS does not prompt
/// again on every lookup. Entries expire `ttl` after their last lookup.
pub struct DenialCache {
    ttl: Duration,
    last_access: Mutex<HashMap<CredentialAttributes, Instant>>,
}

impl DenialCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            last_access: Mutex::new(HashMap::new()),
        }
    }

    /// Record a denial for `attributes`
    pub async fn record(&self, attributes: CredentialAttributes) {
        self.purge_expired().await;
        self.last_access.lock().await.insert(attributes, Instant::now());
    }

    /// Whether a live denial exists. A hit extends the entry's lifetime;
    /// a stale entry is evicted.
    pub async fn is_denied(&self, attributes: &CredentialAttributes) -> bool {
        let now = Instant::now();
        let mut entries = self.last_access.lock().await;

        let Some(last) = entries.get_mut(attributes) else {
            return false;
        };
        if now.duration_since(*last) < self.ttl {
            *last = now;
            return true;
        }

        entries.remove(attributes);
        false
    }

    /// Drop every expired entry
    pub async fn purge_expired(&self) {
        let now = Instant::now();
        let ttl = self.ttl;
        self.last_access
            .lock()
            .await
            .retain(|_, last| now.duration_since(*last) < ttl);
    }

    pub async fn len(&self) -> usize {
        self.last_access.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.last_access.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    fn attrs() -> CredentialAttributes {
        CredentialAttributes::service_only("svc")
    }

    #[tokio::test(start_paused = true)]
    async fn test_denial_expires() {
        let cache = DenialCache::new(TTL);
        cache.record(attrs()).await;

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(!cache.is_denied(&attrs()).await);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_access_slides_expiry() {
        let cache = DenialCache::new(TTL);
        cache.record(attrs()).await;

        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(cache.is_denied(&attrs()).await);

        // 90s after the denial, 45s after the last lookup
        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(cache.is_denied(&attrs()).await);

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(!cache.is_denied(&attrs()).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = DenialCache::new(TTL);
        cache.record(attrs()).await;
        tokio::time::advance(Duration::from_secs(30)).await;
        cache.record(CredentialAttributes::service_only("other")).await;

        tokio::time::advance(Duration::from_secs(40)).await;
        cache.purge_expired().await;

        assert_eq!(cache.len().await, 1);
        assert!(cache.is_denied(&CredentialAttributes::service_only("other")).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_record_evicts_stale_entries() {
        let cache = DenialCache::new(TTL);
        cache.record(attrs()).await;

        tokio::time::advance(Duration::from_secs(90)).await;
        cache.record(CredentialAttributes::service_only("other")).await;

        assert_eq!(cache.len().await, 1);
        assert!(!cache.is_denied(&attrs()).await);
    }

    #[tokio::test]
    async fn test_unknown_item_not_denied() {
        let cache = DenialCache::new(TTL);
        assert!(!cache.is_denied(&attrs()).await);
        assert!(cache.is_empty().await);
    }
}
