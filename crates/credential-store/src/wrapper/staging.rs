//! Staging store for writes that have not reached the backend yet

use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::credential::{CredentialAttributes, Credentials, Staged};

struct StagedEntry {
    generation: u64,
    value: Staged,
}

#[derive(Default)]
struct StagingState {
    entries: HashMap<CredentialAttributes, StagedEntry>,
    next_generation: u64,
}

/// In-memory read-through view of pending writes.
///
/// Every staged write gets a generation number. Clearing takes that number
/// back, so a finished commit only removes its own entry and never a newer
/// write queued behind it.
#[derive(Default)]
pub struct StagingStore {
    state: RwLock<StagingState>,
}

impl StagingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pending write and return its generation
    pub async fn stage(&self, attributes: &CredentialAttributes, credentials: Option<&Credentials>) -> u64 {
        let mut state = self.state.write().await;
        state.next_generation += 1;
        let generation = state.next_generation;

        state.entries.insert(
            attributes.clone(),
            StagedEntry {
                generation,
                value: Staged::from_write(credentials),
            },
        );

        debug!("Staged write #{} for {}", generation, attributes);
        generation
    }

    /// What is currently staged for `attributes`
    pub async fn lookup(&self, attributes: &CredentialAttributes) -> Staged {
        self.state
            .read()
            .await
            .entries
            .get(attributes)
            .map(|entry| entry.value.clone())
            .unwrap_or(Staged::Unresolved)
    }

    /// Drop the entry staged as `generation`. Returns false when a newer
    /// write has replaced it in the meantime.
    pub async fn clear(&self, attributes: &CredentialAttributes, generation: u64) -> bool {
        let mut state = self.state.write().await;
        let current = state.entries.get(attributes).map(|entry| entry.generation);
        if current != Some(generation) {
            return false;
        }

        state.entries.remove(attributes);
        debug!("Cleared staged write #{} for {}", generation, attributes);
        true
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}
