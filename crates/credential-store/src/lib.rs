//! # credential-store
//!
//! Resilient access to the native OS keychain:
//! - Read-your-writes staging of pending writes
//! - Ordered, asynchronous commits to the keychain
//! - Permanent in-memory fallback when the keychain is unusable
//! - Short-lived caching of access denials
//! - Credential values zeroed on drop

pub mod credential;
pub mod error;
pub mod factory;
pub mod notification;
pub mod settings;
pub mod storage;
pub mod wrapper;

pub use credential::{CredentialAttributes, Credentials, SecretString, Staged};
pub use error::{CredentialStoreError, Result};
pub use factory::{create_backend, create_credential_store, BackendFactory};
pub use notification::{LogNotifier, Notifier};
pub use settings::{Settings, SettingsManager};
pub use storage::{CredentialBackend, InMemoryCredentialStore, KeychainBackend};
pub use wrapper::CredentialStoreFacade;
