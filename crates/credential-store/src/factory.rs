//! Native backend selection
//!
//! Picks the keychain implementation for the running platform, honouring
//! the `use_*_keychain` settings.

use std::sync::Arc;
use tracing::debug;

use crate::settings::Settings;
use crate::storage::{CredentialBackend, KeychainBackend};
use crate::wrapper::CredentialStoreFacade;

/// Builds a native backend when the platform and settings allow it
pub trait BackendFactory: Send + Sync {
    fn name(&self) -> &'static str;

    fn create(&self, settings: &Settings) -> Option<Arc<dyn CredentialBackend>>;
}

/// macOS Keychain
pub struct MacOsKeychainFactory;

impl BackendFactory for MacOsKeychainFactory {
    fn name(&self) -> &'static str {
        "macOS Keychain"
    }

    fn create(&self, settings: &Settings) -> Option<Arc<dyn CredentialBackend>> {
        if cfg!(target_os = "macos") && settings.use_mac_keychain {
            return Some(Arc::new(KeychainBackend::new(&settings.keychain_service)));
        }
        None
    }
}

/// Linux Secret Service (GNOME Keyring, KWallet)
pub struct LinuxSecretServiceFactory;

impl BackendFactory for LinuxSecretServiceFactory {
    fn name(&self) -> &'static str {
        "Linux Secret Service"
    }

    fn create(&self, settings: &Settings) -> Option<Arc<dyn CredentialBackend>> {
        if cfg!(target_os = "linux") && settings.use_linux_keychain {
            return Some(Arc::new(KeychainBackend::new(&settings.keychain_service)));
        }
        None
    }
}

/// Factories in the order they are tried
pub fn default_factories() -> Vec<Box<dyn BackendFactory>> {
    vec![
        Box::new(MacOsKeychainFactory),
        Box::new(LinuxSecretServiceFactory),
    ]
}

/// First native backend any factory produces
pub fn create_backend(settings: &Settings) -> Option<Arc<dyn CredentialBackend>> {
    default_factories().into_iter().find_map(|factory| {
        let backend = factory.create(settings);
        if backend.is_some() {
            debug!("Selected {} backend", factory.name());
        }
        backend
    })
}

/// Wrap the native backend for this platform in a facade, or `None` when
/// no native store applies. Must be called from within a Tokio runtime.
pub fn create_credential_store(settings: &Settings) -> Option<CredentialStoreFacade> {
    create_backend(settings).map(|backend| CredentialStoreFacade::new(backend, settings))
}
