//! Storage backends for credential lookups
//!
//! This module provides two backends:
//! 1. OS Keychain (macOS Keychain, Linux Secret Service)
//! 2. In-memory store (fallback when the keychain cannot be used)

mod traits;
mod keychain;
mod memory;

pub use traits::CredentialBackend;
pub use keychain::KeychainBackend;
pub use memory::InMemoryCredentialStore;
