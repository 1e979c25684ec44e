//! Store settings
//!
//! Stores non-sensitive configuration in a plain JSON file. Environment
//! variables can switch the native backends off without touching the file.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{CredentialStoreError, Result};

/// Environment override for `use_mac_keychain`
pub const ENV_USE_MAC_KEYCHAIN: &str = "CREDSTORE_USE_MAC_KEYCHAIN";
/// Environment override for `use_linux_keychain`
pub const ENV_USE_LINUX_KEYCHAIN: &str = "CREDSTORE_USE_LINUX_KEYCHAIN";

const SETTINGS_FILE: &str = "settings.json";

/// Credential store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Product name shown to the user when the keychain cannot be reached
    pub product_name: String,
    /// Service name under which native keychain entries are grouped
    pub keychain_service: String,
    /// Use the macOS Keychain when running on macOS
    pub use_mac_keychain: bool,
    /// Use the Secret Service when running on Linux
    pub use_linux_keychain: bool,
    /// How long an access denial suppresses further lookups, measured
    /// from the last lookup of that item
    pub denial_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            product_name: "Credential Store".to_string(),
            keychain_service: "credential-store".to_string(),
            use_mac_keychain: true,
            use_linux_keychain: true,
            denial_ttl_secs: 60,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults when missing
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Apply `CREDSTORE_USE_*_KEYCHAIN` overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(ENV_USE_MAC_KEYCHAIN) {
            match parse_bool(&value) {
                Some(flag) => self.use_mac_keychain = flag,
                None => warn!("Ignoring {}={:?}: not a boolean", ENV_USE_MAC_KEYCHAIN, value),
            }
        }
        if let Some(value) = lookup(ENV_USE_LINUX_KEYCHAIN) {
            match parse_bool(&value) {
                Some(flag) => self.use_linux_keychain = flag,
                None => warn!("Ignoring {}={:?}: not a boolean", ENV_USE_LINUX_KEYCHAIN, value),
            }
        }
    }

    /// Denial cache expiry as a duration
    pub fn denial_ttl(&self) -> Duration {
        Duration::from_secs(self.denial_ttl_secs)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Create a settings manager rooted at `storage_dir`
    pub fn new(storage_dir: &Path) -> Result<Self> {
        let settings_file = storage_dir.join(SETTINGS_FILE);
        let settings = Settings::load(&settings_file)?;

        Ok(Self {
            settings_file,
            settings,
        })
    }

    /// Default configuration directory for this user
    pub fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("com", "symbia-labs", "credential-store")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| {
                CredentialStoreError::Settings("Could not determine config directory".to_string())
            })
    }

    /// Save settings to file
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(&self.settings)?;

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &self.settings_file).await?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}
